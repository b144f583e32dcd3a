//! The dispatcher: detect, look up, render, wrap. This is the only layer
//! that reports through the observer.

use log::Level;
use serde_json::Value;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::context::{CompareTuple, RenderContext, RenderMode};
use crate::detect::detect;
use crate::error::{MorphError, MorphResult};
use crate::morph_type::MorphType;
use crate::observer::{Category, NoopObserver, RenderObserver};
use crate::primitives::{lookup, Primitive};
use crate::value::is_empty;
use crate::wrapper::{embeddable_raw_value, wrap_field};

#[derive(Clone)]
pub struct Renderer {
    config: EngineConfig,
    observer: Arc<dyn RenderObserver>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Renderer {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn RenderObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn emit(&self, level: Level, category: Category, message: impl FnOnce() -> String) {
        if level > Level::Warn && self.config.is_muted(category) {
            return;
        }
        self.observer.record(level, category, &message());
    }

    /// Morph type for a field: a configured override, otherwise detection.
    pub fn morph_for(&self, field: &str, value: &Value) -> MorphType {
        if let Some(morph) = self.config.override_for(field) {
            self.emit(Level::Debug, Category::Detect, || {
                format!("field '{}' uses override {}", field, morph)
            });
            return morph;
        }
        let morph = detect(field, value);
        self.emit(Level::Debug, Category::Detect, || {
            format!("field '{}' detected as {}", field, morph)
        });
        morph
    }

    fn primitive(&self, morph: MorphType) -> MorphResult<&'static Primitive> {
        lookup(morph).ok_or(MorphError::UnregisteredMorph { morph })
    }

    fn raw_value(&self, field: &str, value: &Value) -> Option<String> {
        if !self.config.embed_raw_values {
            return None;
        }
        match embeddable_raw_value(value, self.config.raw_value_limit) {
            Ok(Some(encoded)) => Some(encoded),
            Ok(None) => {
                self.emit(Level::Debug, Category::Encode, || {
                    format!(
                        "raw value for '{}' omitted (null or over {} bytes)",
                        field, self.config.raw_value_limit
                    )
                });
                None
            }
            Err(e) => {
                self.emit(Level::Warn, Category::Encode, || {
                    format!("raw value for '{}' not encoded: {}", field, e)
                });
                None
            }
        }
    }

    /// Render one field. Empty values give an empty string.
    pub fn try_render_value(&self, value: &Value, field: &str, ctx: &RenderContext) -> MorphResult<String> {
        if is_empty(value) {
            return Ok(String::new());
        }
        let morph = self.morph_for(field, value);
        let primitive = self.primitive(morph)?;
        let inner = primitive.single(value, ctx);
        self.emit(Level::Debug, Category::Render, || {
            format!("rendered '{}' as {} ({} bytes)", field, morph, inner.len())
        });
        let raw = self.raw_value(field, value);
        let mode = if ctx.mode == RenderMode::Compare {
            RenderMode::Single
        } else {
            ctx.mode
        };
        Ok(wrap_field(morph, field, &inner, raw.as_deref(), mode))
    }

    /// Render the same field across every record in `ctx`. `values` pairs
    /// with `ctx.items` by position; missing entries count as null.
    pub fn try_render_compare(&self, field: &str, values: &[Value], ctx: &RenderContext) -> MorphResult<String> {
        ctx.validate()?;
        if values.len() > ctx.items.len() {
            self.emit(Level::Warn, Category::Render, || {
                format!(
                    "'{}': {} values for {} items, extra values ignored",
                    field,
                    values.len(),
                    ctx.items.len()
                )
            });
        }
        let Some(first) = values.iter().take(ctx.items.len()).find(|v| !is_empty(v)) else {
            return Ok(String::new());
        };

        let morph = self.morph_for(field, first);
        let primitive = self.primitive(morph)?;

        let aligned: Vec<Value> = (0..ctx.items.len())
            .map(|i| values.get(i).cloned().unwrap_or(Value::Null))
            .collect();
        let tuples: Vec<CompareTuple<'_>> = ctx
            .items
            .iter()
            .zip(&aligned)
            .zip(&ctx.colors)
            .map(|((item, value), color)| CompareTuple { item, value, color })
            .collect();

        let inner = primitive.compare(&tuples, ctx);
        self.emit(Level::Debug, Category::Render, || {
            format!(
                "compared '{}' across {} items as {}{}",
                field,
                tuples.len(),
                morph,
                if primitive.has_compare() { "" } else { " (row fallback)" }
            )
        });
        let raw = self.raw_value(field, &Value::Array(aligned.clone()));
        Ok(wrap_field(morph, field, &inner, raw.as_deref(), RenderMode::Compare))
    }

    /// Infallible form of [`try_render_value`](Self::try_render_value).
    ///
    /// # Panics
    ///
    /// In debug builds, when the registry has no primitive for a detected
    /// morph type. Release builds log the error and return an empty string.
    pub fn render_value(&self, value: &Value, field: &str, ctx: &RenderContext) -> String {
        match self.try_render_value(value, field, ctx) {
            Ok(markup) => markup,
            Err(e) => self.fail(field, e),
        }
    }

    /// Infallible form of [`try_render_compare`](Self::try_render_compare).
    /// A mismatched context renders nothing and is reported as an error.
    pub fn render_compare(&self, field: &str, values: &[Value], ctx: &RenderContext) -> String {
        match self.try_render_compare(field, values, ctx) {
            Ok(markup) => markup,
            Err(e) => self.fail(field, e),
        }
    }

    fn fail(&self, field: &str, err: MorphError) -> String {
        let category = match err {
            MorphError::UnregisteredMorph { .. } => Category::Registry,
            _ => Category::Render,
        };
        if category == Category::Registry && cfg!(debug_assertions) {
            panic!("registry drift while rendering '{}': {}", field, err);
        }
        self.emit(Level::Error, category, || format!("'{}': {}", field, err));
        String::new()
    }
}
