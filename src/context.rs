use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MorphError, MorphResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Single,
    Compare,
    /// Compact variant of single mode used in card grids.
    Grid,
}

/// Identifies one record taking part in a render.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: String,
    pub slug: String,
    pub name: String,
}

impl ItemRef {
    pub fn new(id: impl Into<String>, slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            name: name.into(),
        }
    }
}

/// How a value is being rendered. In compare mode `items`, `colors` and
/// `item_count` always agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    pub mode: RenderMode,
    pub item_count: usize,
    #[serde(default)]
    pub items: Vec<ItemRef>,
    #[serde(default)]
    pub colors: Vec<String>,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::single()
    }
}

impl RenderContext {
    pub fn single() -> Self {
        Self {
            mode: RenderMode::Single,
            item_count: 1,
            items: Vec::new(),
            colors: Vec::new(),
        }
    }

    pub fn grid(items: Vec<ItemRef>) -> Self {
        Self {
            mode: RenderMode::Grid,
            item_count: items.len().max(1),
            items,
            colors: Vec::new(),
        }
    }

    pub fn compare(items: Vec<ItemRef>, colors: Vec<String>) -> MorphResult<Self> {
        let ctx = Self {
            mode: RenderMode::Compare,
            item_count: items.len(),
            items,
            colors,
        };
        ctx.validate()?;
        Ok(ctx)
    }

    /// Check the compare-mode length invariant. Other modes always pass.
    pub fn validate(&self) -> MorphResult<()> {
        if self.mode != RenderMode::Compare {
            return Ok(());
        }
        if self.items.len() != self.colors.len() || self.items.len() != self.item_count {
            return Err(MorphError::ContextMismatch {
                items: self.items.len(),
                colors: self.colors.len(),
                item_count: self.item_count,
            });
        }
        Ok(())
    }

    pub fn is_compact(&self) -> bool {
        self.mode == RenderMode::Grid
    }
}

/// One record's contribution to a comparison: the record, its value for the
/// field being compared, and its assigned color token.
#[derive(Debug, Clone, Copy)]
pub struct CompareTuple<'a> {
    pub item: &'a ItemRef,
    pub value: &'a Value,
    pub color: &'a str,
}

impl<'a> CompareTuple<'a> {
    pub fn name(&self) -> &'a str {
        if self.item.name.is_empty() {
            &self.item.slug
        } else {
            &self.item.name
        }
    }
}
