//! # Morph rendering engine
//!
//! Turns untyped record attributes (`serde_json::Value`) into escaped HTML
//! fragments. A detector picks one of 27 primitives from the field name and
//! the value's shape; the primitive renders a single value or a side-by-side
//! comparison across records; a wrapper adds the field container and a
//! base64 copy of the raw value.
//!
//! ## Example
//! ```
//! use morph_engine::{render_value, RenderContext};
//! use serde_json::json;
//!
//! let html = render_value(&json!(["forest", "wetland"]), "habitats", &RenderContext::single());
//! assert!(html.contains("data-morph=\"tag\""));
//! ```
//!
//! ## Comparison
//! ```
//! use morph_engine::{render_compare, ItemRef, RenderContext};
//! use serde_json::json;
//!
//! let items = vec![ItemRef::new("1", "lynx", "Lynx"), ItemRef::new("2", "ocelot", "Ocelot")];
//! let ctx = RenderContext::compare(items, vec!["#e41a1c".into(), "#377eb8".into()]).unwrap();
//! let html = render_compare("body_mass_kg", &[json!(18), json!(11)], &ctx);
//! assert!(html.contains("data-mode=\"compare\""));
//! ```

pub mod aggregate;
pub mod config;
pub mod context;
pub mod detect;
pub mod error;
pub mod escape;
pub mod morph_type;
pub mod observer;
pub mod page;
pub mod primitives;
pub mod render;
pub mod value;
pub mod wrapper;

pub use config::{EngineConfig, DEFAULT_RAW_VALUE_LIMIT};
pub use context::{CompareTuple, ItemRef, RenderContext, RenderMode};
pub use detect::detect;
pub use error::{MorphError, MorphResult};
pub use escape::{escape_html, escape_value, validate_url};
pub use morph_type::MorphType;
pub use observer::{Category, LogObserver, NoopObserver, RenderObserver};
pub use page::render_page;
pub use primitives::{lookup, lookup_name, Primitive, PLACEHOLDER, REGISTRY};
pub use render::Renderer;
pub use wrapper::{decode_raw_value, encode_raw_value, extract_raw_value};

use serde_json::Value;
use std::sync::OnceLock;

fn default_renderer() -> &'static Renderer {
    static RENDERER: OnceLock<Renderer> = OnceLock::new();
    RENDERER.get_or_init(Renderer::default)
}

/// Render one field with the default configuration.
pub fn render_value(value: &Value, field: &str, ctx: &RenderContext) -> String {
    default_renderer().render_value(value, field, ctx)
}

/// Render one field across the records in `ctx` with the default configuration.
pub fn render_compare(field: &str, values: &[Value], ctx: &RenderContext) -> String {
    default_renderer().render_compare(field, values, ctx)
}
