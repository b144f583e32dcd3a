use serde_json::Value;

use super::{identity_compare, placeholder, Primitive};
use crate::context::{CompareTuple, RenderContext};
use crate::escape::{escape_html, value_text};
use crate::morph_type::MorphType;

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Text,
    render_single: render,
    render_compare: Some(compare),
};

/// Grid cards cut text at this many characters.
const COMPACT_CHARS: usize = 80;

pub fn render(value: &Value, ctx: &RenderContext) -> String {
    let text = value_text(value);
    let text = text.trim();
    if text.is_empty() {
        return placeholder();
    }

    if ctx.is_compact() {
        let count = text.chars().count();
        if count > COMPACT_CHARS {
            let cut: String = text.chars().take(COMPACT_CHARS).collect();
            return format!(
                "<span class=\"morph-text morph-text--clipped\" title=\"{}\">{}…</span>",
                escape_html(text),
                escape_html(cut.trim_end())
            );
        }
    }

    let paragraphs: Vec<&str> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if paragraphs.len() > 1 {
        let mut out = String::from("<div class=\"morph-text\">");
        for p in paragraphs {
            out.push_str(&format!("<p>{}</p>", escape_html(p)));
        }
        out.push_str("</div>");
        return out;
    }

    format!("<span class=\"morph-text\">{}</span>", escape_html(text))
}

fn identity_key(value: &Value) -> Option<String> {
    let text = value_text(value);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

pub fn compare(tuples: &[CompareTuple<'_>], ctx: &RenderContext) -> String {
    identity_compare(tuples, ctx, identity_key, render)
}
