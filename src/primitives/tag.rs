use serde_json::Value;

use super::{frequency_compare, more_marker, placeholder, Primitive, COMPACT_LIMIT};
use crate::context::{CompareTuple, RenderContext};
use crate::escape::escape_html;
use crate::morph_type::MorphType;
use crate::value::as_label_list;

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Tag,
    render_single: render,
    render_compare: Some(compare),
};

fn labels(value: &Value) -> Vec<String> {
    as_label_list(value).unwrap_or_default()
}

pub fn render(value: &Value, ctx: &RenderContext) -> String {
    let labels = labels(value);
    if labels.is_empty() {
        return placeholder();
    }
    let shown = if ctx.is_compact() {
        COMPACT_LIMIT.min(labels.len())
    } else {
        labels.len()
    };
    let mut out = String::from("<ul class=\"morph-tags\">");
    for label in &labels[..shown] {
        out.push_str(&format!("<li class=\"morph-tag\">{}</li>", escape_html(label)));
    }
    out.push_str("</ul>");
    out.push_str(&more_marker(labels.len() - shown));
    out
}

pub fn compare(tuples: &[CompareTuple<'_>], _ctx: &RenderContext) -> String {
    frequency_compare(tuples, labels)
}
