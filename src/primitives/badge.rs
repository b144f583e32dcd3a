use serde_json::Value;

use super::{frequency_compare, placeholder, Primitive};
use crate::context::{CompareTuple, RenderContext};
use crate::escape::escape_html;
use crate::morph_type::MorphType;
use crate::value::{as_label_list, scalar_text};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Badge,
    render_single: render,
    render_compare: Some(compare),
};

const TONES: [&str; 6] = ["slate", "emerald", "amber", "sky", "rose", "violet"];

/// Stable tone per label so the same value always gets the same color.
/// Purely visual; carries no meaning.
fn tone(label: &str) -> &'static str {
    let hash = label
        .to_lowercase()
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
    TONES[(hash as usize) % TONES.len()]
}

pub fn badge_html(label: &str) -> String {
    format!(
        "<span class=\"morph-badge morph-badge--{}\">{}</span>",
        tone(label),
        escape_html(label)
    )
}

fn labels(value: &Value) -> Vec<String> {
    match value {
        Value::Array(_) => as_label_list(value).unwrap_or_default(),
        other => scalar_text(other).into_iter().collect(),
    }
}

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    let labels = labels(value);
    if labels.is_empty() {
        return placeholder();
    }
    labels
        .iter()
        .map(|l| badge_html(l))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn compare(tuples: &[CompareTuple<'_>], _ctx: &RenderContext) -> String {
    frequency_compare(tuples, labels)
}
