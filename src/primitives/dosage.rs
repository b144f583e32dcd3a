use serde_json::Value;

use super::{placeholder, Primitive};
use crate::context::RenderContext;
use crate::escape::escape_html;
use crate::morph_type::MorphType;
use crate::value::{get_any, get_str, scalar_text};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Dosage,
    render_single: render,
    render_compare: None,
};

/// `{amount, unit, frequency, route, duration}` as display parts, in that order.
pub fn parts(value: &Value) -> Option<Vec<(&'static str, String)>> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(vec![("dose", s.trim().to_string())]),
        Value::Number(_) => scalar_text(value).map(|s| vec![("dose", s)]),
        Value::Object(o) => {
            let mut out = Vec::new();
            if let Some(amount) = get_any(o, &["amount", "dose", "value", "quantity"]).and_then(scalar_text) {
                let dose = match get_str(o, &["unit", "units"]) {
                    Some(unit) => format!("{} {}", amount, unit),
                    None => amount,
                };
                out.push(("dose", dose));
            }
            for (class, keys) in [
                ("frequency", &["frequency", "schedule", "interval"][..]),
                ("route", &["route", "method"][..]),
                ("duration", &["duration", "course"][..]),
            ] {
                if let Some(v) = get_any(o, keys).and_then(scalar_text) {
                    out.push((class, v));
                }
            }
            (!out.is_empty()).then_some(out)
        }
        _ => None,
    }
}

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    let Some(parts) = parts(value) else {
        return placeholder();
    };
    let spans: Vec<String> = parts
        .iter()
        .map(|(class, text)| {
            format!(
                "<span class=\"morph-dosage-{}\">{}</span>",
                class,
                escape_html(text)
            )
        })
        .collect();
    format!("<span class=\"morph-dosage\">{}</span>", spans.join(" · "))
}
