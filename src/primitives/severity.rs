use serde_json::Value;

use super::{compare_block, fallback_rows, item_label, placeholder, Primitive};
use crate::context::{CompareTuple, RenderContext};
use crate::escape::{escape_html, sanitize_color};
use crate::morph_type::MorphType;
use crate::value::{as_f64, get_any};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Severity,
    render_single: render,
    render_compare: Some(compare),
};

pub const LEVELS: [&str; 5] = ["None", "Low", "Moderate", "High", "Critical"];

/// Level words and IUCN Red List codes, checked longest first so
/// "critically endangered" wins over "endangered".
const WORDS: &[(&str, u8)] = &[
    ("critically endangered", 4),
    ("extinct in the wild", 4),
    ("near threatened", 1),
    ("least concern", 0),
    ("vulnerable", 2),
    ("endangered", 3),
    ("catastrophic", 4),
    ("critical", 4),
    ("extinct", 4),
    ("extreme", 4),
    ("moderate", 2),
    ("elevated", 3),
    ("minimal", 1),
    ("severe", 4),
    ("medium", 2),
    ("serious", 3),
    ("minor", 1),
    ("none", 0),
    ("high", 3),
    ("low", 1),
];

const CODES: &[(&str, u8)] = &[
    ("lc", 0),
    ("nt", 1),
    ("vu", 2),
    ("en", 3),
    ("cr", 4),
    ("ew", 4),
    ("ex", 4),
];

/// Severity level 0–4. Numbers are rounded and clamped.
pub fn level(value: &Value) -> Option<u8> {
    match value {
        Value::Object(o) => get_any(o, &["level", "severity", "status", "value", "code"]).and_then(level),
        Value::String(s) => {
            let s = s.trim().to_lowercase();
            if let Some(n) = as_f64(&Value::String(s.clone())) {
                return Some(n.round().clamp(0.0, 4.0) as u8);
            }
            if let Some((_, l)) = CODES.iter().find(|(c, _)| *c == s) {
                return Some(*l);
            }
            WORDS.iter().find(|(w, _)| s.contains(w)).map(|(_, l)| *l)
        }
        other => as_f64(other).map(|n| n.round().clamp(0.0, 4.0) as u8),
    }
}

fn display(value: &Value, level: u8) -> String {
    let raw = match value {
        Value::Object(o) => get_any(o, &["label", "status", "level", "severity"]),
        other => Some(other),
    };
    match raw.and_then(Value::as_str).map(str::trim) {
        Some(s) if !s.is_empty() && as_f64(&Value::String(s.to_string())).is_none() => s.to_string(),
        _ => LEVELS[level as usize].to_string(),
    }
}

fn meter(level: u8) -> String {
    let mut out = format!(
        "<span class=\"morph-severity-meter\" role=\"meter\" aria-valuemin=\"0\" aria-valuemax=\"4\" aria-valuenow=\"{}\">",
        level
    );
    for i in 0..LEVELS.len() as u8 {
        out.push_str(if i <= level && level > 0 {
            "<span class=\"morph-severity-step morph-severity-step--on\"></span>"
        } else {
            "<span class=\"morph-severity-step\"></span>"
        });
    }
    out.push_str("</span>");
    out
}

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    let Some(level) = level(value) else {
        return placeholder();
    };
    format!(
        "<span class=\"morph-severity morph-severity--{}\">{}<span class=\"morph-severity-label\">{}</span></span>",
        level,
        meter(level),
        escape_html(&display(value, level))
    )
}

/// Records placed on the shared five-step scale; the most severe are flagged.
pub fn compare(tuples: &[CompareTuple<'_>], ctx: &RenderContext) -> String {
    let levels: Vec<Option<u8>> = tuples.iter().map(|t| level(t.value)).collect();
    let (Some(highest), Some(lowest)) = (
        levels.iter().flatten().max().copied(),
        levels.iter().flatten().min().copied(),
    ) else {
        return fallback_rows(tuples, "severity");
    };

    let mut body = String::from("<div class=\"morph-severity-scale\">");
    for (step, name) in LEVELS.iter().enumerate() {
        let mut dots = String::new();
        for (t, l) in tuples.iter().zip(&levels) {
            if *l == Some(step as u8) {
                dots.push_str(&format!(
                    "<span class=\"morph-swatch\" style=\"background:{}\" title=\"{}\"></span>",
                    sanitize_color(t.color),
                    escape_html(t.name())
                ));
            }
        }
        body.push_str(&format!(
            "<div class=\"morph-severity-column morph-severity--{}\"><span class=\"morph-severity-name\">{}</span><span class=\"morph-holders\">{}</span></div>",
            step, name, dots
        ));
    }
    body.push_str("</div><ul class=\"morph-severity-list\">");
    for (t, l) in tuples.iter().zip(&levels) {
        let (class, inner) = match l {
            Some(l) if *l == highest && highest > lowest => (
                " class=\"morph-is-max\"",
                format!("{}<span class=\"morph-flag morph-flag--max\">Highest</span>", render(t.value, ctx)),
            ),
            Some(_) => ("", render(t.value, ctx)),
            None => ("", placeholder()),
        };
        body.push_str(&format!("<li{}>{}{}</li>", class, item_label(t), inner));
    }
    body.push_str("</ul>");
    compare_block("severity", &body)
}
