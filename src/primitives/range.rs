use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use super::{compare_block, item_label, legend, pct, placeholder, Primitive};
use crate::context::{CompareTuple, RenderContext};
use crate::escape::{escape_html, sanitize_color};
use crate::morph_type::MorphType;
use crate::value::{as_f64, format_number, get_f64, get_str};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Range,
    render_single: render,
    render_compare: Some(compare),
};

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub lo: f64,
    pub hi: f64,
    pub unit: Option<String>,
}

fn range_regex() -> &'static Regex {
    static RANGE_REGEX: OnceLock<Regex> = OnceLock::new();
    RANGE_REGEX.get_or_init(|| {
        Regex::new(r"^\s*(-?[\d,]*\.?\d+)\s*(?:-|–|—|to)\s*(-?[\d,]*\.?\d+)\s*([^\d\s][^\d]*)?$").unwrap()
    })
}

/// `{min, max, unit}`, `[lo, hi]` or `"lo-hi unit"`. Bounds are reordered
/// when given backwards.
pub fn parse_span(value: &Value) -> Option<Span> {
    let (a, b, unit) = match value {
        Value::Object(o) => (
            get_f64(o, &["min", "low", "from", "start"])?,
            get_f64(o, &["max", "high", "to", "end"])?,
            get_str(o, &["unit", "units"]).map(str::to_string),
        ),
        Value::Array(arr) if arr.len() == 2 => (as_f64(&arr[0])?, as_f64(&arr[1])?, None),
        Value::String(s) => {
            let caps = range_regex().captures(s)?;
            let a = as_f64(&Value::String(caps[1].to_string()))?;
            let b = as_f64(&Value::String(caps[2].to_string()))?;
            let unit = caps
                .get(3)
                .map(|m| m.as_str().trim().to_string())
                .filter(|u| !u.is_empty());
            (a, b, unit)
        }
        _ => return None,
    };
    Some(Span {
        lo: a.min(b),
        hi: a.max(b),
        unit,
    })
}

fn span_text(span: &Span) -> String {
    let body = if span.lo == span.hi {
        format_number(span.lo)
    } else {
        format!("{} – {}", format_number(span.lo), format_number(span.hi))
    };
    match &span.unit {
        Some(u) => format!("{} {}", body, u),
        None => body,
    }
}

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    match parse_span(value) {
        Some(span) => format!(
            "<span class=\"morph-range\">{}</span>",
            escape_html(&span_text(&span))
        ),
        None => placeholder(),
    }
}

/// Every record's band on one axis spanning the union of all ranges, plus
/// the overlap shared by all of them.
pub fn compare(tuples: &[CompareTuple<'_>], _ctx: &RenderContext) -> String {
    let spans: Vec<Option<Span>> = tuples.iter().map(|t| parse_span(t.value)).collect();
    let valid: Vec<&Span> = spans.iter().flatten().collect();
    if valid.is_empty() {
        return compare_block("range", &format!("{}{}", placeholder(), legend(tuples)));
    }

    let axis_lo = valid.iter().map(|s| s.lo).fold(f64::INFINITY, f64::min);
    let axis_hi = valid.iter().map(|s| s.hi).fold(f64::NEG_INFINITY, f64::max);
    let width = (axis_hi - axis_lo).max(f64::EPSILON);
    let unit = valid.iter().find_map(|s| s.unit.clone());

    let overlap_lo = valid.iter().map(|s| s.lo).fold(f64::NEG_INFINITY, f64::max);
    let overlap_hi = valid.iter().map(|s| s.hi).fold(f64::INFINITY, f64::min);
    let shared = valid.len() == spans.len() && overlap_lo <= overlap_hi;

    let mut body = format!(
        "<div class=\"morph-range-axis\"><span>{}</span><span>{}</span></div>",
        format_number(axis_lo),
        escape_html(&match &unit {
            Some(u) => format!("{} {}", format_number(axis_hi), u),
            None => format_number(axis_hi),
        })
    );
    if shared {
        let overlap = Span {
            lo: overlap_lo,
            hi: overlap_hi,
            unit: unit.clone(),
        };
        body.push_str(&format!(
            "<div class=\"morph-range-overlap\" style=\"left:{}%;width:{}%\" title=\"Shared by all\"></div><p class=\"morph-note\">Overlap: {}</p>",
            pct((overlap_lo - axis_lo) / width * 100.0),
            pct((overlap_hi - overlap_lo) / width * 100.0),
            escape_html(&span_text(&overlap))
        ));
    } else {
        body.push_str("<p class=\"morph-note\">No range shared by all</p>");
    }

    for (t, span) in tuples.iter().zip(&spans) {
        let band = match span {
            Some(s) => format!(
                "<div class=\"morph-range-track\"><div class=\"morph-range-band\" style=\"left:{}%;width:{}%;background:{}\"></div></div><span class=\"morph-range-value\">{}</span>",
                pct((s.lo - axis_lo) / width * 100.0),
                pct(((s.hi - s.lo) / width * 100.0).max(1.0)),
                sanitize_color(t.color),
                escape_html(&span_text(s))
            ),
            None => placeholder(),
        };
        body.push_str(&format!(
            "<div class=\"morph-range-row\">{}{}</div>",
            item_label(t),
            band
        ));
    }
    compare_block("range", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ItemRef;
    use serde_json::json;

    #[test]
    fn parses_every_shape() {
        let expected = Span { lo: 2.0, hi: 5.0, unit: Some("kg".into()) };
        assert_eq!(parse_span(&json!({"min": 2, "max": 5, "unit": "kg"})), Some(expected.clone()));
        assert_eq!(parse_span(&json!("2-5 kg")), Some(expected.clone()));
        assert_eq!(parse_span(&json!("5 – 2 kg")), Some(expected));
        assert_eq!(
            parse_span(&json!([10, 3])),
            Some(Span { lo: 3.0, hi: 10.0, unit: None })
        );
        assert_eq!(parse_span(&json!("1,200 to 1,500 m")).map(|s| s.hi), Some(1500.0));
        assert_eq!(parse_span(&json!("tall")), None);
    }

    #[test]
    fn compare_finds_overlap() {
        let items = [ItemRef::new("1", "a", "Alpha"), ItemRef::new("2", "b", "Beta")];
        let values = [json!([0, 10]), json!([5, 20])];
        let tuples = [
            CompareTuple { item: &items[0], value: &values[0], color: "red" },
            CompareTuple { item: &items[1], value: &values[1], color: "blue" },
        ];
        let out = compare(&tuples, &RenderContext::single());
        assert!(out.contains("Overlap: 5 – 10"));
        assert!(out.contains("left:25%;width:75%;background:blue"));
    }

    #[test]
    fn disjoint_ranges_have_no_overlap() {
        let items = [ItemRef::new("1", "a", "Alpha"), ItemRef::new("2", "b", "Beta")];
        let values = [json!("1-2"), json!("8-9")];
        let tuples = [
            CompareTuple { item: &items[0], value: &values[0], color: "red" },
            CompareTuple { item: &items[1], value: &values[1], color: "blue" },
        ];
        assert!(compare(&tuples, &RenderContext::single()).contains("No range shared by all"));
    }
}
