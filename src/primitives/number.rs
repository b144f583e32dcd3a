use serde_json::Value;

use super::{numeric_compare, placeholder, Primitive};
use crate::context::{CompareTuple, RenderContext};
use crate::escape::escape_html;
use crate::morph_type::MorphType;
use crate::value::{as_f64, format_number, get_f64, get_str};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Number,
    render_single: render,
    render_compare: Some(compare),
};

/// Plain numbers, numeric strings and `{value, unit}` objects.
pub fn extract(value: &Value) -> Option<f64> {
    match value {
        Value::Object(o) => get_f64(o, &["value", "amount", "count"]),
        other => as_f64(other),
    }
}

fn unit(value: &Value) -> Option<&str> {
    value.as_object().and_then(|o| get_str(o, &["unit", "units"]))
}

fn display(n: f64, source: &Value) -> String {
    match unit(source) {
        Some(u) => format!("{} {}", format_number(n), u),
        None => format_number(n),
    }
}

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    let Some(n) = extract(value) else {
        return placeholder();
    };
    let unit_html = unit(value)
        .map(|u| format!(" <span class=\"morph-unit\">{}</span>", escape_html(u)))
        .unwrap_or_default();
    format!(
        "<span class=\"morph-number\">{}</span>{}",
        format_number(n),
        unit_html
    )
}

pub fn compare(tuples: &[CompareTuple<'_>], _ctx: &RenderContext) -> String {
    numeric_compare(tuples, extract, display)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ItemRef;
    use crate::primitives::PLACEHOLDER;
    use serde_json::json;

    #[test]
    fn renders_with_unit() {
        let out = render(&json!({"value": 1250, "unit": "kg"}), &RenderContext::single());
        assert_eq!(
            out,
            "<span class=\"morph-number\">1,250</span> <span class=\"morph-unit\">kg</span>"
        );
    }

    #[test]
    fn non_numeric_is_placeholder() {
        assert_eq!(render(&json!("lots"), &RenderContext::single()), PLACEHOLDER);
    }

    #[test]
    fn compare_places_average_between_bars() {
        let items = [ItemRef::new("1", "a", "Alpha"), ItemRef::new("2", "b", "Beta")];
        let values = [json!(100), json!(50)];
        let tuples = [
            CompareTuple { item: &items[0], value: &values[0], color: "#aa0000" },
            CompareTuple { item: &items[1], value: &values[1], color: "#0000aa" },
        ];
        let out = compare(&tuples, &RenderContext::single());
        assert!(out.contains("width:100%"));
        assert!(out.contains("width:50%"));
        assert!(out.contains("left:75%"));
        assert!(out.contains("Avg 75"));
        assert!(out.contains("morph-is-max"));
        assert!(out.contains("morph-is-min"));
    }
}
