use serde_json::Value;

use super::{compare_block, fallback_rows, item_label, legend, pct, placeholder, Primitive};
use crate::aggregate::{union_labels, NumericSummary};
use crate::context::{CompareTuple, RenderContext};
use crate::escape::{escape_html, sanitize_color};
use crate::morph_type::MorphType;
use crate::value::{as_series, format_number};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Bar,
    render_single: render,
    render_compare: Some(compare),
};

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    let Some(series) = as_series(value) else {
        return placeholder();
    };
    let max = series
        .iter()
        .map(|(_, v)| v.abs())
        .fold(0.0_f64, f64::max)
        .max(f64::EPSILON);

    let mut out = String::from("<div class=\"morph-barchart\">");
    for (label, v) in &series {
        out.push_str(&format!(
            "<div class=\"morph-bar-row\"><span class=\"morph-bar-label\">{}</span><div class=\"morph-bar-track\"><div class=\"morph-bar-fill\" style=\"width:{}%\"></div></div><span class=\"morph-bar-value\">{}</span></div>",
            escape_html(label),
            pct(v.abs() / max * 100.0),
            format_number(*v)
        ));
    }
    out.push_str("</div>");
    out
}

/// One group per label; inside it, one bar per record on that label's axis.
pub fn compare(tuples: &[CompareTuple<'_>], _ctx: &RenderContext) -> String {
    let series: Vec<Vec<(String, f64)>> = tuples
        .iter()
        .map(|t| as_series(t.value).unwrap_or_default())
        .collect();
    let labels = union_labels(series.iter().map(|s| s.iter().map(|(l, _)| l)));
    if labels.is_empty() {
        return fallback_rows(tuples, "bar");
    }

    let mut body = String::new();
    for label in &labels {
        let values: Vec<Option<f64>> = series
            .iter()
            .map(|s| s.iter().find(|(l, _)| l == label).map(|(_, v)| *v))
            .collect();
        let Some(summary) = NumericSummary::from_values(values) else {
            continue;
        };
        body.push_str(&format!(
            "<div class=\"morph-bar-group\"><h4 class=\"morph-bar-group-label\">{}</h4>",
            escape_html(label)
        ));
        let avg_left = pct(summary.mean_position());
        for (t, v) in tuples.iter().zip(&summary.values) {
            let (width, text) = match v {
                Some(v) => (pct(summary.position(*v)), format_number(*v)),
                None => ("0".to_string(), "–".to_string()),
            };
            let class = match v {
                Some(v) if summary.is_max(*v) => "morph-bar-row morph-is-max",
                Some(v) if summary.is_min(*v) => "morph-bar-row morph-is-min",
                _ => "morph-bar-row",
            };
            body.push_str(&format!(
                "<div class=\"{}\">{}<div class=\"morph-bar-track\"><div class=\"morph-bar-fill\" style=\"width:{}%;background:{}\"></div><div class=\"morph-avg-marker\" style=\"left:{}%\" title=\"Average\"></div></div><span class=\"morph-bar-value\">{}</span></div>",
                class,
                item_label(t),
                width,
                sanitize_color(t.color),
                avg_left,
                text
            ));
        }
        body.push_str("</div>");
    }
    body.push_str(&legend(tuples));
    compare_block("bar", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ItemRef;
    use serde_json::json;

    #[test]
    fn scales_to_largest_bar() {
        let out = render(&json!({"seeds": 40, "insects": 20}), &RenderContext::single());
        assert!(out.contains("width:100%"));
        assert!(out.contains("width:50%"));
    }

    #[test]
    fn compare_unions_labels() {
        let items = [ItemRef::new("1", "a", "A"), ItemRef::new("2", "b", "B")];
        let values = [json!({"seeds": 40}), json!([{"label": "fruit", "value": 10}, {"label": "seeds", "value": 20}])];
        let tuples = [
            CompareTuple { item: &items[0], value: &values[0], color: "red" },
            CompareTuple { item: &items[1], value: &values[1], color: "blue" },
        ];
        let out = compare(&tuples, &RenderContext::single());
        assert_eq!(out.matches("morph-bar-group\"").count(), 2);
        // seeds: 40 vs 20 → mean 30 on a 0..40 axis
        assert!(out.contains("left:75%"));
        assert!(out.contains("morph-is-max"));
    }
}
