use serde_json::Value;

use super::{compare_block, fallback_rows, legend, pct, placeholder, Primitive};
use crate::aggregate::union_labels;
use crate::context::{CompareTuple, RenderContext};
use crate::escape::escape_html;
use crate::morph_type::MorphType;
use crate::value::{as_series, format_number};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Pie,
    render_single: render,
    render_compare: Some(compare),
};

/// Radius whose circumference is 100, so dash lengths read as percentages.
const R: f64 = 15.9155;

pub const SLICE_PALETTE: [&str; 8] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#9c755f",
];

fn slice_color(i: usize) -> &'static str {
    SLICE_PALETTE[i % SLICE_PALETTE.len()]
}

/// Positive slices with their share of the total, in percent.
pub fn shares(value: &Value) -> Option<Vec<(String, f64, f64)>> {
    let series: Vec<(String, f64)> = as_series(value)?
        .into_iter()
        .filter(|(_, v)| *v > 0.0)
        .collect();
    let total: f64 = series.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        return None;
    }
    Some(
        series
            .into_iter()
            .map(|(l, v)| {
                let share = v / total * 100.0;
                (l, v, share)
            })
            .collect(),
    )
}

fn ring(r: f64, width: f64, slices: &[(usize, f64)]) -> String {
    let mut out = String::new();
    let mut offset = 0.0;
    for (color_idx, share) in slices {
        out.push_str(&format!(
            "<circle cx=\"21\" cy=\"21\" r=\"{:.4}\" pathLength=\"100\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\" stroke-dasharray=\"{:.2} {:.2}\" stroke-dashoffset=\"{:.2}\"></circle>",
            r,
            slice_color(*color_idx),
            width,
            share,
            100.0 - share,
            25.0 - offset
        ));
        offset += share;
    }
    out
}

fn slice_legend(labels: &[(usize, String, Option<f64>)]) -> String {
    let mut out = String::from("<ul class=\"morph-pie-legend\">");
    for (i, label, share) in labels {
        out.push_str(&format!(
            "<li><span class=\"morph-swatch\" style=\"background:{}\"></span>{}",
            slice_color(*i),
            escape_html(label)
        ));
        if let Some(s) = share {
            out.push_str(&format!(" <span class=\"morph-pie-share\">{}%</span>", pct(*s)));
        }
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    let Some(shares) = shares(value) else {
        return placeholder();
    };
    let slices: Vec<(usize, f64)> = shares.iter().enumerate().map(|(i, (_, _, s))| (i, *s)).collect();
    let labels: Vec<(usize, String, Option<f64>)> = shares
        .iter()
        .enumerate()
        .map(|(i, (l, v, s))| (i, format!("{} ({})", l, format_number(*v)), Some(*s)))
        .collect();
    format!(
        "<div class=\"morph-pie\"><svg viewBox=\"0 0 42 42\" class=\"morph-pie-svg\" aria-hidden=\"true\">{}</svg>{}</div>",
        ring(R, 6.0, &slices),
        slice_legend(&labels)
    )
}

/// Concentric rings, outermost first, one per record. Slice colors follow
/// the union of labels so the same label matches across rings.
pub fn compare(tuples: &[CompareTuple<'_>], _ctx: &RenderContext) -> String {
    let per_record: Vec<Option<Vec<(String, f64, f64)>>> =
        tuples.iter().map(|t| shares(t.value)).collect();
    let labels = union_labels(
        per_record
            .iter()
            .flatten()
            .map(|s| s.iter().map(|(l, _, _)| l)),
    );
    if labels.is_empty() {
        return fallback_rows(tuples, "pie");
    }

    let n = tuples.len().max(1) as f64;
    let width = (12.0 / n).min(5.0);
    let mut svg = String::new();
    for (i, (t, shares)) in tuples.iter().zip(&per_record).enumerate() {
        let r = R - i as f64 * width;
        let Some(shares) = shares else {
            continue;
        };
        let slices: Vec<(usize, f64)> = shares
            .iter()
            .filter_map(|(l, _, s)| labels.iter().position(|x| x == l).map(|idx| (idx, *s)))
            .collect();
        svg.push_str(&format!(
            "<g class=\"morph-pie-ring\"><title>{}</title>{}</g>",
            escape_html(t.name()),
            ring(r, width * 0.9, &slices)
        ));
    }

    let label_legend: Vec<(usize, String, Option<f64>)> = labels
        .iter()
        .enumerate()
        .map(|(i, l)| (i, l.clone(), None))
        .collect();
    let body = format!(
        "<div class=\"morph-pie\"><svg viewBox=\"0 0 42 42\" class=\"morph-pie-svg\" aria-hidden=\"true\">{}</svg>{}</div>{}",
        svg,
        slice_legend(&label_legend),
        legend(tuples)
    );
    compare_block("pie", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ItemRef;
    use serde_json::json;

    #[test]
    fn shares_sum_to_hundred() {
        let s = shares(&json!({"a": 1, "b": 3, "neg": -2})).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].2 + s[1].2, 100.0);
        let out = render(&json!({"a": 1, "b": 3}), &RenderContext::single());
        assert!(out.contains("stroke-dasharray=\"25.00 75.00\""));
        assert!(out.contains("stroke-dashoffset=\"0.00\""));
    }

    #[test]
    fn one_ring_per_record() {
        let items = [ItemRef::new("1", "a", "A"), ItemRef::new("2", "b", "B")];
        let values = [json!({"x": 1}), json!({"y": 1, "x": 1})];
        let tuples = [
            CompareTuple { item: &items[0], value: &values[0], color: "red" },
            CompareTuple { item: &items[1], value: &values[1], color: "blue" },
        ];
        let out = compare(&tuples, &RenderContext::single());
        assert_eq!(out.matches("morph-pie-ring").count(), 2);
        assert!(out.contains("morph-legend"));
    }
}
