use serde_json::Value;

use super::{compare_block, fallback_rows, legend, placeholder, Primitive};
use crate::context::{CompareTuple, RenderContext};
use crate::escape::sanitize_color;
use crate::morph_type::MorphType;
use crate::value::{as_number_list, as_series, format_number};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Sparkline,
    render_single: render,
    render_compare: Some(compare),
};

const WIDTH: f64 = 100.0;
const HEIGHT: f64 = 30.0;

/// Plain numeric arrays, or the values of a label → number series.
pub fn points(value: &Value) -> Option<Vec<f64>> {
    let points = as_number_list(value)
        .or_else(|| as_series(value).map(|s| s.into_iter().map(|(_, v)| v).collect()))?;
    (points.len() >= 2).then_some(points)
}

fn polyline(points: &[f64], lo: f64, hi: f64, stroke: &str) -> String {
    let span = hi - lo;
    let step = WIDTH / (points.len().saturating_sub(1).max(1)) as f64;
    let coords: Vec<String> = points
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let y = if span <= f64::EPSILON {
                HEIGHT / 2.0
            } else {
                HEIGHT - (v - lo) / span * HEIGHT
            };
            format!("{:.2},{:.2}", i as f64 * step, y)
        })
        .collect();
    format!(
        "<polyline fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\" points=\"{}\"></polyline>",
        sanitize_color(stroke),
        coords.join(" ")
    )
}

fn bounds(points: impl Iterator<Item = f64>) -> (f64, f64) {
    points.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    let Some(points) = points(value) else {
        return placeholder();
    };
    let (lo, hi) = bounds(points.iter().copied());
    let last = points.last().copied().unwrap_or_default();
    format!(
        "<span class=\"morph-sparkline\"><svg viewBox=\"0 0 {} {}\" preserveAspectRatio=\"none\" aria-hidden=\"true\">{}</svg><span class=\"morph-sparkline-last\">{}</span><span class=\"morph-sparkline-range\">{} – {}</span></span>",
        WIDTH,
        HEIGHT,
        polyline(&points, lo, hi, "currentColor"),
        format_number(last),
        format_number(lo),
        format_number(hi)
    )
}

/// Every record's line on one vertical scale.
pub fn compare(tuples: &[CompareTuple<'_>], _ctx: &RenderContext) -> String {
    let lines: Vec<Option<Vec<f64>>> = tuples.iter().map(|t| points(t.value)).collect();
    if lines.iter().all(Option::is_none) {
        return fallback_rows(tuples, "sparkline");
    }
    let (lo, hi) = bounds(lines.iter().flatten().flatten().copied());

    let mut svg = String::new();
    for (t, line) in tuples.iter().zip(&lines) {
        if let Some(points) = line {
            svg.push_str(&polyline(points, lo, hi, t.color));
        }
    }
    let body = format!(
        "<div class=\"morph-sparkline morph-sparkline--overlay\"><svg viewBox=\"0 0 {} {}\" preserveAspectRatio=\"none\" aria-hidden=\"true\">{}</svg><span class=\"morph-sparkline-range\">{} – {}</span></div>{}",
        WIDTH,
        HEIGHT,
        svg,
        format_number(lo),
        format_number(hi),
        legend(tuples)
    );
    compare_block("sparkline", &body)
}
