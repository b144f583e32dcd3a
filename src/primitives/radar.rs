use serde_json::Value;
use std::f64::consts::PI;

use super::{bar, compare_block, legend, Primitive};
use crate::aggregate::{global_max, union_labels};
use crate::context::{CompareTuple, RenderContext};
use crate::escape::{escape_html, sanitize_color};
use crate::morph_type::MorphType;
use crate::value::{as_series, format_number};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Radar,
    render_single: render,
    render_compare: Some(compare),
};

const CENTER: f64 = 50.0;
const RADIUS: f64 = 38.0;
/// Fewer axes than this cannot form a polygon.
const MIN_AXES: usize = 3;

fn vertex(i: usize, n: usize, fraction: f64) -> (f64, f64) {
    let angle = -PI / 2.0 + i as f64 * 2.0 * PI / n as f64;
    let r = RADIUS * fraction.clamp(0.0, 1.0);
    (CENTER + r * angle.cos(), CENTER + r * angle.sin())
}

fn points_attr(fractions: &[f64]) -> String {
    let n = fractions.len();
    fractions
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let (x, y) = vertex(i, n, *f);
            format!("{:.2},{:.2}", x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn frame(axes: &[String]) -> String {
    let n = axes.len();
    let mut out = format!(
        "<polygon class=\"morph-radar-grid\" fill=\"none\" points=\"{}\"></polygon>",
        points_attr(&vec![1.0; n])
    );
    for (i, axis) in axes.iter().enumerate() {
        let (x, y) = vertex(i, n, 1.0);
        let (lx, ly) = vertex(i, n, 1.18);
        out.push_str(&format!(
            "<line class=\"morph-radar-axis\" x1=\"{}\" y1=\"{}\" x2=\"{:.2}\" y2=\"{:.2}\"></line><text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{}</text>",
            CENTER,
            CENTER,
            x,
            y,
            lx,
            ly,
            escape_html(axis)
        ));
    }
    out
}

fn svg(inner: &str) -> String {
    format!(
        "<svg viewBox=\"-10 -10 120 120\" class=\"morph-radar-svg\" aria-hidden=\"true\">{}</svg>",
        inner
    )
}

pub fn render(value: &Value, ctx: &RenderContext) -> String {
    let series = match as_series(value) {
        Some(s) if s.len() >= MIN_AXES => s,
        _ => return bar::render(value, ctx),
    };
    let max = global_max(series.iter().map(|(_, v)| v));
    let axes: Vec<String> = series.iter().map(|(l, _)| l.clone()).collect();
    let fractions: Vec<f64> = series.iter().map(|(_, v)| v / max).collect();

    let mut inner = frame(&axes);
    inner.push_str(&format!(
        "<polygon class=\"morph-radar-shape\" points=\"{}\"></polygon>",
        points_attr(&fractions)
    ));
    let mut values = String::from("<dl class=\"morph-radar-values\">");
    for (l, v) in &series {
        values.push_str(&format!("<dt>{}</dt><dd>{}</dd>", escape_html(l), format_number(*v)));
    }
    values.push_str("</dl>");
    format!("<div class=\"morph-radar\">{}{}</div>", svg(&inner), values)
}

/// One polygon per record over the union of axes, scaled to the largest
/// value in any record. Missing axes sit at the center.
pub fn compare(tuples: &[CompareTuple<'_>], ctx: &RenderContext) -> String {
    let series: Vec<Vec<(String, f64)>> = tuples
        .iter()
        .map(|t| as_series(t.value).unwrap_or_default())
        .collect();
    let axes = union_labels(series.iter().map(|s| s.iter().map(|(l, _)| l)));
    if axes.len() < MIN_AXES {
        return bar::compare(tuples, ctx);
    }
    let max = global_max(series.iter().flatten().map(|(_, v)| v));

    let mut inner = frame(&axes);
    for (t, s) in tuples.iter().zip(&series) {
        if s.is_empty() {
            continue;
        }
        let fractions: Vec<f64> = axes
            .iter()
            .map(|a| s.iter().find(|(l, _)| l == a).map(|(_, v)| v / max).unwrap_or(0.0))
            .collect();
        let color = sanitize_color(t.color);
        inner.push_str(&format!(
            "<polygon class=\"morph-radar-shape\" points=\"{}\" fill=\"{}\" fill-opacity=\"0.2\" stroke=\"{}\"><title>{}</title></polygon>",
            points_attr(&fractions),
            color,
            color,
            escape_html(t.name())
        ));
    }
    let body = format!("<div class=\"morph-radar\">{}</div>{}", svg(&inner), legend(tuples));
    compare_block("radar", &body)
}
