use serde_json::Value;

use super::{humanize, pct, placeholder, table_compare, Primitive};
use crate::aggregate::global_max;
use crate::context::{CompareTuple, RenderContext};
use crate::escape::{escape_html, escape_value};
use crate::morph_type::MorphType;
use crate::value::{as_f64, format_number, is_empty};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Stats,
    render_single: render,
    render_compare: Some(compare),
};

/// A key/value table with a proportional bar for every numeric entry.
pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    let Some(map) = value.as_object().filter(|m| !m.is_empty()) else {
        return placeholder();
    };
    let numbers: Vec<f64> = map.values().filter_map(as_f64).collect();
    let max = global_max(&numbers);

    let mut out = String::from("<table class=\"morph-stats\"><tbody>");
    for (key, v) in map {
        if is_empty(v) {
            continue;
        }
        let cell = match as_f64(v) {
            Some(n) => format!(
                "<td class=\"morph-stat-bar\"><div class=\"morph-bar-track\"><div class=\"morph-bar-fill\" style=\"width:{}%\"></div></div></td><td class=\"morph-stat-value\">{}</td>",
                pct(n / max * 100.0),
                format_number(n)
            ),
            None => format!("<td colspan=\"2\">{}</td>", escape_value(v)),
        };
        out.push_str(&format!(
            "<tr><th scope=\"row\">{}</th>{}</tr>",
            escape_html(&humanize(key)),
            cell
        ));
    }
    out.push_str("</tbody></table>");
    out
}

fn cell(value: &Value, _ctx: &RenderContext) -> String {
    match as_f64(value) {
        Some(n) => format_number(n),
        None => escape_value(value),
    }
}

pub fn compare(tuples: &[CompareTuple<'_>], ctx: &RenderContext) -> String {
    table_compare(tuples, ctx, cell)
}
