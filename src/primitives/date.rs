use serde_json::Value;

use super::{placeholder, temporal_compare, DatedEvent, Primitive};
use crate::context::{CompareTuple, RenderContext};
use crate::escape::escape_html;
use crate::morph_type::MorphType;
use crate::value::{format_date, parse_date};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Date,
    render_single: render,
    render_compare: Some(compare),
};

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    match parse_date(value) {
        Some(day) => format!(
            "<time class=\"morph-date\" datetime=\"{}\">{}</time>",
            day.format("%Y-%m-%d"),
            escape_html(&format_date(day, value))
        ),
        // Free text such as "late Cretaceous" is still worth showing.
        None => match value.as_str().map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => format!(
                "<span class=\"morph-date morph-date--text\">{}</span>",
                escape_html(s)
            ),
            None => placeholder(),
        },
    }
}

fn events(value: &Value) -> Option<Vec<DatedEvent>> {
    let day = parse_date(value)?;
    Some(vec![(day, format_date(day, value))])
}

pub fn compare(tuples: &[CompareTuple<'_>], ctx: &RenderContext) -> String {
    temporal_compare(tuples, ctx, events, render)
}
