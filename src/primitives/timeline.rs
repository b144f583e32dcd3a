use serde_json::Value;

use super::{more_marker, placeholder, temporal_compare, DatedEvent, Primitive, COMPACT_LIMIT};
use crate::context::{CompareTuple, RenderContext};
use crate::escape::escape_html;
use crate::morph_type::MorphType;
use crate::value::{format_date, get_any, get_str, parse_date, scalar_text};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Timeline,
    render_single: render,
    render_compare: Some(compare),
};

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Date as entered.
    pub when: Value,
    pub label: String,
}

/// `[{date, label}]` or `{date: label}`. Entries without a date are dropped.
pub fn read_events(value: &Value) -> Option<Vec<Event>> {
    let events: Vec<Event> = match value {
        Value::Array(arr) => arr
            .iter()
            .filter_map(|e| {
                let o = e.as_object()?;
                let when = get_any(o, &["date", "year", "when", "at"])?.clone();
                let label = get_str(o, &["label", "event", "title", "description", "name"])
                    .unwrap_or("")
                    .to_string();
                Some(Event { when, label })
            })
            .collect(),
        Value::Object(o) => o
            .iter()
            .map(|(k, v)| Event {
                when: Value::String(k.clone()),
                label: scalar_text(v).unwrap_or_default(),
            })
            .collect(),
        _ => return None,
    };
    (!events.is_empty()).then_some(events)
}

fn when_text(when: &Value) -> String {
    match parse_date(when) {
        Some(day) => format_date(day, when),
        None => scalar_text(when).unwrap_or_default(),
    }
}

pub fn render(value: &Value, ctx: &RenderContext) -> String {
    let Some(mut events) = read_events(value) else {
        return placeholder();
    };
    let dates: Option<Vec<_>> = events.iter().map(|e| parse_date(&e.when)).collect();
    if let Some(dates) = dates {
        let mut keyed: Vec<_> = dates.into_iter().zip(events).collect();
        keyed.sort_by_key(|(d, _)| *d);
        events = keyed.into_iter().map(|(_, e)| e).collect();
    }

    let shown = if ctx.is_compact() {
        COMPACT_LIMIT.min(events.len())
    } else {
        events.len()
    };
    let mut out = String::from("<ol class=\"morph-timeline\">");
    for e in &events[..shown] {
        let datetime = parse_date(&e.when)
            .map(|d| format!(" datetime=\"{}\"", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        out.push_str(&format!(
            "<li class=\"morph-timeline-event\"><time{}>{}</time> <span class=\"morph-timeline-label\">{}</span></li>",
            datetime,
            escape_html(&when_text(&e.when)),
            escape_html(&e.label)
        ));
    }
    out.push_str("</ol>");
    out.push_str(&more_marker(events.len() - shown));
    out
}

fn dated_events(value: &Value) -> Option<Vec<DatedEvent>> {
    read_events(value)?
        .into_iter()
        .map(|e| {
            let day = parse_date(&e.when)?;
            let text = if e.label.is_empty() {
                format_date(day, &e.when)
            } else {
                format!("{} {}", format_date(day, &e.when), e.label)
            };
            Some((day, text))
        })
        .collect()
}

pub fn compare(tuples: &[CompareTuple<'_>], ctx: &RenderContext) -> String {
    temporal_compare(tuples, ctx, dated_events, render)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ItemRef;
    use serde_json::json;

    #[test]
    fn sorts_events_by_date() {
        let out = render(
            &json!([{"year": 2010, "event": "Listed"}, {"year": 1990, "event": "Described"}]),
            &RenderContext::single(),
        );
        let described = out.find("Described").unwrap();
        let listed = out.find("Listed").unwrap();
        assert!(described < listed);
    }

    #[test]
    fn map_form_and_grid_cap() {
        let value = json!({"2001": "a", "2002": "b", "2003": "c", "2004": "d"});
        let out = render(&value, &RenderContext::grid(vec![]));
        assert_eq!(out.matches("morph-timeline-event").count(), 3);
        assert!(out.contains("+1 more"));
    }

    #[test]
    fn compare_marks_shared_days() {
        let items = [ItemRef::new("1", "a", "A"), ItemRef::new("2", "b", "B")];
        let values = [
            json!([{"date": "2000-05-01", "label": "Survey"}, {"date": "2004-01-01", "label": "Count"}]),
            json!([{"date": "2000-05-01", "label": "Survey"}]),
        ];
        let tuples = [
            CompareTuple { item: &items[0], value: &values[0], color: "red" },
            CompareTuple { item: &items[1], value: &values[1], color: "blue" },
        ];
        let out = compare(&tuples, &RenderContext::single());
        assert_eq!(out.matches("morph-marker morph-converge").count(), 2);
        assert_eq!(out.matches("class=\"morph-marker\"").count(), 1);
    }
}
