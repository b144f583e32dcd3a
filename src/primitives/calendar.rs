use serde_json::Value;

use super::{compare_block, compare_row, placeholder, Primitive};
use crate::context::{CompareTuple, RenderContext};
use crate::escape::escape_html;
use crate::morph_type::MorphType;
use crate::value::{get_any, month_abbrev, parse_month};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Calendar,
    render_single: render,
    render_compare: Some(compare),
};

/// Active months, indexed January = 0.
pub type MonthSet = [bool; 12];

/// Marks `from..=to`, wrapping past December (`Nov-Feb`).
fn mark_span(set: &mut MonthSet, from: u32, to: u32) {
    let mut m = from;
    loop {
        set[(m - 1) as usize] = true;
        if m == to {
            break;
        }
        m = m % 12 + 1;
    }
}

fn mark_text(set: &mut MonthSet, text: &str) -> bool {
    let mut any = false;
    for part in text.split([',', ';', '/']) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let bounds = part
            .split_once(" to ")
            .or_else(|| part.split_once(['-', '–', '—']));
        let parsed = match bounds {
            Some((a, b)) => parse_month(&Value::String(a.trim().into()))
                .zip(parse_month(&Value::String(b.trim().into()))),
            None => parse_month(&Value::String(part.into())).map(|m| (m, m)),
        };
        if let Some((from, to)) = parsed {
            mark_span(set, from, to);
            any = true;
        }
    }
    any
}

fn mark_value(set: &mut MonthSet, value: &Value) -> bool {
    match value {
        Value::String(s) => mark_text(set, s),
        Value::Number(_) => match parse_month(value) {
            Some(m) => {
                mark_span(set, m, m);
                true
            }
            None => false,
        },
        Value::Array(arr) => arr.iter().fold(false, |any, v| mark_value(set, v) || any),
        Value::Object(o) => {
            if let Some(months) = get_any(o, &["months", "active", "season"]) {
                return mark_value(set, months);
            }
            let from = get_any(o, &["start", "from"]).and_then(parse_month);
            let to = get_any(o, &["end", "to"]).and_then(parse_month);
            match from.zip(to) {
                Some((a, b)) => {
                    mark_span(set, a, b);
                    true
                }
                None => false,
            }
        }
        _ => false,
    }
}

pub fn months(value: &Value) -> Option<MonthSet> {
    let mut set = [false; 12];
    (mark_value(&mut set, value) && set.iter().any(|m| *m)).then_some(set)
}

fn strip(set: &MonthSet) -> String {
    let mut out = String::from("<div class=\"morph-calendar\">");
    for (i, active) in set.iter().enumerate() {
        let name = month_abbrev(i as u32 + 1);
        out.push_str(&format!(
            "<span class=\"morph-month{}\" title=\"{}\">{}</span>",
            if *active { " morph-month--active" } else { "" },
            name,
            &name[..1]
        ));
    }
    out.push_str("</div>");
    out
}

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    match months(value) {
        Some(set) => strip(&set),
        None => placeholder(),
    }
}

pub fn compare(tuples: &[CompareTuple<'_>], _ctx: &RenderContext) -> String {
    let sets: Vec<Option<MonthSet>> = tuples.iter().map(|t| months(t.value)).collect();
    let mut body = String::new();
    for (t, set) in tuples.iter().zip(&sets) {
        let inner = match set {
            Some(s) => strip(s),
            None => placeholder(),
        };
        body.push_str(&compare_row(t, "", &inner));
    }

    let shared: Vec<&str> = (0..12)
        .filter(|&i| sets.iter().all(|s| s.is_some_and(|s| s[i])))
        .map(|i| month_abbrev(i as u32 + 1))
        .collect();
    if shared.is_empty() {
        body.push_str("<div class=\"morph-calendar-shared\">No month shared by all</div>");
    } else {
        body.push_str(&format!(
            "<div class=\"morph-calendar-shared\">All: {}</div>",
            escape_html(&shared.join(", "))
        ));
    }
    compare_block("calendar", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ItemRef;
    use serde_json::json;

    fn active(set: MonthSet) -> Vec<u32> {
        (0..12).filter(|&i| set[i]).map(|i| i as u32 + 1).collect()
    }

    #[test]
    fn reads_names_numbers_and_ranges() {
        assert_eq!(active(months(&json!(["Jan", 3, "July"])).unwrap()), vec![1, 3, 7]);
        assert_eq!(active(months(&json!("Mar-Jun")).unwrap()), vec![3, 4, 5, 6]);
        assert_eq!(active(months(&json!({"months": ["dec"]})).unwrap()), vec![12]);
    }

    #[test]
    fn ranges_wrap_over_new_year() {
        assert_eq!(active(months(&json!("Nov to Feb")).unwrap()), vec![1, 2, 11, 12]);
    }

    #[test]
    fn twelve_cells() {
        let out = render(&json!(["May"]), &RenderContext::single());
        assert_eq!(out.matches("morph-month").count(), 13);
        assert_eq!(out.matches("morph-month--active").count(), 1);
    }

    #[test]
    fn compare_lists_common_months() {
        let items = [ItemRef::new("1", "a", "A"), ItemRef::new("2", "b", "B")];
        let values = [json!("Apr-Jul"), json!(["Jun", "Jul", "Aug"])];
        let tuples = [
            CompareTuple { item: &items[0], value: &values[0], color: "red" },
            CompareTuple { item: &items[1], value: &values[1], color: "blue" },
        ];
        let out = compare(&tuples, &RenderContext::single());
        assert!(out.contains("All: Jun, Jul"));
    }

    #[test]
    fn unreadable_is_placeholder() {
        assert_eq!(render(&json!("whenever"), &RenderContext::single()), crate::primitives::PLACEHOLDER);
    }
}
