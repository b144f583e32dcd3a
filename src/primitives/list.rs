use serde_json::Value;

use super::{frequency_compare, humanize, more_marker, placeholder, Primitive, COMPACT_LIMIT};
use crate::context::{CompareTuple, RenderContext};
use crate::escape::{escape_html, value_text};
use crate::morph_type::MorphType;
use crate::value::{as_label_list, is_empty, scalar_text};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::List,
    render_single: render,
    render_compare: Some(compare),
};

fn entry_html(entry: &Value) -> String {
    match entry {
        Value::Object(o) => {
            let parts: Vec<String> = o
                .iter()
                .filter(|(_, v)| !is_empty(v))
                .map(|(k, v)| {
                    format!(
                        "<span class=\"morph-list-key\">{}</span> {}",
                        escape_html(&humanize(k)),
                        escape_html(&value_text(v))
                    )
                })
                .collect();
            parts.join(", ")
        }
        Value::Array(inner) => inner
            .iter()
            .filter_map(scalar_text)
            .map(|s| escape_html(&s))
            .collect::<Vec<_>>()
            .join(", "),
        other => escape_html(&value_text(other)),
    }
}

pub fn render(value: &Value, ctx: &RenderContext) -> String {
    let entries: Vec<&Value> = match value {
        Value::Array(arr) => arr.iter().filter(|v| !is_empty(v)).collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    };
    if entries.is_empty() {
        return placeholder();
    }
    let shown = if ctx.is_compact() {
        COMPACT_LIMIT.min(entries.len())
    } else {
        entries.len()
    };
    let mut out = String::from("<ul class=\"morph-list\">");
    for entry in &entries[..shown] {
        out.push_str("<li>");
        out.push_str(&entry_html(entry));
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out.push_str(&more_marker(entries.len() - shown));
    out
}

fn labels(value: &Value) -> Vec<String> {
    match value {
        Value::Array(arr) => arr
            .iter()
            .filter(|v| !is_empty(v))
            .map(|v| scalar_text(v).unwrap_or_else(|| value_text(v)))
            .collect(),
        other => as_label_list(other).unwrap_or_default(),
    }
}

pub fn compare(tuples: &[CompareTuple<'_>], _ctx: &RenderContext) -> String {
    frequency_compare(tuples, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ItemRef;
    use serde_json::json;

    #[test]
    fn renders_mixed_entries() {
        let out = render(
            &json!(["Seeds", {"prey": "beetles", "share": "20%"}, null]),
            &RenderContext::single(),
        );
        assert!(out.starts_with("<ul class=\"morph-list\"><li>Seeds</li>"));
        assert!(out.contains("<span class=\"morph-list-key\">Prey</span> beetles"));
        assert_eq!(out.matches("<li>").count(), 2);
    }

    #[test]
    fn compare_classifies_three_ways() {
        let items = [
            ItemRef::new("1", "a", "Alpha"),
            ItemRef::new("2", "b", "Beta"),
            ItemRef::new("3", "c", "Gamma"),
        ];
        let values = [json!(["x", "y"]), json!(["x", "y"]), json!(["x", "z"])];
        let tuples: Vec<CompareTuple<'_>> = items
            .iter()
            .zip(&values)
            .map(|(item, value)| CompareTuple { item, value, color: "#123456" })
            .collect();
        let out = compare(&tuples, &RenderContext::single());
        assert!(out.contains("morph-freq-common"));
        assert!(out.contains("morph-freq-partial"));
        assert!(out.contains("morph-freq-unique"));
        assert!(out.contains("Gamma"));
    }
}
