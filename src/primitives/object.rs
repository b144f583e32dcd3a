use serde_json::{Map, Value};

use super::{humanize, placeholder, table_compare, Primitive};
use crate::context::{CompareTuple, RenderContext};
use crate::escape::{escape_html, escape_value};
use crate::morph_type::MorphType;
use crate::value::{is_empty, scalar_text};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Object,
    render_single: render,
    render_compare: Some(compare),
};

/// Nesting deeper than this collapses to a summary.
pub const MAX_DEPTH: usize = 4;

fn summary(value: &Value) -> String {
    match value {
        Value::Object(o) => format!(
            "<span class=\"morph-collapsed\">{{{} {}}}</span>",
            o.len(),
            if o.len() == 1 { "key" } else { "keys" }
        ),
        Value::Array(a) => format!(
            "<span class=\"morph-collapsed\">[{} {}]</span>",
            a.len(),
            if a.len() == 1 { "item" } else { "items" }
        ),
        other => escape_value(other),
    }
}

fn nested(value: &Value, depth: usize) -> String {
    match value {
        Value::Object(_) if depth >= MAX_DEPTH => summary(value),
        Value::Object(o) => map_html(o, depth + 1),
        Value::Array(a) if a.iter().all(|v| scalar_text(v).is_some()) => a
            .iter()
            .filter_map(scalar_text)
            .map(|s| escape_html(&s))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(_) if depth >= MAX_DEPTH => summary(value),
        Value::Array(a) => {
            let mut out = String::from("<ul class=\"morph-object-list\">");
            for entry in a.iter().filter(|v| !is_empty(v)) {
                out.push_str(&format!("<li>{}</li>", nested(entry, depth + 1)));
            }
            out.push_str("</ul>");
            out
        }
        Value::Null => placeholder(),
        other => escape_value(other),
    }
}

fn map_html(map: &Map<String, Value>, depth: usize) -> String {
    let mut out = String::from("<dl class=\"morph-object\">");
    for (key, v) in map {
        if is_empty(v) {
            continue;
        }
        out.push_str(&format!(
            "<dt>{}</dt><dd>{}</dd>",
            escape_html(&humanize(key)),
            nested(v, depth)
        ));
    }
    out.push_str("</dl>");
    out
}

pub fn render(value: &Value, ctx: &RenderContext) -> String {
    match value {
        Value::Object(o) if o.is_empty() => placeholder(),
        // Grid cards keep the top level only.
        Value::Object(o) if ctx.is_compact() => map_html(o, MAX_DEPTH),
        Value::Object(o) => map_html(o, 1),
        other if is_empty(other) => placeholder(),
        other => nested(other, 1),
    }
}

fn cell(value: &Value, _ctx: &RenderContext) -> String {
    nested(value, MAX_DEPTH - 1)
}

pub fn compare(tuples: &[CompareTuple<'_>], ctx: &RenderContext) -> String {
    table_compare(tuples, ctx, cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_definition_list() {
        let out = render(
            &json!({"habitat": "wetland", "range_km": 40, "notes": null}),
            &RenderContext::single(),
        );
        assert_eq!(
            out,
            "<dl class=\"morph-object\"><dt>Habitat</dt><dd>wetland</dd><dt>Range km</dt><dd>40</dd></dl>"
        );
    }

    #[test]
    fn deep_nesting_collapses() {
        let deep = json!({"a": {"b": {"c": {"d": {"e": {"f": 1}}}}}});
        let out = render(&deep, &RenderContext::single());
        assert!(out.contains("morph-collapsed"));
        assert!(!out.contains(">F<"));
    }

    #[test]
    fn grid_mode_collapses_nested_values() {
        let out = render(&json!({"diet": {"insects": 1, "fruit": 2}}), &RenderContext::grid(vec![]));
        assert!(out.contains("{2 keys}"));
    }

    #[test]
    fn array_of_scalars_is_inline() {
        let out = render(&json!({"colors": ["red", "brown"]}), &RenderContext::single());
        assert!(out.contains("<dd>red, brown</dd>"));
    }
}
