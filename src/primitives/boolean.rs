use serde_json::Value;

use super::{identity_compare, placeholder, Primitive};
use crate::context::{CompareTuple, RenderContext};
use crate::morph_type::MorphType;

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Boolean,
    render_single: render,
    render_compare: Some(compare),
};

/// Reads booleans and the yes/no spellings curators use.
pub fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64()? {
            x if x == 1.0 => Some(true),
            x if x == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "present" => Some(true),
            "false" | "no" | "n" | "0" | "absent" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    match parse_bool(value) {
        Some(true) => "<span class=\"morph-boolean morph-boolean--true\" aria-label=\"Yes\"><span class=\"morph-boolean-mark\">✓</span> Yes</span>".to_string(),
        Some(false) => "<span class=\"morph-boolean morph-boolean--false\" aria-label=\"No\"><span class=\"morph-boolean-mark\">✗</span> No</span>".to_string(),
        None => placeholder(),
    }
}

fn identity_key(value: &Value) -> Option<String> {
    parse_bool(value).map(|b| b.to_string())
}

pub fn compare(tuples: &[CompareTuple<'_>], ctx: &RenderContext) -> String {
    identity_compare(tuples, ctx, identity_key, render)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ItemRef;
    use crate::primitives::PLACEHOLDER;
    use serde_json::json;

    #[test]
    fn parses_spellings() {
        assert_eq!(parse_bool(&json!("Yes")), Some(true));
        assert_eq!(parse_bool(&json!(0)), Some(false));
        assert_eq!(parse_bool(&json!("maybe")), None);
    }

    #[test]
    fn renders_indicator_or_placeholder() {
        let ctx = RenderContext::single();
        assert!(render(&json!(true), &ctx).contains("morph-boolean--true"));
        assert!(render(&json!("no"), &ctx).contains("morph-boolean--false"));
        assert_eq!(render(&json!("perhaps"), &ctx), PLACEHOLDER);
    }

    #[test]
    fn compare_mixed_values() {
        let items = [ItemRef::new("1", "a", "Alpha"), ItemRef::new("2", "b", "Beta")];
        let values = [json!(true), json!("no")];
        let tuples = [
            CompareTuple { item: &items[0], value: &values[0], color: "red" },
            CompareTuple { item: &items[1], value: &values[1], color: "blue" },
        ];
        let out = compare(&tuples, &RenderContext::single());
        assert!(!out.contains("Same for all"));
        assert!(out.contains("Alpha") && out.contains("Beta"));
    }
}
