use serde_json::Value;

use super::{placeholder, Primitive};
use crate::context::RenderContext;
use crate::escape::escape_html;
use crate::morph_type::MorphType;
use crate::value::{get_any, get_str, scalar_text};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Lifecycle,
    render_single: render,
    render_compare: None,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub name: String,
    pub duration: Option<String>,
}

pub fn stages(value: &Value) -> Option<Vec<Stage>> {
    let arr = value.as_array()?;
    let stages: Vec<Stage> = arr
        .iter()
        .filter_map(|v| match v {
            Value::Object(o) => Some(Stage {
                name: get_str(o, &["stage", "name", "label", "title"])?.to_string(),
                duration: get_any(o, &["duration", "length", "period"]).and_then(scalar_text),
            }),
            other => scalar_text(other).map(|name| Stage {
                name,
                duration: None,
            }),
        })
        .collect();
    (!stages.is_empty()).then_some(stages)
}

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    let Some(stages) = stages(value) else {
        return placeholder();
    };
    let mut out = String::from("<ol class=\"morph-lifecycle\">");
    for (i, stage) in stages.iter().enumerate() {
        if i > 0 {
            out.push_str("<li class=\"morph-lifecycle-arrow\" aria-hidden=\"true\">→</li>");
        }
        out.push_str(&format!(
            "<li class=\"morph-lifecycle-stage\"><span class=\"morph-lifecycle-name\">{}</span>",
            escape_html(&stage.name)
        ));
        if let Some(d) = &stage.duration {
            out.push_str(&format!(
                "<span class=\"morph-lifecycle-duration\">{}</span>",
                escape_html(d)
            ));
        }
        out.push_str("</li>");
    }
    out.push_str("</ol>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn arrows_between_stages() {
        let out = render(
            &json!(["egg", {"stage": "larva", "duration": "2 weeks"}, "pupa", "adult"]),
            &RenderContext::single(),
        );
        assert_eq!(out.matches("morph-lifecycle-stage").count(), 4);
        assert_eq!(out.matches("→").count(), 3);
        assert!(out.contains("2 weeks"));
    }
}
