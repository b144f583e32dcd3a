use serde_json::Value;

use super::{placeholder, Primitive};
use crate::context::RenderContext;
use crate::escape::escape_html;
use crate::morph_type::MorphType;
use crate::value::{get_str, scalar_text};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Steps,
    render_single: render,
    render_compare: None,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub title: String,
    pub description: Option<String>,
}

/// Strips a leading `1.` / `2)` from a line.
fn strip_number(line: &str) -> &str {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() < line.len() {
        if let Some(r) = rest.strip_prefix(['.', ')']) {
            return r.trim_start();
        }
    }
    line
}

pub fn read_steps(value: &Value) -> Option<Vec<Step>> {
    let steps: Vec<Step> = match value {
        Value::Array(arr) => arr
            .iter()
            .filter_map(|v| match v {
                Value::Object(o) => {
                    let description = get_str(o, &["description", "detail", "text"]).map(str::to_string);
                    let title = get_str(o, &["title", "step", "name", "action"])
                        .map(str::to_string)
                        .or_else(|| description.clone())?;
                    let description = description.filter(|d| *d != title);
                    Some(Step { title, description })
                }
                other => scalar_text(other).map(|title| Step { title, description: None }),
            })
            .collect(),
        Value::String(s) => s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| Step { title: strip_number(l).to_string(), description: None })
            .collect(),
        _ => return None,
    };
    (!steps.is_empty()).then_some(steps)
}

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    let Some(steps) = read_steps(value) else {
        return placeholder();
    };
    let mut out = String::from("<ol class=\"morph-steps\">");
    for (i, step) in steps.iter().enumerate() {
        out.push_str(&format!(
            "<li class=\"morph-step\"><span class=\"morph-step-number\">{}</span><span class=\"morph-step-title\">{}</span>",
            i + 1,
            escape_html(&step.title)
        ));
        if let Some(d) = &step.description {
            out.push_str(&format!("<p class=\"morph-step-description\">{}</p>", escape_html(d)));
        }
        out.push_str("</li>");
    }
    out.push_str("</ol>");
    out
}
