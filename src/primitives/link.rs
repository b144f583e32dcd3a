use serde_json::Value;

use super::{placeholder, Primitive};
use crate::context::RenderContext;
use crate::escape::{escape_html, validate_url};
use crate::morph_type::MorphType;
use crate::value::get_str;

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Link,
    render_single: render,
    render_compare: None,
};

/// Host part of a URL, for links without a label.
fn host_label(url: &str) -> String {
    let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(without_scheme);
    host.trim_start_matches("www.").to_string()
}

fn anchor(value: &Value) -> Option<String> {
    let (href, label) = match value {
        Value::String(s) => (s.as_str(), None),
        Value::Object(o) => (
            get_str(o, &["url", "href", "link"])?,
            get_str(o, &["label", "title", "text", "name"]),
        ),
        _ => return None,
    };
    let href = validate_url(href)?;
    let label = label.map(str::to_string).unwrap_or_else(|| host_label(&href));
    Some(format!(
        "<a class=\"morph-link\" href=\"{}\" rel=\"noopener noreferrer nofollow\" target=\"_blank\">{}</a>",
        escape_html(&href),
        escape_html(&label)
    ))
}

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    match value {
        Value::Array(arr) => {
            let links: Vec<String> = arr.iter().filter_map(anchor).collect();
            if links.is_empty() {
                return placeholder();
            }
            let mut out = String::from("<ul class=\"morph-links\">");
            for l in links {
                out.push_str(&format!("<li>{}</li>", l));
            }
            out.push_str("</ul>");
            out
        }
        other => anchor(other).unwrap_or_else(placeholder),
    }
}
