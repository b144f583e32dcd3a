use serde_json::Value;

use super::{placeholder, Primitive};
use crate::context::RenderContext;
use crate::escape::{escape_html, validate_url};
use crate::morph_type::MorphType;
use crate::value::{get_any, get_str, scalar_text};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Citation,
    render_single: render,
    render_compare: None,
};

fn authors(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Array(arr) => {
            let names: Vec<String> = arr.iter().filter_map(scalar_text).collect();
            match names.len() {
                0 => None,
                1 | 2 => Some(names.join(" & ")),
                _ => Some(format!("{} et al.", names[0])),
            }
        }
        other => scalar_text(other),
    }
}

fn cite(value: &Value) -> Option<String> {
    let o = match value {
        Value::String(s) if !s.trim().is_empty() => {
            return Some(format!(
                "<cite class=\"morph-citation\">{}</cite>",
                escape_html(s.trim())
            ))
        }
        Value::Object(o) => o,
        _ => return None,
    };
    let title = get_str(o, &["title", "name"]);
    let authors = authors(get_any(o, &["authors", "author"]));
    let year = get_any(o, &["year", "date"]).and_then(scalar_text);
    let source = get_str(o, &["journal", "publisher", "source", "venue"]);
    let href = get_str(o, &["url", "link"])
        .map(str::to_string)
        .or_else(|| {
            get_str(o, &["doi"]).map(|doi| {
                let doi = doi.trim_start_matches("doi:").trim();
                if doi.starts_with("http") {
                    doi.to_string()
                } else {
                    format!("https://doi.org/{}", doi)
                }
            })
        })
        .and_then(|u| validate_url(&u));

    if title.is_none() && authors.is_none() && source.is_none() {
        return None;
    }

    let mut out = String::from("<cite class=\"morph-citation\">");
    if let Some(a) = &authors {
        out.push_str(&format!("<span class=\"morph-citation-authors\">{}</span>", escape_html(a)));
    }
    if let Some(y) = &year {
        out.push_str(&format!(" <span class=\"morph-citation-year\">({})</span>", escape_html(y)));
    }
    if let Some(t) = title {
        let t = escape_html(t);
        let t = match &href {
            Some(h) => format!(
                "<a href=\"{}\" rel=\"noopener noreferrer nofollow\" target=\"_blank\">{}</a>",
                escape_html(h),
                t
            ),
            None => t,
        };
        out.push_str(&format!(" <span class=\"morph-citation-title\">{}</span>", t));
    }
    if let Some(s) = source {
        out.push_str(&format!(" <em class=\"morph-citation-source\">{}</em>", escape_html(s)));
    }
    out.push_str("</cite>");
    Some(out)
}

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    match value {
        Value::Array(arr) => {
            let cites: Vec<String> = arr.iter().filter_map(cite).collect();
            if cites.is_empty() {
                return placeholder();
            }
            let mut out = String::from("<ol class=\"morph-citations\">");
            for c in cites {
                out.push_str(&format!("<li>{}</li>", c));
            }
            out.push_str("</ol>");
            out
        }
        other => cite(other).unwrap_or_else(placeholder),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn doi_becomes_link() {
        let out = render(
            &json!({"title": "Range shifts", "authors": ["Chen", "Hill", "Ohlemüller"], "year": 2011, "doi": "10.1126/science.1206432"}),
            &RenderContext::single(),
        );
        assert!(out.contains("Chen et al."));
        assert!(out.contains("(2011)"));
        assert!(out.contains("href=\"https:&#x2F;&#x2F;doi.org&#x2F;10.1126&#x2F;science.1206432\""));
    }

    #[test]
    fn unsafe_url_drops_link_not_title() {
        let out = render(
            &json!({"title": "Notes", "url": "javascript:void(0)"}),
            &RenderContext::single(),
        );
        assert!(out.contains("Notes"));
        assert!(!out.contains("href"));
    }
}
