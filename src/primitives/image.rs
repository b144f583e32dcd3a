use serde_json::Value;

use super::{placeholder, Primitive};
use crate::context::RenderContext;
use crate::escape::{escape_html, validate_url};
use crate::morph_type::MorphType;
use crate::value::get_str;

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Image,
    render_single: render,
    render_compare: None,
};

fn figure(value: &Value) -> Option<String> {
    let (src, alt, caption, credit) = match value {
        Value::String(s) => (s.as_str(), None, None, None),
        Value::Object(o) => (
            get_str(o, &["src", "url", "href"])?,
            get_str(o, &["alt", "title"]),
            get_str(o, &["caption", "description"]),
            get_str(o, &["credit", "author", "license"]),
        ),
        _ => return None,
    };
    let src = validate_url(src)?;
    let mut out = format!(
        "<figure class=\"morph-image\"><img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
        escape_html(&src),
        escape_html(alt.or(caption).unwrap_or(""))
    );
    if caption.is_some() || credit.is_some() {
        out.push_str("<figcaption>");
        if let Some(c) = caption {
            out.push_str(&escape_html(c));
        }
        if let Some(c) = credit {
            out.push_str(&format!(
                "<span class=\"morph-image-credit\">{}</span>",
                escape_html(c)
            ));
        }
        out.push_str("</figcaption>");
    }
    out.push_str("</figure>");
    Some(out)
}

pub fn render(value: &Value, ctx: &RenderContext) -> String {
    match value {
        Value::Array(arr) => {
            let figures: Vec<String> = arr.iter().filter_map(figure).collect();
            if figures.is_empty() {
                return placeholder();
            }
            let shown = if ctx.is_compact() { 1 } else { figures.len() };
            format!(
                "<div class=\"morph-gallery\">{}</div>",
                figures[..shown].concat()
            )
        }
        other => figure(other).unwrap_or_else(placeholder),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::PLACEHOLDER;
    use serde_json::json;

    #[test]
    fn renders_figure_with_caption() {
        let out = render(
            &json!({"src": "https://img.example.org/fox.jpg", "caption": "Red fox", "credit": "CC-BY"}),
            &RenderContext::single(),
        );
        assert!(out.contains("src=\"https:&#x2F;&#x2F;img.example.org&#x2F;fox.jpg\""));
        assert!(out.contains("alt=\"Red fox\""));
        assert!(out.contains("<span class=\"morph-image-credit\">CC-BY</span>"));
    }

    #[test]
    fn rejects_script_sources() {
        assert_eq!(
            render(&json!("javascript:alert(1)"), &RenderContext::single()),
            PLACEHOLDER
        );
    }

    #[test]
    fn gallery_drops_bad_entries() {
        let out = render(
            &json!(["https://a.org/1.png", "data:image/png;base64,AAAA", "https://a.org/2.png"]),
            &RenderContext::single(),
        );
        assert_eq!(out.matches("<img").count(), 2);
    }
}
