use serde_json::Value;

use super::{numeric_compare, placeholder, Primitive};
use crate::context::{CompareTuple, RenderContext};
use crate::morph_type::MorphType;
use crate::value::{as_f64, format_number, get_f64};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Rating,
    render_single: render,
    render_compare: Some(compare),
};

/// `(score, scale)`. Without an explicit max the scale is inferred:
/// five stars, ten, or a hundred.
pub fn read(value: &Value) -> Option<(f64, f64)> {
    let (score, max) = match value {
        Value::Object(o) => (
            get_f64(o, &["value", "score", "rating"])?,
            get_f64(o, &["max", "scale", "outOf", "out_of"]),
        ),
        other => (as_f64(other)?, None),
    };
    let max = max.unwrap_or(if score <= 5.0 {
        5.0
    } else if score <= 10.0 {
        10.0
    } else {
        100.0
    });
    if max <= 0.0 || score < 0.0 {
        return None;
    }
    Some((score.min(max), max))
}

/// Score normalized to five stars.
fn stars(value: &Value) -> Option<f64> {
    read(value).map(|(score, max)| score / max * 5.0)
}

fn display(n: f64, _source: &Value) -> String {
    format!("{}/5", format_number(n))
}

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    let Some((score, max)) = read(value) else {
        return placeholder();
    };
    let on_five = score / max * 5.0;
    let full = on_five.floor() as usize;
    let half = on_five - on_five.floor() >= 0.5;
    let empty = 5 - full - usize::from(half);

    let mut glyphs = String::new();
    glyphs.push_str(&"★".repeat(full));
    if half {
        glyphs.push_str("<span class=\"morph-star-half\">★</span>");
    }
    glyphs.push_str(&"☆".repeat(empty));

    format!(
        "<span class=\"morph-rating\" aria-label=\"{s} out of {m}\"><span class=\"morph-stars\">{glyphs}</span> <span class=\"morph-rating-value\">{s}/{m}</span></span>",
        s = format_number(score),
        m = format_number(max),
        glyphs = glyphs
    )
}

pub fn compare(tuples: &[CompareTuple<'_>], _ctx: &RenderContext) -> String {
    numeric_compare(tuples, stars, display)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn infers_scale() {
        assert_eq!(read(&json!(4)), Some((4.0, 5.0)));
        assert_eq!(read(&json!(7)), Some((7.0, 10.0)));
        assert_eq!(read(&json!({"score": 9, "max": 10})), Some((9.0, 10.0)));
        assert_eq!(read(&json!(-1)), None);
    }

    #[test]
    fn renders_half_stars() {
        let out = render(&json!(3.5), &RenderContext::single());
        assert!(out.contains("★★★<span class=\"morph-star-half\">★</span>☆"));
        assert!(out.contains("3.5/5"));
    }
}
