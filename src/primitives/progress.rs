use serde_json::Value;

use super::{numeric_compare, pct, placeholder, Primitive};
use crate::context::{CompareTuple, RenderContext};
use crate::morph_type::MorphType;
use crate::value::{as_f64, format_number, get_f64};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Progress,
    render_single: render,
    render_compare: Some(compare),
};

/// Completion as a percentage. Bare numbers are read as percentages,
/// except fractions in `0..1` which are scaled up.
pub fn percent(value: &Value) -> Option<f64> {
    let p = match value {
        Value::Object(o) => {
            let v = get_f64(o, &["value", "current", "done"])?;
            let max = get_f64(o, &["max", "total", "of"]).unwrap_or(100.0);
            if max <= 0.0 {
                return None;
            }
            v / max * 100.0
        }
        other => {
            let v = as_f64(other)?;
            let is_fraction = v > 0.0 && v < 1.0 && !matches!(other, Value::String(s) if s.contains('%'));
            if is_fraction {
                v * 100.0
            } else {
                v
            }
        }
    };
    Some(p.clamp(0.0, 100.0))
}

fn display(n: f64, _source: &Value) -> String {
    format!("{}%", format_number(n))
}

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    let Some(p) = percent(value) else {
        return placeholder();
    };
    format!(
        "<div class=\"morph-progress\" role=\"progressbar\" aria-valuemin=\"0\" aria-valuemax=\"100\" aria-valuenow=\"{p}\"><div class=\"morph-progress-fill\" style=\"width:{p}%\"></div></div><span class=\"morph-progress-label\">{p}%</span>",
        p = pct(p)
    )
}

pub fn compare(tuples: &[CompareTuple<'_>], _ctx: &RenderContext) -> String {
    numeric_compare(tuples, percent, display)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_shapes() {
        assert_eq!(percent(&json!(40)), Some(40.0));
        assert_eq!(percent(&json!(0.25)), Some(25.0));
        assert_eq!(percent(&json!({"value": 3, "max": 4})), Some(75.0));
        assert_eq!(percent(&json!(250)), Some(100.0));
        assert_eq!(percent(&json!({"value": 1, "max": 0})), None);
    }

    #[test]
    fn renders_fill_width() {
        let out = render(&json!("60%"), &RenderContext::single());
        assert!(out.contains("width:60%"));
        assert!(out.contains("aria-valuenow=\"60\""));
    }
}
