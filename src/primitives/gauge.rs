use serde_json::Value;

use super::{placeholder, Primitive};
use crate::context::RenderContext;
use crate::escape::escape_html;
use crate::morph_type::MorphType;
use crate::value::{as_f64, format_number, get_f64, get_str};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Gauge,
    render_single: render,
    render_compare: None,
};

/// Length of the semicircle arc drawn below (radius 40).
const ARC_LENGTH: f64 = std::f64::consts::PI * 40.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub unit: Option<String>,
}

impl Reading {
    pub fn fraction(&self) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((self.value - self.min) / span).clamp(0.0, 1.0)
    }
}

pub fn read(value: &Value) -> Option<Reading> {
    match value {
        Value::Object(o) => {
            let v = get_f64(o, &["value", "current", "level"])?;
            let min = get_f64(o, &["min", "low"]).unwrap_or(0.0);
            let max = get_f64(o, &["max", "high"]).unwrap_or_else(|| v.max(100.0));
            Some(Reading {
                value: v,
                min,
                max,
                unit: get_str(o, &["unit", "units"]).map(str::to_string),
            })
        }
        other => {
            let v = as_f64(other)?;
            Some(Reading {
                value: v,
                min: 0.0,
                max: v.max(100.0),
                unit: None,
            })
        }
    }
}

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    let Some(reading) = read(value) else {
        return placeholder();
    };
    let filled = reading.fraction() * ARC_LENGTH;
    let label = match &reading.unit {
        Some(u) => format!("{} {}", format_number(reading.value), u),
        None => format_number(reading.value),
    };
    format!(
        "<div class=\"morph-gauge\"><svg viewBox=\"0 0 100 60\" class=\"morph-gauge-svg\" aria-hidden=\"true\"><path class=\"morph-gauge-track\" d=\"M10 50 A40 40 0 0 1 90 50\" fill=\"none\" stroke-width=\"8\"/><path class=\"morph-gauge-fill\" d=\"M10 50 A40 40 0 0 1 90 50\" fill=\"none\" stroke-width=\"8\" stroke-dasharray=\"{:.2} {:.2}\"/></svg><span class=\"morph-gauge-value\">{}</span><span class=\"morph-gauge-scale\">{} – {}</span></div>",
        filled,
        ARC_LENGTH,
        escape_html(&label),
        format_number(reading.min),
        format_number(reading.max)
    )
}
