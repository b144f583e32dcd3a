//! Field wrapper and the `data-raw-value` codec.
//!
//! The raw value is the standard base64 of the compact JSON serialization,
//! so a client can recover the exact value a field was rendered from.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::context::RenderMode;
use crate::error::{MorphError, MorphResult};
use crate::escape::escape_html;
use crate::morph_type::MorphType;

pub fn encode_raw_value(value: &Value) -> MorphResult<String> {
    let json = serde_json::to_string(value).map_err(|e| MorphError::RawValueEncode(e.to_string()))?;
    Ok(STANDARD.encode(json))
}

pub fn decode_raw_value(encoded: &str) -> MorphResult<Value> {
    let bytes = STANDARD.decode(encoded.trim())?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Encoded form of `value` if it should be embedded: never for null, and
/// never when the encoded text is longer than `limit` bytes.
pub fn embeddable_raw_value(value: &Value, limit: usize) -> MorphResult<Option<String>> {
    if value.is_null() {
        return Ok(None);
    }
    let encoded = encode_raw_value(value)?;
    Ok((encoded.len() <= limit).then_some(encoded))
}

/// Wrap primitive markup in the field container.
pub fn wrap_field(
    morph: MorphType,
    field: &str,
    inner: &str,
    raw_value: Option<&str>,
    mode: RenderMode,
) -> String {
    let mut out = format!(
        "<div class=\"morph-field morph-field--{}\" data-morph=\"{}\" data-field=\"{}\"",
        morph,
        morph,
        escape_html(field)
    );
    if mode == RenderMode::Compare {
        out.push_str(" data-mode=\"compare\"");
    }
    if let Some(raw) = raw_value {
        // Base64 alphabet never needs escaping inside a quoted attribute.
        out.push_str(&format!(" data-raw-value=\"{}\"", raw));
    }
    out.push('>');
    out.push_str(inner);
    out.push_str("</div>");
    out
}

fn raw_value_regex() -> &'static Regex {
    static RAW_VALUE_REGEX: OnceLock<Regex> = OnceLock::new();
    RAW_VALUE_REGEX.get_or_init(|| Regex::new(r#"data-raw-value="([A-Za-z0-9+/=]*)""#).unwrap())
}

/// Decode the first `data-raw-value` attribute found in `markup`.
/// `None` when the markup carries no raw value.
pub fn extract_raw_value(markup: &str) -> Option<MorphResult<Value>> {
    let caps = raw_value_regex().captures(markup)?;
    Some(decode_raw_value(&caps[1]))
}
