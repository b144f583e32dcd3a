//! Markup escaping and URL gating. Every primitive that puts record data
//! into markup goes through this module.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

const BLOCKED_SCHEMES: &[&str] = &["javascript:", "data:", "vbscript:"];

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '/' => out.push_str("&#x2F;"),
            '`' => out.push_str("&#x60;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Coerce any attribute value to display text and escape it.
/// `Null` becomes the empty string.
pub fn escape_value(value: &Value) -> String {
    escape_html(&value_text(value))
}

/// Plain-text form of a value, unescaped. Strings come out without quotes,
/// containers as compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn scheme_regex() -> &'static Regex {
    static SCHEME_REGEX: OnceLock<Regex> = OnceLock::new();
    SCHEME_REGEX.get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*:").unwrap())
}

/// Gate a user-supplied URL.
///
/// Returns `None` for blank input and for `javascript:`, `data:` and
/// `vbscript:` URLs in any casing, with leading whitespace or with control
/// characters smuggled into the scheme. Scheme-bearing URLs and relative
/// references come back unchanged; bare hosts get `https://` prepended.
pub fn validate_url(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Browsers drop tabs and newlines inside the scheme, so the check must too.
    let folded: String = trimmed
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if BLOCKED_SCHEMES.iter().any(|s| folded.starts_with(s)) {
        return None;
    }

    if has_scheme(trimmed) || is_relative_reference(trimmed) {
        return Some(url.to_string());
    }

    Some(format!("https://{}", trimmed))
}

/// `host.tld:8080` is a bare host with a port, not a scheme named `host.tld`.
fn has_scheme(url: &str) -> bool {
    let Some(m) = scheme_regex().find(url) else {
        return false;
    };
    let scheme = &url[..m.end() - 1];
    let rest = &url[m.end()..];
    let port_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    let is_port = port_len > 0 && matches!(rest[port_len..].chars().next(), None | Some('/' | '?' | '#'));
    !(is_port && (scheme.contains('.') || scheme.eq_ignore_ascii_case("localhost")))
}

fn is_relative_reference(url: &str) -> bool {
    url.starts_with('/')
        || url.starts_with("./")
        || url.starts_with("../")
        || url.starts_with('#')
        || url.starts_with('?')
}

/// Escape a CSS color token before it goes into a `style` attribute. Anything
/// outside a conservative character set is dropped.
pub fn sanitize_color(color: &str) -> String {
    let cleaned: String = color
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | '-' | ' '))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "currentColor".to_string()
    } else {
        cleaned.to_string()
    }
}
