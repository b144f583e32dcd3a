//! Shape helpers over untyped attribute values.

use chrono::{DateTime, Datelike, NaiveDate};
use serde_json::{Map, Value};

/// A field with no data renders nothing.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// Numeric reading of a value. Accepts numbers and numeric strings such as
/// `"1,200"`, `" 42 "` or `"75%"`. Non-finite results are rejected.
pub fn as_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_number(s)?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.trim().parse::<f64>().ok()
}

pub fn is_numeric(value: &Value) -> bool {
    as_f64(value).is_some()
}

/// First present, non-null entry among `keys`.
pub fn get_any<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
}

pub fn get_f64(map: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    get_any(map, keys).and_then(as_f64)
}

pub fn get_str<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    get_any(map, keys)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Scalar text of a value, for labels and set membership. Containers yield `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads a value as a list of labels: arrays of scalars, or a comma/semicolon
/// separated string. Objects inside arrays contribute their `name`/`label`.
pub fn as_label_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(arr) => Some(
            arr.iter()
                .filter_map(|v| match v {
                    Value::Object(o) => get_str(o, &["name", "label", "title", "value"])
                        .map(str::to_string),
                    other => scalar_text(other),
                })
                .collect(),
        ),
        Value::String(s) => Some(
            s.split([',', ';'])
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        Value::Number(_) | Value::Bool(_) => scalar_text(value).map(|s| vec![s]),
        _ => None,
    }
}

/// Label → number pairs from `{a: 1, b: 2}` or `[{label, value}, ..]`.
/// Preserves input order. Entries without a numeric value are skipped.
pub fn as_series(value: &Value) -> Option<Vec<(String, f64)>> {
    let pairs: Vec<(String, f64)> = match value {
        Value::Object(o) => o
            .iter()
            .filter_map(|(k, v)| as_f64(v).map(|n| (k.clone(), n)))
            .collect(),
        Value::Array(arr) => arr
            .iter()
            .filter_map(|v| {
                let o = v.as_object()?;
                let label = get_str(o, &["label", "name", "key", "axis"])?;
                let n = get_f64(o, &["value", "count", "amount", "percent"])?;
                Some((label.to_string(), n))
            })
            .collect(),
        _ => return None,
    };
    (!pairs.is_empty()).then_some(pairs)
}

/// Every entry is numeric, for plain numeric arrays.
pub fn as_number_list(value: &Value) -> Option<Vec<f64>> {
    let arr = value.as_array()?;
    if arr.is_empty() {
        return None;
    }
    arr.iter().map(as_f64).collect()
}

/// Format with thousands separators and at most two decimals.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "–".to_string();
    }
    if n.abs() >= 1e15 {
        return format_exponent(n);
    }
    let rounded = (n * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let abs = rounded.abs();
    let int_part = abs.trunc() as u64;
    let frac = ((abs - abs.trunc()) * 100.0).round() as u64;

    let digits = int_part.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative && (int_part > 0 || frac > 0) {
        out.push('-');
    }
    out.push_str(&grouped);
    if frac > 0 {
        let frac_str = format!("{:02}", frac);
        out.push('.');
        out.push_str(frac_str.trim_end_matches('0'));
    }
    out
}

/// `1.5e20` style, with at most two mantissa decimals.
fn format_exponent(n: f64) -> String {
    let formatted = format!("{:.2e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exp)) if mantissa.contains('.') => {
            format!("{}e{}", mantissa.trim_end_matches('0').trim_end_matches('.'), exp)
        }
        _ => formatted,
    }
}

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

/// Month number (1–12) from a name, an abbreviation of at least three letters,
/// or a number.
pub fn parse_month(value: &Value) -> Option<u32> {
    if let Some(n) = as_f64(value) {
        let m = n as u32;
        return (n.fract() == 0.0 && (1..=12).contains(&m)).then_some(m);
    }
    let s = value.as_str()?.trim().trim_end_matches('.').to_lowercase();
    if s.chars().count() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(s.as_str()))
        .map(|i| i as u32 + 1)
}

pub fn month_abbrev(month: u32) -> &'static str {
    const ABBREV: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    ABBREV
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?")
}

/// Parse the date formats curators actually enter. Partial dates resolve to
/// the first day of the month or year.
pub fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    if let Some((y, m)) = s.split_once('-') {
        if y.len() == 4 && (1..=2).contains(&m.len()) {
            let (y, m) = (y.parse::<i32>().ok()?, m.parse::<u32>().ok()?);
            return NaiveDate::from_ymd_opt(y, m, 1);
        }
    }
    if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
        return NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1);
    }
    None
}

pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => {
            let year = n.as_i64().filter(|y| (1..=9999).contains(y))?;
            NaiveDate::from_ymd_opt(year as i32, 1, 1)
        }
        Value::Object(o) => get_any(o, &["date", "when", "at"]).and_then(parse_date),
        _ => None,
    }
}

/// Human form of a parsed date, keeping the precision of the source text.
pub fn format_date(date: NaiveDate, source: &Value) -> String {
    let raw = match source {
        Value::Object(o) => get_any(o, &["date", "when", "at"]).cloned().unwrap_or(Value::Null),
        other => other.clone(),
    };
    let text = scalar_text(&raw).unwrap_or_default();
    let text = text.trim();
    if text.len() == 4 && text.chars().all(|c| c.is_ascii_digit()) {
        return date.year().to_string();
    }
    if text.len() <= 7 && text.contains('-') && text.split('-').count() == 2 {
        return format!("{} {}", month_abbrev(date.month()), date.year());
    }
    format!("{} {}, {}", month_abbrev(date.month()), date.day(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_values() {
        assert!(is_empty(&Value::Null));
        assert!(is_empty(&json!("  ")));
        assert!(is_empty(&json!([])));
        assert!(is_empty(&json!({})));
        assert!(!is_empty(&json!(0)));
        assert!(!is_empty(&json!(false)));
    }

    #[test]
    fn numeric_strings_are_numbers() {
        assert_eq!(as_f64(&json!("1,200")), Some(1200.0));
        assert_eq!(as_f64(&json!("75%")), Some(75.0));
        assert_eq!(as_f64(&json!("fox")), None);
        assert_eq!(as_f64(&json!(true)), None);
    }

    #[test]
    fn formats_numbers() {
        assert_eq!(format_number(1234567.0), "1,234,567");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(0.333), "0.33");
        assert_eq!(format_number(-1500.0), "-1,500");
        assert_eq!(format_number(100.0), "100");
    }

    #[test]
    fn huge_numbers_use_exponent_notation() {
        assert_eq!(format_number(1e308), "1e308");
        assert_eq!(format_number(-2.5e20), "-2.5e20");
        assert_eq!(format_number(1.23456e16), "1.23e16");
    }

    #[test]
    fn label_lists_from_strings_and_arrays() {
        assert_eq!(
            as_label_list(&json!("forest, grassland; tundra")).unwrap(),
            vec!["forest", "grassland", "tundra"]
        );
        assert_eq!(
            as_label_list(&json!(["a", 2, {"name": "c"}])).unwrap(),
            vec!["a", "2", "c"]
        );
    }

    #[test]
    fn series_from_map_and_records() {
        assert_eq!(
            as_series(&json!({"insects": 40, "fruit": "60"})).unwrap(),
            vec![("insects".to_string(), 40.0), ("fruit".to_string(), 60.0)]
        );
        assert_eq!(
            as_series(&json!([{"label": "Day", "value": 3}])).unwrap(),
            vec![("Day".to_string(), 3.0)]
        );
        assert!(as_series(&json!({"a": "x"})).is_none());
    }

    #[test]
    fn parses_curator_dates() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(parse_date(&json!("1758-01-01")), Some(d(1758, 1, 1)));
        assert_eq!(parse_date(&json!("2021-06")), Some(d(2021, 6, 1)));
        assert_eq!(parse_date(&json!("1999")), Some(d(1999, 1, 1)));
        assert_eq!(parse_date(&json!(1859)), Some(d(1859, 1, 1)));
        assert_eq!(parse_date(&json!("March 3, 2004")), Some(d(2004, 3, 3)));
        assert_eq!(parse_date(&json!("2020-02-03T10:00:00Z")), Some(d(2020, 2, 3)));
        assert_eq!(parse_date(&json!("sometime in spring")), None);
    }

    #[test]
    fn date_format_keeps_precision() {
        let v = json!("1999");
        assert_eq!(format_date(parse_date(&v).unwrap(), &v), "1999");
        let v = json!("2021-06");
        assert_eq!(format_date(parse_date(&v).unwrap(), &v), "Jun 2021");
        let v = json!("2021-06-15");
        assert_eq!(format_date(parse_date(&v).unwrap(), &v), "Jun 15, 2021");
    }

    #[test]
    fn months_by_name_and_number() {
        assert_eq!(parse_month(&json!("March")), Some(3));
        assert_eq!(parse_month(&json!("sep")), Some(9));
        assert_eq!(parse_month(&json!("Sept")), Some(9));
        assert_eq!(parse_month(&json!(12)), Some(12));
        assert_eq!(parse_month(&json!(13)), None);
        assert_eq!(parse_month(&json!("ju")), None);
    }
}
