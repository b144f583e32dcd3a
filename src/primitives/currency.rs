use serde_json::Value;

use super::{compare_block, compare_row, numeric_compare, placeholder, Primitive};
use crate::context::{CompareTuple, RenderContext};
use crate::escape::escape_html;
use crate::morph_type::MorphType;
use crate::value::{as_f64, format_number, get_f64, get_str};

pub const PRIMITIVE: Primitive = Primitive {
    morph: MorphType::Currency,
    render_single: render,
    render_compare: Some(compare),
};

const DEFAULT_CURRENCY: &str = "USD";

fn amount(value: &Value) -> Option<f64> {
    match value {
        Value::Object(o) => get_f64(o, &["amount", "value", "price"]),
        Value::String(s) => as_f64(&Value::String(
            s.trim().trim_start_matches(['$', '€', '£', '¥']).to_string(),
        )),
        other => as_f64(other),
    }
}

fn currency_code(value: &Value) -> String {
    match value {
        Value::Object(o) => get_str(o, &["currency", "code"])
            .map(str::to_ascii_uppercase)
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        Value::String(s) => match s.trim().chars().next() {
            Some('€') => "EUR".to_string(),
            Some('£') => "GBP".to_string(),
            Some('¥') => "JPY".to_string(),
            _ => DEFAULT_CURRENCY.to_string(),
        },
        _ => DEFAULT_CURRENCY.to_string(),
    }
}

/// `$1,234.50`, `€80.00`, `¥1,200`, or `1,234.50 CHF` for codes without a symbol.
pub fn format_money(n: f64, code: &str) -> String {
    let decimals = if code == "JPY" { 0 } else { 2 };
    let rounded = format!("{:.*}", decimals, n.abs());
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (rounded.clone(), None),
    };
    let grouped = format_number(int_part.parse::<f64>().unwrap_or(0.0));
    let body = match frac_part {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    };
    let sign = if n < 0.0 { "-" } else { "" };
    match code {
        "USD" => format!("{}${}", sign, body),
        "EUR" => format!("{}€{}", sign, body),
        "GBP" => format!("{}£{}", sign, body),
        "JPY" => format!("{}¥{}", sign, body),
        other => format!("{}{} {}", sign, body, other),
    }
}

fn display(n: f64, source: &Value) -> String {
    format_money(n, &currency_code(source))
}

pub fn render(value: &Value, _ctx: &RenderContext) -> String {
    match amount(value) {
        Some(n) => format!(
            "<span class=\"morph-currency\">{}</span>",
            escape_html(&display(n, value))
        ),
        None => placeholder(),
    }
}

/// Amounts in different currencies are not comparable; they are listed
/// side by side instead of charted.
pub fn compare(tuples: &[CompareTuple<'_>], ctx: &RenderContext) -> String {
    let mut codes: Vec<String> = tuples
        .iter()
        .filter(|t| amount(t.value).is_some())
        .map(|t| currency_code(t.value))
        .collect();
    codes.dedup();
    if codes.len() <= 1 {
        return numeric_compare(tuples, amount, display);
    }
    let mut body = String::from("<p class=\"morph-note\">Mixed currencies</p>");
    for t in tuples {
        body.push_str(&compare_row(t, "", &render(t.value, ctx)));
    }
    compare_block("rows", &body)
}
