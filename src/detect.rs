//! Morph type detection from a field name and the runtime shape of its value.
//!
//! Name rules run first, each guarded by a shape check so a misleading
//! name never forces a primitive that cannot read the value. Shape rules
//! follow. Unrecognized scalars end up as `Text`, maps as `Object` and
//! lists as `List`.

use serde_json::{Map, Value};

use crate::morph_type::MorphType;
use crate::primitives::{
    boolean, calendar, dosage, gauge, lifecycle, range, rating, severity, sparkline, steps,
    timeline,
};
use crate::value::{as_f64, as_series, get_any, is_numeric, parse_date, parse_date_str};

type Guard = fn(&Value) -> bool;

struct NameRule {
    tokens: &'static [&'static str],
    morph: MorphType,
    guard: Guard,
}

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".avif"];

// ─── Guards ─────────────────────────────────────────────────────────────────

fn is_url_text(s: &str) -> bool {
    let s = s.trim().to_ascii_lowercase();
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("www.")
}

fn is_image_url(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    let path = lower.split(['?', '#']).next().unwrap_or(&lower);
    is_url_text(&lower) && IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

fn has_any(o: &Map<String, Value>, keys: &[&str]) -> bool {
    get_any(o, keys).is_some()
}

fn image_like(v: &Value) -> bool {
    match v {
        Value::String(s) => is_url_text(s) || s.trim_start().starts_with('/'),
        Value::Object(o) => has_any(o, &["src", "url", "href"]),
        Value::Array(arr) => !arr.is_empty() && arr.iter().all(image_like),
        _ => false,
    }
}

fn link_like(v: &Value) -> bool {
    match v {
        Value::String(s) => is_url_text(s),
        Value::Object(o) => has_any(o, &["url", "href", "link"]),
        Value::Array(arr) => !arr.is_empty() && arr.iter().all(link_like),
        _ => false,
    }
}

fn citation_like(v: &Value) -> bool {
    match v {
        Value::String(s) => !s.trim().is_empty(),
        Value::Object(o) => has_any(o, &["title", "doi", "authors", "author", "journal"]),
        Value::Array(arr) => !arr.is_empty() && arr.iter().all(citation_like),
        _ => false,
    }
}

fn dosage_like(v: &Value) -> bool {
    dosage::parts(v).is_some()
}

fn severity_like(v: &Value) -> bool {
    !v.is_array() && severity::level(v).is_some()
}

fn lifecycle_like(v: &Value) -> bool {
    v.is_array() && lifecycle::stages(v).is_some()
}

fn steps_like(v: &Value) -> bool {
    match v {
        Value::String(s) => s.lines().filter(|l| !l.trim().is_empty()).count() > 1,
        Value::Array(_) => steps::read_steps(v).is_some(),
        _ => false,
    }
}

fn timeline_like(v: &Value) -> bool {
    timeline::read_events(v).is_some_and(|events| events.iter().all(|e| parse_date(&e.when).is_some()))
}

fn calendar_like(v: &Value) -> bool {
    calendar::months(v).is_some()
}

fn date_like(v: &Value) -> bool {
    parse_date(v).is_some()
}

fn money_like(v: &Value) -> bool {
    match v {
        Value::Object(o) => has_any(o, &["amount", "price", "value"]),
        Value::String(s) => {
            let t = s.trim().trim_start_matches(['$', '€', '£', '¥']);
            is_numeric(&Value::String(t.to_string()))
        }
        other => is_numeric(other),
    }
}

fn rating_like(v: &Value) -> bool {
    !v.is_array() && rating::read(v).is_some()
}

fn percent_like(v: &Value) -> bool {
    match v {
        Value::Object(o) => has_any(o, &["value", "current", "done"]),
        other => is_numeric(other),
    }
}

fn gauge_like(v: &Value) -> bool {
    !v.is_array() && gauge::read(v).is_some()
}

fn range_like(v: &Value) -> bool {
    range::parse_span(v).is_some()
}

fn numeric_map(v: &Value) -> bool {
    v.as_object()
        .is_some_and(|o| !o.is_empty() && o.values().all(is_numeric))
}

fn radar_like(v: &Value) -> bool {
    numeric_map(v) && as_series(v).is_some_and(|s| s.len() >= 3)
}

fn series_like(v: &Value) -> bool {
    match v {
        Value::Object(_) => numeric_map(v),
        Value::Array(arr) => arr.iter().all(Value::is_object) && as_series(v).is_some(),
        _ => false,
    }
}

fn points_like(v: &Value) -> bool {
    v.is_array() && sparkline::points(v).is_some()
}

fn labels_like(v: &Value) -> bool {
    match v {
        Value::Array(arr) => !arr.is_empty() && arr.iter().all(|e| e.is_string() || e.is_number()),
        Value::String(s) => s.contains(',') || s.contains(';'),
        _ => false,
    }
}

fn short_label(v: &Value) -> bool {
    match v {
        Value::String(s) => {
            let t = s.trim();
            !t.is_empty() && t.chars().count() <= 32 && t.split_whitespace().count() <= 4
        }
        _ => false,
    }
}

fn boolean_like(v: &Value) -> bool {
    boolean::parse_bool(v).is_some()
}

// ─── Name rules ─────────────────────────────────────────────────────────────

/// Checked in order; the first rule whose token matches and whose guard
/// accepts the value wins.
static NAME_RULES: &[NameRule] = &[
    NameRule { tokens: &["image", "images", "photo", "photos", "picture", "thumbnail", "img", "avatar", "illustration"], morph: MorphType::Image, guard: image_like },
    NameRule { tokens: &["url", "link", "links", "href", "website", "homepage"], morph: MorphType::Link, guard: link_like },
    NameRule { tokens: &["citation", "citations", "reference", "references", "bibliography", "doi"], morph: MorphType::Citation, guard: citation_like },
    NameRule { tokens: &["dosage", "dose", "dosing", "posology"], morph: MorphType::Dosage, guard: dosage_like },
    NameRule { tokens: &["severity", "threat", "risk", "danger", "iucn", "conservation", "toxicity"], morph: MorphType::Severity, guard: severity_like },
    NameRule { tokens: &["lifecycle", "stages", "metamorphosis"], morph: MorphType::Lifecycle, guard: lifecycle_like },
    NameRule { tokens: &["steps", "instructions", "procedure", "directions", "protocol"], morph: MorphType::Steps, guard: steps_like },
    NameRule { tokens: &["timeline", "history", "events", "milestones", "chronology"], morph: MorphType::Timeline, guard: timeline_like },
    NameRule { tokens: &["calendar", "season", "seasons", "months", "flowering", "blooming", "breeding", "migration", "harvest"], morph: MorphType::Calendar, guard: calendar_like },
    NameRule { tokens: &["date", "born", "birth", "died", "death", "founded", "published", "released", "created", "updated", "discovered", "described", "year"], morph: MorphType::Date, guard: date_like },
    NameRule { tokens: &["price", "cost", "currency", "salary", "revenue", "budget", "fee", "value_usd"], morph: MorphType::Currency, guard: money_like },
    NameRule { tokens: &["rating", "stars", "score"], morph: MorphType::Rating, guard: rating_like },
    NameRule { tokens: &["progress", "percent", "percentage", "completion", "pct"], morph: MorphType::Progress, guard: percent_like },
    NameRule { tokens: &["gauge", "level", "capacity", "utilization", "saturation", "humidity"], morph: MorphType::Gauge, guard: gauge_like },
    NameRule { tokens: &["range", "span", "interval", "bounds", "limits", "tolerance"], morph: MorphType::Range, guard: range_like },
    NameRule { tokens: &["radar", "profile", "traits", "abilities", "skills"], morph: MorphType::Radar, guard: radar_like },
    NameRule { tokens: &["distribution", "composition", "breakdown", "share", "shares", "proportion", "proportions"], morph: MorphType::Pie, guard: series_like },
    NameRule { tokens: &["trend", "series", "trajectory", "sparkline"], morph: MorphType::Sparkline, guard: points_like },
    NameRule { tokens: &["stats", "statistics", "measurements", "metrics", "dimensions"], morph: MorphType::Stats, guard: numeric_map },
    NameRule { tokens: &["chart", "counts", "totals", "frequencies"], morph: MorphType::Bar, guard: series_like },
    NameRule { tokens: &["tags", "keywords", "labels", "categories", "habitats", "synonyms"], morph: MorphType::Tag, guard: labels_like },
    NameRule { tokens: &["status", "category", "type", "kind", "class", "family", "genus", "order", "rank", "group", "tier"], morph: MorphType::Badge, guard: short_label },
    NameRule { tokens: &["is", "has", "can", "enabled", "active", "venomous", "endemic"], morph: MorphType::Boolean, guard: boolean_like },
];

/// `conservationStatus` / `conservation-status` → `["conservation", "status"]`.
fn tokens(field_name: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in field_name.chars() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.extend(ch.to_lowercase());
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn by_name(field_name: &str, value: &Value) -> Option<MorphType> {
    let tokens = tokens(field_name);
    let joined = tokens.join("_");
    NAME_RULES
        .iter()
        .find(|rule| {
            rule.tokens
                .iter()
                .any(|t| tokens.iter().any(|tok| tok == t) || joined == *t)
                && (rule.guard)(value)
        })
        .map(|rule| rule.morph)
}

// ─── Shape rules ────────────────────────────────────────────────────────────

fn detect_string(s: &str) -> MorphType {
    let t = s.trim();
    if is_image_url(t) {
        return MorphType::Image;
    }
    if is_url_text(t) {
        return MorphType::Link;
    }
    if matches!(t.to_ascii_lowercase().as_str(), "yes" | "no" | "true" | "false") {
        return MorphType::Boolean;
    }
    if t.ends_with('%') && as_f64(&Value::String(t.to_string())).is_some() {
        return MorphType::Progress;
    }
    if t.starts_with(['$', '€', '£', '¥']) && money_like(&Value::String(t.to_string())) {
        return MorphType::Currency;
    }
    if t.chars().any(|c| c.is_ascii_digit()) && t.len() <= 32 && parse_date_str(t).is_some() {
        return MorphType::Date;
    }
    if range_like(&Value::String(t.to_string())) {
        return MorphType::Range;
    }
    MorphType::Text
}

fn detect_array(arr: &[Value]) -> MorphType {
    let value = Value::Array(arr.to_vec());
    if arr.is_empty() {
        return MorphType::List;
    }
    if arr.iter().all(Value::is_number) {
        return if arr.len() >= 3 { MorphType::Sparkline } else { MorphType::List };
    }
    if arr.iter().all(Value::is_object) {
        let objects: Vec<&Map<String, Value>> = arr.iter().filter_map(Value::as_object).collect();
        let all = |keys: &[&str]| objects.iter().all(|o| has_any(o, keys));
        if all(&["date", "year", "when", "at"]) && timeline_like(&value) {
            return MorphType::Timeline;
        }
        if all(&["stage"]) {
            return MorphType::Lifecycle;
        }
        if all(&["step"]) || (all(&["title"]) && all(&["description"])) {
            return MorphType::Steps;
        }
        if all(&["src"]) {
            return MorphType::Image;
        }
        if all(&["doi", "authors", "author", "journal"]) {
            return MorphType::Citation;
        }
        if all(&["url", "href"]) {
            return MorphType::Link;
        }
        if series_like(&value) && as_series(&value).is_some_and(|s| s.len() == arr.len()) {
            return MorphType::Bar;
        }
        return MorphType::List;
    }
    if arr.iter().all(Value::is_string) {
        if arr.iter().all(|v| v.as_str().is_some_and(is_image_url)) {
            return MorphType::Image;
        }
        if arr.iter().all(|v| v.as_str().is_some_and(is_url_text)) {
            return MorphType::Link;
        }
        if arr.iter().all(short_label) {
            return MorphType::Tag;
        }
    }
    MorphType::List
}

fn detect_object(o: &Map<String, Value>) -> MorphType {
    let value = Value::Object(o.clone());
    let has = |keys: &[&str]| has_any(o, keys);

    if has(&["amount", "price"]) && has(&["currency"]) {
        return MorphType::Currency;
    }
    if has(&["dose"]) || (has(&["amount"]) && has(&["frequency", "route"])) {
        return MorphType::Dosage;
    }
    if has(&["title"]) && has(&["doi", "authors", "author", "journal"]) {
        return MorphType::Citation;
    }
    if has(&["src"]) {
        return MorphType::Image;
    }
    if has(&["url", "href"]) && o.len() <= 3 {
        return MorphType::Link;
    }
    if has(&["score", "rating"]) && has(&["max", "scale", "outOf", "out_of"]) {
        return MorphType::Rating;
    }
    if has(&["value", "current"]) && has(&["min"]) && has(&["max"]) {
        return MorphType::Gauge;
    }
    if has(&["value", "current", "done"]) && has(&["max", "total"]) {
        return MorphType::Progress;
    }
    if has(&["min", "low", "from"]) && has(&["max", "high", "to"]) && range_like(&value) {
        return MorphType::Range;
    }
    if has(&["months"]) && calendar_like(&value) {
        return MorphType::Calendar;
    }
    if o.len() == 1 && has(&["date", "when"]) && date_like(&value) {
        return MorphType::Date;
    }
    if o.len() >= 2 && o.keys().all(|k| parse_date_str(k).is_some()) {
        return MorphType::Timeline;
    }
    if numeric_map(&value) {
        return MorphType::Stats;
    }
    MorphType::Object
}

/// Morph type for a field. Total and deterministic: the same name and value
/// always give the same answer, and every input gets one.
pub fn detect(field_name: &str, value: &Value) -> MorphType {
    if value.is_boolean() {
        return MorphType::Boolean;
    }
    if let Some(morph) = by_name(field_name, value) {
        return morph;
    }
    match value {
        Value::Number(_) => MorphType::Number,
        Value::String(s) => detect_string(s),
        Value::Array(arr) => detect_array(arr),
        Value::Object(o) => detect_object(o),
        Value::Bool(_) | Value::Null => MorphType::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn splits_field_names() {
        assert_eq!(tokens("conservationStatus"), vec!["conservation", "status"]);
        assert_eq!(tokens("body_mass-kg"), vec!["body", "mass", "kg"]);
        assert_eq!(tokens(""), Vec::<String>::new());
    }

    #[test]
    fn names_pick_primitives() {
        assert_eq!(detect("conservation_status", &json!("Endangered")), MorphType::Severity);
        assert_eq!(detect("flowering_season", &json!("Mar-Jun")), MorphType::Calendar);
        assert_eq!(detect("first_described", &json!("1758")), MorphType::Date);
        assert_eq!(detect("price", &json!(12.5)), MorphType::Currency);
        assert_eq!(detect("rating", &json!(4.5)), MorphType::Rating);
        assert_eq!(detect("completion", &json!(0.4)), MorphType::Progress);
        assert_eq!(detect("habitats", &json!(["forest", "wetland"])), MorphType::Tag);
        assert_eq!(detect("family", &json!("Felidae")), MorphType::Badge);
        assert_eq!(detect("life_cycle_stages", &json!(["egg", "larva"])), MorphType::Lifecycle);
        assert_eq!(detect("diet_composition", &json!({"insects": 60, "seeds": 40})), MorphType::Pie);
        assert_eq!(detect("traits", &json!({"speed": 3, "size": 4, "stealth": 5})), MorphType::Radar);
    }

    #[test]
    fn guards_reject_misleading_names() {
        // A "date" that does not parse stays text.
        assert_eq!(detect("date_note", &json!("ask the curator")), MorphType::Text);
        // A "rating" map without a score is just an object.
        assert_eq!(detect("rating", &json!({"source": "x", "note": "y"})), MorphType::Object);
    }

    #[test]
    fn shapes_without_names() {
        assert_eq!(detect("x", &json!(true)), MorphType::Boolean);
        assert_eq!(detect("x", &json!(42)), MorphType::Number);
        assert_eq!(detect("x", &json!("Plain prose about moths.")), MorphType::Text);
        assert_eq!(detect("x", &json!("https://example.org/a.png")), MorphType::Image);
        assert_eq!(detect("x", &json!("https://example.org")), MorphType::Link);
        assert_eq!(detect("x", &json!("75%")), MorphType::Progress);
        assert_eq!(detect("x", &json!("$1,200")), MorphType::Currency);
        assert_eq!(detect("x", &json!("2021-06-15")), MorphType::Date);
        assert_eq!(detect("x", &json!("10-20 cm")), MorphType::Range);
        assert_eq!(detect("x", &json!([1, 4, 9, 16])), MorphType::Sparkline);
        assert_eq!(detect("x", &json!(["a", "b"])), MorphType::Tag);
        assert_eq!(detect("x", &json!({"min": 2, "max": 5})), MorphType::Range);
        assert_eq!(detect("x", &json!({"amount": 3, "currency": "EUR"})), MorphType::Currency);
        assert_eq!(detect("x", &json!({"length": 3, "width": 1.5})), MorphType::Stats);
        assert_eq!(
            detect("x", &json!([{"year": 1990, "event": "a"}, {"year": 2000, "event": "b"}])),
            MorphType::Timeline
        );
    }

    #[test]
    fn fallbacks_by_container() {
        assert_eq!(detect("x", &Value::Null), MorphType::Text);
        assert_eq!(detect("x", &json!({"a": {"b": 1}, "c": "d"})), MorphType::Object);
        assert_eq!(
            detect("x", &json!(["A long sentence that keeps going and going past the limit", 3])),
            MorphType::List
        );
    }

    #[test]
    fn detection_is_deterministic() {
        let samples = [
            json!(null),
            json!(1),
            json!("x"),
            json!([1, 2, 3]),
            json!({"a": 1}),
            json!([{"label": "a", "value": 1}]),
        ];
        for v in &samples {
            for name in ["", "status", "history", "misc"] {
                assert_eq!(detect(name, v), detect(name, v));
            }
        }
    }
}
