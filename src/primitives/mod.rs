//! The morph primitives and the static registry that maps each
//! [`MorphType`] to its renderer pair.
//!
//! A primitive is a plain record of function pointers: a single-value
//! renderer and an optional comparison renderer. Primitives never fail;
//! values they cannot read render as [`PLACEHOLDER`].

pub mod badge;
pub mod bar;
pub mod boolean;
pub mod calendar;
pub mod citation;
pub mod currency;
pub mod date;
pub mod dosage;
pub mod gauge;
pub mod image;
pub mod lifecycle;
pub mod link;
pub mod list;
pub mod number;
pub mod object;
pub mod pie;
pub mod progress;
pub mod radar;
pub mod range;
pub mod rating;
pub mod severity;
pub mod sparkline;
pub mod stats;
pub mod steps;
pub mod tag;
pub mod text;
pub mod timeline;

use chrono::NaiveDate;
use serde_json::Value;

use crate::aggregate::{convergent_days, FrequencyTable, NumericSummary, Presence, TemporalAxis};
use crate::context::{CompareTuple, RenderContext};
use crate::error::{MorphError, MorphResult};
use crate::escape::{escape_html, sanitize_color};
use crate::morph_type::MorphType;
use crate::value::{format_number, is_empty};

pub type SingleFn = fn(&Value, &RenderContext) -> String;
pub type CompareFn = fn(&[CompareTuple<'_>], &RenderContext) -> String;

/// Shown in place of a value the primitive cannot read.
pub const PLACEHOLDER: &str = "<span class=\"morph-empty\">–</span>";

/// How many entries list-like primitives show in grid mode.
pub const COMPACT_LIMIT: usize = 3;

#[derive(Clone, Copy)]
pub struct Primitive {
    pub morph: MorphType,
    pub render_single: SingleFn,
    pub render_compare: Option<CompareFn>,
}

impl std::fmt::Debug for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Primitive")
            .field("morph", &self.morph)
            .field("has_compare", &self.render_compare.is_some())
            .finish()
    }
}

impl Primitive {
    pub fn single(&self, value: &Value, ctx: &RenderContext) -> String {
        (self.render_single)(value, ctx)
    }

    /// Uses the comparison renderer when there is one; otherwise renders each
    /// record's value on its own row.
    pub fn compare(&self, tuples: &[CompareTuple<'_>], ctx: &RenderContext) -> String {
        match self.render_compare {
            Some(f) => f(tuples, ctx),
            None => fallback_compare(self, tuples, ctx),
        }
    }

    pub fn has_compare(&self) -> bool {
        self.render_compare.is_some()
    }
}

pub static REGISTRY: &[Primitive] = &[
    text::PRIMITIVE,
    number::PRIMITIVE,
    boolean::PRIMITIVE,
    badge::PRIMITIVE,
    tag::PRIMITIVE,
    progress::PRIMITIVE,
    rating::PRIMITIVE,
    range::PRIMITIVE,
    stats::PRIMITIVE,
    gauge::PRIMITIVE,
    image::PRIMITIVE,
    link::PRIMITIVE,
    list::PRIMITIVE,
    object::PRIMITIVE,
    date::PRIMITIVE,
    timeline::PRIMITIVE,
    lifecycle::PRIMITIVE,
    steps::PRIMITIVE,
    calendar::PRIMITIVE,
    bar::PRIMITIVE,
    pie::PRIMITIVE,
    sparkline::PRIMITIVE,
    radar::PRIMITIVE,
    severity::PRIMITIVE,
    dosage::PRIMITIVE,
    citation::PRIMITIVE,
    currency::PRIMITIVE,
];

pub fn lookup(morph: MorphType) -> Option<&'static Primitive> {
    REGISTRY.iter().find(|p| p.morph == morph)
}

pub fn lookup_name(name: &str) -> MorphResult<&'static Primitive> {
    let morph: MorphType = name.parse()?;
    lookup(morph).ok_or(MorphError::UnregisteredMorph { morph })
}

// ─── Shared markup ──────────────────────────────────────────────────────────

pub(crate) fn placeholder() -> String {
    PLACEHOLDER.to_string()
}

pub(crate) fn swatch(color: &str, name: &str) -> String {
    format!(
        "<span class=\"morph-swatch\" style=\"background:{}\" title=\"{}\"></span>",
        sanitize_color(color),
        escape_html(name)
    )
}

pub(crate) fn item_label(t: &CompareTuple<'_>) -> String {
    format!(
        "<span class=\"morph-item\">{}<span class=\"morph-item-name\">{}</span></span>",
        swatch(t.color, t.name()),
        escape_html(t.name())
    )
}

pub(crate) fn legend(tuples: &[CompareTuple<'_>]) -> String {
    let mut out = String::from("<div class=\"morph-legend\">");
    for t in tuples {
        out.push_str(&item_label(t));
    }
    out.push_str("</div>");
    out
}

/// One labelled row per record around `inner`.
pub(crate) fn compare_row(t: &CompareTuple<'_>, extra_class: &str, inner: &str) -> String {
    let class = if extra_class.is_empty() {
        "morph-compare-row".to_string()
    } else {
        format!("morph-compare-row {}", extra_class)
    };
    format!(
        "<div class=\"{}\" style=\"--item-color:{}\">{}<div class=\"morph-compare-value\">{}</div></div>",
        class,
        sanitize_color(t.color),
        item_label(t),
        inner
    )
}

pub(crate) fn compare_block(kind: &str, body: &str) -> String {
    format!(
        "<div class=\"morph-compare morph-compare--{}\">{}</div>",
        kind, body
    )
}

fn fallback_compare(p: &Primitive, tuples: &[CompareTuple<'_>], ctx: &RenderContext) -> String {
    let mut body = String::new();
    for t in tuples {
        let inner = if is_empty(t.value) {
            placeholder()
        } else {
            p.single(t.value, ctx)
        };
        body.push_str(&compare_row(t, "", &inner));
    }
    compare_block("rows", &body)
}

/// Percentage for inline styles, at most two decimals.
pub(crate) fn pct(v: f64) -> String {
    format_number(v.clamp(0.0, 100.0))
}

/// `body_mass_kg` → `Body mass kg`, `wingSpan` → `Wing span`.
pub(crate) fn humanize(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in key.chars() {
        if ch == '_' || ch == '-' || ch == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.extend(ch.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    let joined = words.join(" ");
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Adds a `+N more` marker when grid mode cuts a list short.
pub(crate) fn more_marker(hidden: usize) -> String {
    if hidden == 0 {
        String::new()
    } else {
        format!("<span class=\"morph-more\">+{} more</span>", hidden)
    }
}

// ─── Shared comparison algorithms ───────────────────────────────────────────

/// Identity/diff: one unanimous indicator when every record agrees,
/// otherwise one row per record.
pub(crate) fn identity_compare(
    tuples: &[CompareTuple<'_>],
    ctx: &RenderContext,
    key: fn(&Value) -> Option<String>,
    render: SingleFn,
) -> String {
    let keys: Vec<Option<String>> = tuples.iter().map(|t| key(t.value)).collect();
    let unanimous = !keys.is_empty() && keys.iter().all(|k| k.is_some() && *k == keys[0]);

    if unanimous {
        let mut holders = String::new();
        for t in tuples {
            holders.push_str(&swatch(t.color, t.name()));
        }
        let body = format!(
            "<div class=\"morph-unanimous\"><span class=\"morph-unanimous-mark\">Same for all {}</span><span class=\"morph-holders\">{}</span><div class=\"morph-compare-value\">{}</div></div>",
            tuples.len(),
            holders,
            render(tuples[0].value, ctx)
        );
        return compare_block("identity", &body);
    }

    let mut body = String::new();
    for (t, k) in tuples.iter().zip(&keys) {
        let inner = match k {
            Some(_) => render(t.value, ctx),
            None => placeholder(),
        };
        body.push_str(&compare_row(t, "morph-diff", &inner));
    }
    compare_block("identity", &body)
}

/// Frequency/classification: groups distinct labels into common, partial
/// and unique, with counts and holder swatches.
pub(crate) fn frequency_compare(
    tuples: &[CompareTuple<'_>],
    labels: fn(&Value) -> Vec<String>,
) -> String {
    let sets: Vec<Vec<String>> = tuples.iter().map(|t| labels(t.value)).collect();
    let table = FrequencyTable::from_sets(&sets);
    let n = table.record_count;

    let mut body = String::new();
    for presence in [Presence::Common, Presence::Partial, Presence::Unique] {
        let entries: Vec<_> = table.group(presence).collect();
        if entries.is_empty() {
            continue;
        }
        body.push_str(&format!(
            "<div class=\"morph-freq-group morph-freq-{}\"><h4 class=\"morph-freq-label\">{} <span class=\"morph-freq-count\">({})</span></h4><ul>",
            presence.class(),
            presence.label(),
            entries.len()
        ));
        for entry in entries {
            let mut holders = String::new();
            for &idx in &entry.holders {
                if let Some(t) = tuples.get(idx) {
                    holders.push_str(&swatch(t.color, t.name()));
                }
            }
            body.push_str(&format!(
                "<li class=\"morph-freq-value\" data-presence=\"{}\"><span class=\"morph-freq-text\">{}</span> <span class=\"morph-freq-count\">{}/{}</span><span class=\"morph-holders\">{}</span></li>",
                presence.class(),
                escape_html(&entry.value),
                entry.count,
                n,
                holders
            ));
        }
        body.push_str("</ul></div>");
    }
    if table.entries.is_empty() {
        body.push_str(PLACEHOLDER);
    }
    body.push_str(&legend(tuples));
    compare_block("frequency", &body)
}

/// Numeric statistics: one bar per record on a shared axis, min/max flags
/// and an average marker.
pub(crate) fn numeric_compare(
    tuples: &[CompareTuple<'_>],
    extract: fn(&Value) -> Option<f64>,
    display: fn(f64, &Value) -> String,
) -> String {
    let values: Vec<Option<f64>> = tuples.iter().map(|t| extract(t.value)).collect();
    let Some(summary) = NumericSummary::from_values(values) else {
        return fallback_rows(tuples, "numeric");
    };

    let reference = tuples
        .iter()
        .find(|t| extract(t.value).is_some())
        .map(|t| t.value)
        .unwrap_or(&Value::Null);

    let mut body = format!(
        "<div class=\"morph-stat-summary\"><span>Avg {}</span><span>Min {}</span><span>Max {}</span><span>Δ {}</span></div><div class=\"morph-bars\">",
        escape_html(&display(summary.mean, reference)),
        escape_html(&display(summary.min, reference)),
        escape_html(&display(summary.max, reference)),
        escape_html(&display(summary.delta(), reference)),
    );
    let avg_left = pct(summary.mean_position());

    for (t, v) in tuples.iter().zip(&summary.values) {
        let Some(v) = *v else {
            body.push_str(&compare_row(t, "", PLACEHOLDER));
            continue;
        };
        let mut flags = String::new();
        let mut class = String::from("morph-bar-row");
        if summary.is_max(v) {
            class.push_str(" morph-is-max");
            flags.push_str("<span class=\"morph-flag morph-flag--max\">Max</span>");
        }
        if summary.is_min(v) {
            class.push_str(" morph-is-min");
            flags.push_str("<span class=\"morph-flag morph-flag--min\">Min</span>");
        }
        body.push_str(&format!(
            "<div class=\"{}\">{}<div class=\"morph-bar-track\"><div class=\"morph-bar-fill\" style=\"width:{}%;background:{}\"></div><div class=\"morph-avg-marker\" style=\"left:{}%\" title=\"Average\"></div></div><span class=\"morph-bar-value\">{}</span>{}</div>",
            class,
            item_label(t),
            pct(summary.position(v)),
            sanitize_color(t.color),
            avg_left,
            escape_html(&display(v, t.value)),
            flags
        ));
    }
    body.push_str("</div>");
    compare_block("numeric", &body)
}

/// Structured table: one row per key across all records, one column per
/// record. Rows whose cells are all numeric get min/max flags.
pub(crate) fn table_compare(
    tuples: &[CompareTuple<'_>],
    ctx: &RenderContext,
    cell: fn(&Value, &RenderContext) -> String,
) -> String {
    let maps: Vec<Option<&serde_json::Map<String, Value>>> =
        tuples.iter().map(|t| t.value.as_object()).collect();

    let mut keys: Vec<&String> = Vec::new();
    for map in maps.iter().flatten() {
        for k in map.keys() {
            if !keys.contains(&k) {
                keys.push(k);
            }
        }
    }

    let mut out = String::from("<table class=\"morph-table\"><thead><tr><th></th>");
    for t in tuples {
        out.push_str(&format!("<th>{}</th>", item_label(t)));
    }
    out.push_str("</tr></thead><tbody>");

    for key in keys {
        let cells: Vec<Option<&Value>> = maps
            .iter()
            .map(|m| m.and_then(|m| m.get(key.as_str())).filter(|v| !is_empty(v)))
            .collect();
        let numbers: Vec<Option<f64>> = cells
            .iter()
            .map(|c| c.and_then(crate::value::as_f64))
            .collect();
        let summary = if numbers.iter().all(Option::is_some) {
            NumericSummary::from_values(numbers.clone())
        } else {
            None
        };

        out.push_str(&format!(
            "<tr{}><th scope=\"row\">{}</th>",
            if summary.is_some() { " class=\"morph-row-numeric\"" } else { "" },
            escape_html(&humanize(key))
        ));
        for (c, n) in cells.iter().zip(&numbers) {
            let class = match (&summary, n) {
                (Some(s), Some(v)) if s.is_max(*v) => " class=\"morph-is-max\"",
                (Some(s), Some(v)) if s.is_min(*v) => " class=\"morph-is-min\"",
                _ => "",
            };
            let inner = match c {
                Some(v) => cell(v, ctx),
                None => placeholder(),
            };
            out.push_str(&format!("<td{}>{}</td>", class, inner));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    compare_block("table", &out)
}

/// One dated event inside a record: the day and its display text.
pub(crate) type DatedEvent = (NaiveDate, String);

/// Temporal merge: every record's events on one shared day axis. A value
/// that does not parse turns the whole block into a plain listing.
pub(crate) fn temporal_compare(
    tuples: &[CompareTuple<'_>],
    ctx: &RenderContext,
    events: fn(&Value) -> Option<Vec<DatedEvent>>,
    render: SingleFn,
) -> String {
    let mut per_record: Vec<Vec<DatedEvent>> = Vec::with_capacity(tuples.len());
    let mut unparsed = false;
    for t in tuples {
        if is_empty(t.value) {
            per_record.push(Vec::new());
            continue;
        }
        match events(t.value) {
            Some(e) if !e.is_empty() => per_record.push(e),
            _ => {
                unparsed = true;
                break;
            }
        }
    }

    if unparsed {
        let mut body = String::from("<ul class=\"morph-temporal-list\">");
        for t in tuples {
            let inner = if is_empty(t.value) {
                placeholder()
            } else {
                render(t.value, ctx)
            };
            body.push_str(&format!("<li>{}</li>", compare_row(t, "", &inner)));
        }
        body.push_str("</ul>");
        return compare_block("temporal", &body);
    }

    let dated: Vec<(usize, NaiveDate)> = per_record
        .iter()
        .enumerate()
        .flat_map(|(i, e)| e.iter().map(move |(d, _)| (i, *d)))
        .collect();
    let Some(axis) = TemporalAxis::from_dates(dated.iter().map(|(_, d)| *d)) else {
        return fallback_rows(tuples, "temporal");
    };
    let converge = convergent_days(&dated);

    let span = axis.span_days();
    let mut body = format!(
        "<div class=\"morph-axis\"><span class=\"morph-axis-start\">{}</span><span class=\"morph-axis-span\">{} {}</span><span class=\"morph-axis-end\">{}</span></div><div class=\"morph-axis-track\">",
        axis.start.format("%b %-d, %Y"),
        span,
        if span == 1 { "day" } else { "days" },
        axis.end.format("%b %-d, %Y")
    );
    for (t, evs) in tuples.iter().zip(&per_record) {
        for (day, label) in evs {
            let class = if converge.contains(day) {
                "morph-marker morph-converge"
            } else {
                "morph-marker"
            };
            body.push_str(&format!(
                "<span class=\"{}\" style=\"left:{}%;background:{}\" title=\"{}: {}\"></span>",
                class,
                pct(axis.position(*day)),
                sanitize_color(t.color),
                escape_html(t.name()),
                escape_html(label)
            ));
        }
    }
    body.push_str("</div>");
    if span == 0 {
        body.push_str(&format!(
            "<div class=\"morph-converge-label\">All on {}</div>",
            axis.start.format("%b %-d, %Y")
        ));
    }

    body.push_str("<ul class=\"morph-temporal-list\">");
    for (t, evs) in tuples.iter().zip(&per_record) {
        let inner = if evs.is_empty() {
            placeholder()
        } else {
            evs.iter()
                .map(|(day, label)| {
                    format!(
                        "<time datetime=\"{}\"{}>{}</time>",
                        day.format("%Y-%m-%d"),
                        if converge.contains(day) { " class=\"morph-converge\"" } else { "" },
                        escape_html(label)
                    )
                })
                .collect::<Vec<_>>()
                .join(", ")
        };
        body.push_str(&format!("<li>{}</li>", compare_row(t, "", &inner)));
    }
    body.push_str("</ul>");
    body.push_str(&legend(tuples));
    compare_block("temporal", &body)
}

/// Placeholder rows for every record, for comparisons with nothing to plot.
pub(crate) fn fallback_rows(tuples: &[CompareTuple<'_>], kind: &str) -> String {
    let mut body = String::new();
    for t in tuples {
        body.push_str(&compare_row(t, "", PLACEHOLDER));
    }
    compare_block(kind, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ItemRef;
    use serde_json::json;

    #[test]
    fn registry_covers_every_morph_exactly_once() {
        assert_eq!(REGISTRY.len(), MorphType::ALL.len());
        for morph in MorphType::ALL {
            let count = REGISTRY.iter().filter(|p| p.morph == morph).count();
            assert_eq!(count, 1, "{morph} should be registered once");
        }
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(lookup_name("radar").unwrap().morph, MorphType::Radar);
        assert!(matches!(
            lookup_name("hologram"),
            Err(MorphError::UnknownMorphType { .. })
        ));
    }

    #[test]
    fn humanizes_keys() {
        assert_eq!(humanize("body_mass_kg"), "Body mass kg");
        assert_eq!(humanize("wingSpan"), "Wing span");
        assert_eq!(humanize("IUCN"), "Iucn");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn fallback_compare_labels_every_record() {
        let items = vec![ItemRef::new("1", "a", "Alpha"), ItemRef::new("2", "b", "Beta")];
        let values = [json!(70), Value::Null];
        let tuples: Vec<CompareTuple<'_>> = items
            .iter()
            .zip(&values)
            .zip(["#111111", "#222222"])
            .map(|((item, value), color)| CompareTuple { item, value, color })
            .collect();
        let out = lookup(MorphType::Gauge)
            .unwrap()
            .compare(&tuples, &RenderContext::single());
        assert!(out.contains("Alpha"));
        assert!(out.contains("Beta"));
        assert!(out.contains(PLACEHOLDER));
    }
}
