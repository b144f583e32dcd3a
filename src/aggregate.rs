//! Cross-record aggregation used by the comparison renderers: set
//! classification, numeric statistics and a shared date axis.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};

// ─── Frequency / classification ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    /// Held by every record.
    Common,
    /// Held by more than one record but not all.
    Partial,
    /// Held by exactly one record.
    Unique,
}

impl Presence {
    pub fn label(&self) -> &'static str {
        match self {
            Presence::Common => "Common",
            Presence::Partial => "Partial",
            Presence::Unique => "Unique",
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Presence::Common => "common",
            Presence::Partial => "partial",
            Presence::Unique => "unique",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
    /// Indices of the records holding this value, ascending.
    pub holders: Vec<usize>,
    pub presence: Presence,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    pub record_count: usize,
    /// Sorted by count, highest first, then by value.
    pub entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    /// Build from one label set per record. Duplicates inside a record are
    /// counted once; matching ignores case and keeps the first spelling seen.
    pub fn from_sets(sets: &[Vec<String>]) -> Self {
        let record_count = sets.len();
        let mut order: Vec<String> = Vec::new();
        let mut display: HashMap<String, String> = HashMap::new();
        let mut holders: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, set) in sets.iter().enumerate() {
            let mut seen = HashSet::new();
            for raw in set {
                let label = raw.trim();
                if label.is_empty() {
                    continue;
                }
                let key = label.to_lowercase();
                if !seen.insert(key.clone()) {
                    continue;
                }
                if !display.contains_key(&key) {
                    display.insert(key.clone(), label.to_string());
                    order.push(key.clone());
                }
                holders.entry(key).or_default().push(idx);
            }
        }

        let mut entries: Vec<FrequencyEntry> = order
            .into_iter()
            .map(|key| {
                let h = holders.remove(&key).unwrap_or_default();
                let count = h.len();
                FrequencyEntry {
                    value: display.remove(&key).unwrap_or(key),
                    count,
                    holders: h,
                    presence: classify(count, record_count),
                }
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

        Self {
            record_count,
            entries,
        }
    }

    pub fn get(&self, value: &str) -> Option<&FrequencyEntry> {
        let key = value.trim().to_lowercase();
        self.entries.iter().find(|e| e.value.to_lowercase() == key)
    }

    pub fn group(&self, presence: Presence) -> impl Iterator<Item = &FrequencyEntry> {
        self.entries.iter().filter(move |e| e.presence == presence)
    }
}

fn classify(count: usize, record_count: usize) -> Presence {
    if count >= record_count {
        Presence::Common
    } else if count == 1 {
        Presence::Unique
    } else {
        Presence::Partial
    }
}

// ─── Numeric statistics ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    /// One slot per record; `None` where the record had no usable number.
    pub values: Vec<Option<f64>>,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl NumericSummary {
    /// `None` when no record carries a finite number.
    pub fn from_values(values: Vec<Option<f64>>) -> Option<Self> {
        let values: Vec<Option<f64>> = values
            .into_iter()
            .map(|v| v.filter(|n| n.is_finite()))
            .collect();
        let valid: Vec<f64> = values.iter().flatten().copied().collect();
        if valid.is_empty() {
            return None;
        }
        let count = valid.len();
        // Running mean: finite for any finite inputs.
        let mean = valid
            .iter()
            .enumerate()
            .fold(0.0_f64, |mean, (i, v)| mean + (v - mean) / (i + 1) as f64);
        let min = valid.iter().copied().fold(f64::INFINITY, f64::min);
        let max = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            values,
            count,
            mean,
            min,
            max,
        })
    }

    pub fn delta(&self) -> f64 {
        self.max - self.min
    }

    /// Axis bounds: the observed range, widened to include zero.
    pub fn axis(&self) -> (f64, f64) {
        (self.min.min(0.0), self.max.max(0.0))
    }

    /// Position of `v` on the axis, as a percentage in `0..=100`.
    pub fn position(&self, v: f64) -> f64 {
        let (mut lo, mut hi) = self.axis();
        let mut v = v;
        if !(hi - lo).is_finite() {
            lo /= 2.0;
            hi /= 2.0;
            v /= 2.0;
        }
        let span = hi - lo;
        if span <= f64::EPSILON {
            return if v == 0.0 { 0.0 } else { 100.0 };
        }
        ((v - lo) / span * 100.0).clamp(0.0, 100.0)
    }

    pub fn mean_position(&self) -> f64 {
        self.position(self.mean)
    }

    /// Extremes are only flagged when the values actually differ.
    pub fn is_min(&self, v: f64) -> bool {
        self.delta() > f64::EPSILON && (v - self.min).abs() <= f64::EPSILON
    }

    pub fn is_max(&self, v: f64) -> bool {
        self.delta() > f64::EPSILON && (v - self.max).abs() <= f64::EPSILON
    }
}

/// Largest finite value across all series; at least `f64::EPSILON` so it can divide.
pub fn global_max<'a>(series: impl IntoIterator<Item = &'a f64>) -> f64 {
    series
        .into_iter()
        .copied()
        .filter(|n| n.is_finite())
        .fold(0.0_f64, f64::max)
        .max(f64::EPSILON)
}

/// Union of labels across records in first-seen order.
pub fn union_labels<'a, I, J>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = J>,
    J: IntoIterator<Item = &'a String>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for labels in records {
        for label in labels {
            if seen.insert(label.clone()) {
                out.push(label.clone());
            }
        }
    }
    out
}

// ─── Temporal axis ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalAxis {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TemporalAxis {
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Option<Self> {
        let mut iter = dates.into_iter();
        let first = iter.next()?;
        let (start, end) = iter.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self { start, end })
    }

    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Percentage offset of `date` along the axis. A zero-day span puts
    /// everything in the middle.
    pub fn position(&self, date: NaiveDate) -> f64 {
        let span = self.span_days();
        if span == 0 {
            return 50.0;
        }
        ((date - self.start).num_days() as f64 / span as f64 * 100.0).clamp(0.0, 100.0)
    }
}

/// Days held by two or more distinct records.
pub fn convergent_days(dated: &[(usize, NaiveDate)]) -> HashSet<NaiveDate> {
    let mut by_day: BTreeMap<NaiveDate, HashSet<usize>> = BTreeMap::new();
    for (record, day) in dated {
        by_day.entry(*day).or_default().insert(*record);
    }
    by_day
        .into_iter()
        .filter(|(_, records)| records.len() > 1)
        .map(|(day, _)| day)
        .collect()
}
