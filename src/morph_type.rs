use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MorphError;

/// Closed set of renderer identifiers. The lowercase name is what lands in
/// `data-morph` and what configuration files refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MorphType {
    Text,
    Number,
    Boolean,
    Badge,
    Tag,
    Progress,
    Rating,
    Range,
    Stats,
    Gauge,
    Image,
    Link,
    List,
    Object,
    Date,
    Timeline,
    Lifecycle,
    Steps,
    Calendar,
    Bar,
    Pie,
    Sparkline,
    Radar,
    Severity,
    Dosage,
    Citation,
    Currency,
}

impl MorphType {
    pub const ALL: [MorphType; 27] = [
        MorphType::Text,
        MorphType::Number,
        MorphType::Boolean,
        MorphType::Badge,
        MorphType::Tag,
        MorphType::Progress,
        MorphType::Rating,
        MorphType::Range,
        MorphType::Stats,
        MorphType::Gauge,
        MorphType::Image,
        MorphType::Link,
        MorphType::List,
        MorphType::Object,
        MorphType::Date,
        MorphType::Timeline,
        MorphType::Lifecycle,
        MorphType::Steps,
        MorphType::Calendar,
        MorphType::Bar,
        MorphType::Pie,
        MorphType::Sparkline,
        MorphType::Radar,
        MorphType::Severity,
        MorphType::Dosage,
        MorphType::Citation,
        MorphType::Currency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MorphType::Text => "text",
            MorphType::Number => "number",
            MorphType::Boolean => "boolean",
            MorphType::Badge => "badge",
            MorphType::Tag => "tag",
            MorphType::Progress => "progress",
            MorphType::Rating => "rating",
            MorphType::Range => "range",
            MorphType::Stats => "stats",
            MorphType::Gauge => "gauge",
            MorphType::Image => "image",
            MorphType::Link => "link",
            MorphType::List => "list",
            MorphType::Object => "object",
            MorphType::Date => "date",
            MorphType::Timeline => "timeline",
            MorphType::Lifecycle => "lifecycle",
            MorphType::Steps => "steps",
            MorphType::Calendar => "calendar",
            MorphType::Bar => "bar",
            MorphType::Pie => "pie",
            MorphType::Sparkline => "sparkline",
            MorphType::Radar => "radar",
            MorphType::Severity => "severity",
            MorphType::Dosage => "dosage",
            MorphType::Citation => "citation",
            MorphType::Currency => "currency",
        }
    }
}

impl fmt::Display for MorphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MorphType {
    type Err = MorphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        MorphType::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| MorphError::UnknownMorphType {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for morph in MorphType::ALL {
            assert_eq!(morph.as_str().parse::<MorphType>().unwrap(), morph);
        }
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!("Sparkline".parse::<MorphType>().unwrap(), MorphType::Sparkline);
        assert_eq!(" PIE ".parse::<MorphType>().unwrap(), MorphType::Pie);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = "hologram".parse::<MorphType>().unwrap_err();
        assert!(matches!(err, MorphError::UnknownMorphType { .. }));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&MorphType::Lifecycle).unwrap();
        assert_eq!(json, "\"lifecycle\"");
        let back: MorphType = serde_json::from_str("\"currency\"").unwrap();
        assert_eq!(back, MorphType::Currency);
    }
}
