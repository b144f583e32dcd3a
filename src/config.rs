use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::MorphResult;
use crate::morph_type::MorphType;
use crate::observer::Category;

/// Largest base64 payload the wrapper will embed as `data-raw-value`.
pub const DEFAULT_RAW_VALUE_LIMIT: usize = 10 * 1024;

/// Renderer policy. Every field has a default, so a config file only needs
/// the keys it changes.
///
/// ```yaml
/// rawValueLimit: 4096
/// mutedCategories: [detect]
/// fieldOverrides:
///   conservation_status: severity
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub raw_value_limit: usize,
    pub embed_raw_values: bool,
    /// Categories whose debug/info events are dropped before reaching the
    /// observer. Warnings and errors always pass.
    pub muted_categories: Vec<Category>,
    /// Field name → morph type, consulted before detection.
    pub field_overrides: HashMap<String, MorphType>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            raw_value_limit: DEFAULT_RAW_VALUE_LIMIT,
            embed_raw_values: true,
            muted_categories: vec![Category::Detect, Category::Encode],
            field_overrides: HashMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_yaml(yaml: &str) -> MorphResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn with_override(mut self, field: impl Into<String>, morph: MorphType) -> Self {
        self.field_overrides.insert(field.into(), morph);
        self
    }

    pub fn override_for(&self, field: &str) -> Option<MorphType> {
        self.field_overrides.get(field).copied()
    }

    pub fn is_muted(&self, category: Category) -> bool {
        self.muted_categories.contains(&category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MorphError;

    #[test]
    fn defaults_match_policy_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.raw_value_limit, 10240);
        assert!(config.embed_raw_values);
        assert!(config.is_muted(Category::Detect));
        assert!(config.is_muted(Category::Encode));
        assert!(!config.is_muted(Category::Registry));
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = EngineConfig::from_yaml(
            "rawValueLimit: 2048\nfieldOverrides:\n  conservation_status: severity\n",
        )
        .unwrap();
        assert_eq!(config.raw_value_limit, 2048);
        assert_eq!(
            config.override_for("conservation_status"),
            Some(MorphType::Severity)
        );
        assert_eq!(config.muted_categories, vec![Category::Detect, Category::Encode]);
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(EngineConfig::from_yaml("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn unknown_morph_in_overrides_is_a_config_error() {
        let err = EngineConfig::from_yaml("fieldOverrides:\n  diet: hologram\n").unwrap_err();
        assert!(matches!(err, MorphError::Config(_)));
    }
}
