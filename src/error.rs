use thiserror::Error;

use crate::morph_type::MorphType;

pub type MorphResult<T> = Result<T, MorphError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MorphError {
    #[error("Unknown morph type '{name}'")]
    UnknownMorphType { name: String },

    #[error("Morph type '{morph}' has no registered primitive")]
    UnregisteredMorph { morph: MorphType },

    #[error(
        "Compare context mismatch: {items} items, {colors} colors, item count {item_count}. All three must be equal"
    )]
    ContextMismatch {
        items: usize,
        colors: usize,
        item_count: usize,
    },

    #[error("Raw value decode error: {0}")]
    RawValueDecode(String),

    #[error("Raw value encode error: {0}")]
    RawValueEncode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for MorphError {
    fn from(err: serde_json::Error) -> Self {
        MorphError::RawValueDecode(err.to_string())
    }
}

impl From<base64::DecodeError> for MorphError {
    fn from(err: base64::DecodeError) -> Self {
        MorphError::RawValueDecode(err.to_string())
    }
}

impl From<serde_yaml::Error> for MorphError {
    fn from(err: serde_yaml::Error) -> Self {
        MorphError::Config(err.to_string())
    }
}

impl From<std::io::Error> for MorphError {
    fn from(err: std::io::Error) -> Self {
        MorphError::Io(err.to_string())
    }
}
