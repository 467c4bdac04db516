//! Error types for DataMask Core

use thiserror::Error;

use crate::pii_type::PiiType;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown PII type: {0}")]
    UnknownPiiType(String),

    #[error("Unknown masking strategy: {0}")]
    UnknownStrategy(String),

    // Rule catalog errors
    #[error("Masking rule not found: {0}")]
    RuleNotFound(u64),

    #[error("An active masking rule already exists for PII type {0}")]
    DuplicateActiveRule(PiiType),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration not found")]
    ConfigNotFound,

    #[error("Configuration validation failed: {0}")]
    ConfigValidation(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
