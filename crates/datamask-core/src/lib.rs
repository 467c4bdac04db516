//! DataMask Core Types and Traits
//!
//! This crate provides the fundamental types and traits used throughout DataMask:
//! - PII type and masking strategy catalogs
//! - Request/response envelopes for the masking engine
//! - Masking rules and the rule store abstraction
//! - Core error types

pub mod envelope;
pub mod error;
pub mod observer;
pub mod pii_type;
pub mod rule;
pub mod rule_store;
pub mod strategy;

pub use envelope::{
    BatchMaskingResponse, MaskingOptions, MaskingRequest, MaskingResponse, PartialMaskingRequest,
};
pub use error::{Error, Result};
pub use observer::{MaskOutcome, MaskingObserver};
pub use pii_type::PiiType;
pub use rule::MaskingRule;
pub use rule_store::{RuleChange, RuleChangeStream, RuleStore};
pub use strategy::MaskingStrategy;
