//! DataMask masking engine
//!
//! This crate turns a [`MaskingRequest`](datamask_core::MaskingRequest) into a
//! [`MaskingResponse`](datamask_core::MaskingResponse):
//! - Per-type asterisk and random masking (email, phone, national ID, card, names)
//! - Placeholder, SHA-256 hash, nullify and partial redaction
//! - Injectable randomness for deterministic tests
//! - Rule resolution that fills request defaults from the rule catalog
//!
//! The engine performs structural redaction. Neither HASH nor
//! FORMAT_PRESERVING is encryption: both remain open to dictionary and
//! frequency analysis, so treat their output as "not readable at a glance"
//! rather than as a confidentiality guarantee.

mod email;
pub mod error;
pub mod hash;
pub mod masker;
pub mod random;
pub mod resolver;

pub use error::MaskError;
pub use hash::HASH_ERROR;
pub use masker::{Masker, MaskingEngine};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use resolver::{ResolverConfig, RuleMergePolicy, RuleResolver};
