//! Engine-internal error types
//!
//! These never cross the `Masker` boundary: the engine turns them into
//! response envelopes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaskError {
    /// SHA-256 could not be computed; reported as the `HASH_ERROR` sentinel
    #[error("SHA-256 algorithm not available")]
    HashUnavailable,

    #[error("Masking failed: {0}")]
    Internal(String),
}
