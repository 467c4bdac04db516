//! SHA-256 hashing for the HASH strategy

use sha2::{Digest, Sha256};

use crate::MaskError;

/// Value returned by HASH when no digest could be produced
pub const HASH_ERROR: &str = "HASH_ERROR";

/// Lowercase hex SHA-256 of the UTF-8 bytes of `data` (64 characters)
///
/// The digest is compiled in, so this cannot currently fail; the `Result`
/// keeps the `HashUnavailable` path open for pluggable digests.
pub fn sha256_hex(data: &str) -> Result<String, MaskError> {
    let digest = Sha256::digest(data.as_bytes());
    Ok(format!("{:x}", digest))
}

/// Collapse a hashing failure into the `HASH_ERROR` sentinel.
///
/// Other errors are passed through untouched.
pub(crate) fn or_sentinel(result: Result<String, MaskError>) -> Result<String, MaskError> {
    match result {
        Err(MaskError::HashUnavailable) => {
            tracing::error!("SHA-256 algorithm not available");
            Ok(HASH_ERROR.to_string())
        }
        other => other,
    }
}
