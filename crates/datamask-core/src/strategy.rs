//! Masking strategy catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;
use crate::pii_type::normalize_label;

/// Masking strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaskingStrategy {
    /// Replace informative characters with `*`
    Asterisk,

    /// Replace informative characters with random alphanumerics
    Random,

    /// Replace the whole value with a fixed placeholder
    Placeholder,

    /// SHA-256 hex digest of the value
    Hash,

    /// Drop the value entirely
    Nullify,

    /// Keep a quarter of the value at each end, star the middle
    Partial,

    /// Random replacement that keeps length and per-type structure
    FormatPreserving,
}

impl MaskingStrategy {
    /// Every strategy, in catalog order
    pub const ALL: [MaskingStrategy; 7] = [
        MaskingStrategy::Asterisk,
        MaskingStrategy::Random,
        MaskingStrategy::Placeholder,
        MaskingStrategy::Hash,
        MaskingStrategy::Nullify,
        MaskingStrategy::Partial,
        MaskingStrategy::FormatPreserving,
    ];

    /// Symbolic label
    pub fn as_str(&self) -> &'static str {
        match self {
            MaskingStrategy::Asterisk => "ASTERISK",
            MaskingStrategy::Random => "RANDOM",
            MaskingStrategy::Placeholder => "PLACEHOLDER",
            MaskingStrategy::Hash => "HASH",
            MaskingStrategy::Nullify => "NULLIFY",
            MaskingStrategy::Partial => "PARTIAL",
            MaskingStrategy::FormatPreserving => "FORMAT_PRESERVING",
        }
    }

    /// Whether the output depends on the PII type of the request.
    ///
    /// HASH, NULLIFY and PARTIAL treat every value the same way.
    pub fn is_type_sensitive(&self) -> bool {
        !matches!(
            self,
            MaskingStrategy::Hash | MaskingStrategy::Nullify | MaskingStrategy::Partial
        )
    }

    /// Whether the strategy draws from a randomness source
    pub fn uses_randomness(&self) -> bool {
        matches!(
            self,
            MaskingStrategy::Random | MaskingStrategy::FormatPreserving
        )
    }
}

impl Default for MaskingStrategy {
    fn default() -> Self {
        MaskingStrategy::Asterisk
    }
}

impl fmt::Display for MaskingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaskingStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_label(s);
        MaskingStrategy::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| Error::UnknownStrategy(s.to_string()))
    }
}
