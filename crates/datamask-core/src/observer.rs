//! Hook for recording masking outcomes

use std::time::Duration;

use crate::{MaskingStrategy, PiiType};

/// How a masking call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskOutcome {
    /// Absent or empty input, returned unchanged
    PassThrough,
    Success,
    Failure,
}

impl MaskOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaskOutcome::PassThrough => "pass_through",
            MaskOutcome::Success => "success",
            MaskOutcome::Failure => "failure",
        }
    }
}

/// Receives one notification per masking call
pub trait MaskingObserver: Send + Sync {
    fn on_mask(
        &self,
        pii_type: PiiType,
        strategy: MaskingStrategy,
        outcome: MaskOutcome,
        elapsed: Duration,
    );
}
