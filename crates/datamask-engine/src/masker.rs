//! Masking engine

mod asterisk;
mod randomized;

use datamask_core::{
    BatchMaskingResponse, MaskOutcome, MaskingObserver, MaskingOptions, MaskingRequest,
    MaskingResponse, MaskingStrategy, PiiType,
};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, trace};

use crate::hash;
use crate::random::{RandomSource, ThreadRandom};
use crate::MaskError;

/// Trait for masking single values
///
/// Implementations are total: every request maps to a response, and failures
/// are reported through `MaskingResponse::success == false`.
pub trait Masker: Send + Sync {
    /// Mask a single value
    fn mask(&self, request: &MaskingRequest) -> MaskingResponse;

    /// Mask every request independently and summarize the outcomes
    fn mask_batch(&self, requests: &[MaskingRequest]) -> BatchMaskingResponse {
        let results = requests.iter().map(|request| self.mask(request)).collect();
        BatchMaskingResponse::from_results(results)
    }
}

/// Standard masking engine
///
/// Stateless apart from its randomness source, so a single engine can be
/// shared across threads behind an `Arc`.
pub struct MaskingEngine<R = ThreadRandom> {
    random: R,
    observer: Option<Arc<dyn MaskingObserver>>,
    log_values: bool,
}

impl MaskingEngine<ThreadRandom> {
    /// Create an engine backed by the thread-local OS-seeded generator
    pub fn new() -> Self {
        Self::with_random(ThreadRandom)
    }
}

impl Default for MaskingEngine<ThreadRandom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> MaskingEngine<R> {
    /// Create an engine with a specific randomness source
    pub fn with_random(random: R) -> Self {
        Self {
            random,
            observer: None,
            log_values: false,
        }
    }

    /// Report every call to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn MaskingObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Include original values in trace-level logs. Keep this off in production.
    pub fn log_values(mut self, enabled: bool) -> Self {
        self.log_values = enabled;
        self
    }

    pub fn random_source(&self) -> &R {
        &self.random
    }

    /// Apply the request's strategy to non-empty `data`
    fn apply_strategy(&self, data: &str, request: &MaskingRequest) -> Result<Option<String>, MaskError> {
        let options = request.options();
        let masked = match request.strategy {
            MaskingStrategy::Asterisk => asterisk::mask(data, request.pii_type, options),
            MaskingStrategy::Random => {
                randomized::mask(data, request.pii_type, options, &self.random)
            }
            MaskingStrategy::Placeholder => mask_placeholder(request.pii_type, options),
            MaskingStrategy::Hash => hash::or_sentinel(hash::sha256_hex(data))?,
            MaskingStrategy::Nullify => return Ok(None),
            MaskingStrategy::Partial => mask_partial(data),
            MaskingStrategy::FormatPreserving => {
                let options = MaskingOptions {
                    preserve_length: true,
                    ..options
                };
                randomized::mask(data, request.pii_type, options, &self.random)
            }
        };
        Ok(Some(masked))
    }

    /// Run `apply_strategy`, turning a panic into an error
    fn apply_guarded(&self, data: &str, request: &MaskingRequest) -> Result<Option<String>, MaskError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.apply_strategy(data, request)))
            .unwrap_or_else(|payload| Err(MaskError::Internal(panic_message(payload.as_ref()))))
    }

    fn notify(&self, request: &MaskingRequest, outcome: MaskOutcome, started: Instant) {
        if let Some(observer) = &self.observer {
            observer.on_mask(request.pii_type, request.strategy, outcome, started.elapsed());
        }
    }
}

impl<R: RandomSource> Masker for MaskingEngine<R> {
    fn mask(&self, request: &MaskingRequest) -> MaskingResponse {
        let span = info_span!(
            "mask",
            pii_type = %request.pii_type,
            strategy = %request.strategy
        );
        let _enter = span.enter();
        let started = Instant::now();

        let data = match request.data.as_deref() {
            Some(data) if !data.is_empty() => data,
            _ => {
                debug!("Input absent or empty, passing through");
                self.notify(request, MaskOutcome::PassThrough, started);
                return MaskingResponse::success(request, request.data.clone());
            }
        };

        info!(
            pii_type = %request.pii_type,
            strategy = %request.strategy,
            "Masking data of type {} with strategy {}",
            request.pii_type,
            request.strategy
        );
        if self.log_values {
            trace!(original = %data, "Original value");
        }

        match self.apply_guarded(data, request) {
            Ok(masked) => {
                self.notify(request, MaskOutcome::Success, started);
                MaskingResponse::success(request, masked)
            }
            Err(e) => {
                error!(
                    pii_type = %request.pii_type,
                    strategy = %request.strategy,
                    "Error masking data: {}",
                    e
                );
                self.notify(request, MaskOutcome::Failure, started);
                MaskingResponse::failure(request, e.to_string())
            }
        }
    }
}

/// Caller-supplied replacement, or `[<TYPE>_MASKED]`
fn mask_placeholder(pii_type: PiiType, options: MaskingOptions<'_>) -> String {
    match options.replacement_value {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => format!("[{}_MASKED]", pii_type.as_str()),
    }
}

/// Keep `max(1, len / 4)` characters at each end and star the middle
fn mask_partial(data: &str) -> String {
    let chars: Vec<char> = data.chars().collect();
    let len = chars.len();
    if len <= 2 {
        return stars(len);
    }

    let visible = (len / 4).max(1);
    let head: String = chars[..visible].iter().collect();
    let tail: String = chars[len - visible..].iter().collect();
    format!("{}{}{}", head, stars(len - 2 * visible), tail)
}

pub(crate) fn stars(n: usize) -> String {
    "*".repeat(n)
}

/// Length in characters, not bytes
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unexpected panic while masking".to_string()
    }
}
