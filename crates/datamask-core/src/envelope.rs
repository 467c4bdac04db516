//! Request/response envelopes for the masking engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pii_type::PiiType;
use crate::rule::MaskingRule;
use crate::strategy::MaskingStrategy;

/// A single masking request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskingRequest {
    /// Value to mask; may be absent or empty
    #[serde(default)]
    pub data: Option<String>,

    /// Declared PII type of the value
    pub pii_type: PiiType,

    /// Strategy to apply
    pub strategy: MaskingStrategy,

    /// Reserved; no current strategy reads it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_pattern: Option<String>,

    /// Literal replacement for PLACEHOLDER
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement_value: Option<String>,

    /// Request output length equal to input length
    #[serde(default = "default_true")]
    pub preserve_length: bool,

    /// Request structural characters to be kept
    #[serde(default = "default_true")]
    pub preserve_format: bool,
}

impl MaskingRequest {
    /// Create a request for `data` with default options
    pub fn new(data: impl Into<String>, pii_type: PiiType, strategy: MaskingStrategy) -> Self {
        Self {
            data: Some(data.into()),
            pii_type,
            strategy,
            custom_pattern: None,
            replacement_value: None,
            preserve_length: true,
            preserve_format: true,
        }
    }

    /// Create a request with no data
    pub fn absent(pii_type: PiiType, strategy: MaskingStrategy) -> Self {
        Self {
            data: None,
            ..Self::new(String::new(), pii_type, strategy)
        }
    }

    pub fn with_replacement_value(mut self, value: impl Into<String>) -> Self {
        self.replacement_value = Some(value.into());
        self
    }

    pub fn with_custom_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.custom_pattern = Some(pattern.into());
        self
    }

    pub fn with_preserve_length(mut self, preserve_length: bool) -> Self {
        self.preserve_length = preserve_length;
        self
    }

    pub fn with_preserve_format(mut self, preserve_format: bool) -> Self {
        self.preserve_format = preserve_format;
        self
    }

    /// Borrowed view of the option flags
    pub fn options(&self) -> MaskingOptions<'_> {
        MaskingOptions {
            preserve_length: self.preserve_length,
            preserve_format: self.preserve_format,
            replacement_value: self.replacement_value.as_deref(),
            custom_pattern: self.custom_pattern.as_deref(),
        }
    }
}

/// Option flags the engine dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskingOptions<'a> {
    pub preserve_length: bool,
    pub preserve_format: bool,
    pub replacement_value: Option<&'a str>,
    pub custom_pattern: Option<&'a str>,
}

impl Default for MaskingOptions<'_> {
    fn default() -> Self {
        Self {
            preserve_length: true,
            preserve_format: true,
            replacement_value: None,
            custom_pattern: None,
        }
    }
}

/// A request whose strategy and options may be left for a stored rule to fill in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialMaskingRequest {
    #[serde(default)]
    pub data: Option<String>,

    pub pii_type: PiiType,

    #[serde(default)]
    pub strategy: Option<MaskingStrategy>,

    #[serde(default)]
    pub custom_pattern: Option<String>,

    #[serde(default)]
    pub replacement_value: Option<String>,

    #[serde(default)]
    pub preserve_length: Option<bool>,

    #[serde(default)]
    pub preserve_format: Option<bool>,
}

impl PartialMaskingRequest {
    pub fn new(data: impl Into<String>, pii_type: PiiType) -> Self {
        Self {
            data: Some(data.into()),
            pii_type,
            strategy: None,
            custom_pattern: None,
            replacement_value: None,
            preserve_length: None,
            preserve_format: None,
        }
    }

    pub fn with_strategy(mut self, strategy: MaskingStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Fill every absent field from `rule`; fields present on the request win
    pub fn merge_rule(self, rule: &MaskingRule) -> MaskingRequest {
        MaskingRequest {
            data: self.data,
            pii_type: self.pii_type,
            strategy: self.strategy.unwrap_or(rule.strategy),
            custom_pattern: self.custom_pattern.or_else(|| rule.custom_pattern.clone()),
            replacement_value: self
                .replacement_value
                .or_else(|| rule.replacement_value.clone()),
            preserve_length: self.preserve_length.unwrap_or(rule.preserve_length),
            preserve_format: self.preserve_format.unwrap_or(rule.preserve_format),
        }
    }

    /// Fill every absent field with the envelope defaults
    pub fn with_defaults(self, fallback: MaskingStrategy) -> MaskingRequest {
        MaskingRequest {
            data: self.data,
            pii_type: self.pii_type,
            strategy: self.strategy.unwrap_or(fallback),
            custom_pattern: self.custom_pattern,
            replacement_value: self.replacement_value,
            preserve_length: self.preserve_length.unwrap_or(true),
            preserve_format: self.preserve_format.unwrap_or(true),
        }
    }
}

/// Outcome of a single masking call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskingResponse {
    /// Echoed input
    pub original_data: Option<String>,

    /// Masked value; absent for NULLIFY and on failure
    pub masked_data: Option<String>,

    pub pii_type: PiiType,

    pub strategy: MaskingStrategy,

    /// Completion time
    pub processed_at: DateTime<Utc>,

    pub success: bool,

    /// Present only when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl MaskingResponse {
    /// Successful outcome for `request`
    pub fn success(request: &MaskingRequest, masked_data: Option<String>) -> Self {
        Self {
            original_data: request.data.clone(),
            masked_data,
            pii_type: request.pii_type,
            strategy: request.strategy,
            processed_at: Utc::now(),
            success: true,
            error_message: None,
        }
    }

    /// Failed outcome for `request`
    pub fn failure(request: &MaskingRequest, error_message: impl Into<String>) -> Self {
        Self {
            original_data: request.data.clone(),
            masked_data: None,
            pii_type: request.pii_type,
            strategy: request.strategy,
            processed_at: Utc::now(),
            success: false,
            error_message: Some(error_message.into()),
        }
    }
}

/// Outcome of masking a batch of values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMaskingResponse {
    pub job_id: Uuid,
    pub results: Vec<MaskingResponse>,
    pub total_processed: u64,
    pub total_failed: u64,
    pub processed_at: DateTime<Utc>,
}

impl BatchMaskingResponse {
    pub fn from_results(results: Vec<MaskingResponse>) -> Self {
        let total_failed = results.iter().filter(|r| !r.success).count() as u64;
        Self {
            job_id: Uuid::new_v4(),
            total_processed: results.len() as u64,
            total_failed,
            results,
            processed_at: Utc::now(),
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.total_failed == 0
    }
}

fn default_true() -> bool {
    true
}
