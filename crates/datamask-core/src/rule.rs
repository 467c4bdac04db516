//! Stored masking rules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::envelope::MaskingRequest;
use crate::pii_type::PiiType;
use crate::strategy::MaskingStrategy;

/// Masking rule configuration
///
/// Defines how a specific PII type should be masked when a caller does not
/// spell out every option. At most one rule per PII type may be active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskingRule {
    /// Catalog identifier; 0 means "not yet stored"
    #[serde(default)]
    pub id: u64,

    pub name: String,

    pub pii_type: PiiType,

    pub strategy: MaskingStrategy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement_value: Option<String>,

    #[serde(default = "default_true")]
    pub preserve_length: bool,

    #[serde(default = "default_true")]
    pub preserve_format: bool,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl MaskingRule {
    /// Create an active rule with default flags
    pub fn new(name: impl Into<String>, pii_type: PiiType, strategy: MaskingStrategy) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.into(),
            pii_type,
            strategy,
            custom_pattern: None,
            replacement_value: None,
            preserve_length: true,
            preserve_format: true,
            is_active: true,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_replacement_value(mut self, value: impl Into<String>) -> Self {
        self.replacement_value = Some(value.into());
        self
    }

    pub fn with_flags(mut self, preserve_length: bool, preserve_format: bool) -> Self {
        self.preserve_length = preserve_length;
        self.preserve_format = preserve_format;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Refresh the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Build a request for `data` using every option this rule defines
    pub fn request_for(&self, data: Option<String>) -> MaskingRequest {
        MaskingRequest {
            data,
            pii_type: self.pii_type,
            strategy: self.strategy,
            custom_pattern: self.custom_pattern.clone(),
            replacement_value: self.replacement_value.clone(),
            preserve_length: self.preserve_length,
            preserve_format: self.preserve_format,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_defaults() {
        let rule = MaskingRule::new("email-default", PiiType::Email, MaskingStrategy::Asterisk);

        assert_eq!(rule.id, 0);
        assert!(rule.is_active);
        assert!(rule.preserve_length);
        assert!(rule.preserve_format);
        assert_eq!(rule.created_at, rule.updated_at);
    }

    #[test]
    fn test_touch_moves_updated_at_forward() {
        let mut rule = MaskingRule::new("phone", PiiType::Phone, MaskingStrategy::Asterisk);
        let created = rule.created_at;

        rule.touch();

        assert!(rule.updated_at >= created);
        assert_eq!(rule.created_at, created);
    }

    #[test]
    fn test_request_for_copies_options() {
        let rule = MaskingRule::new("address", PiiType::Address, MaskingStrategy::Placeholder)
            .with_replacement_value("[ADDRESS_MASKED]")
            .with_flags(false, false);

        let request = rule.request_for(Some("Bağdat Cad. No:5".to_string()));

        assert_eq!(request.strategy, MaskingStrategy::Placeholder);
        assert_eq!(request.replacement_value.as_deref(), Some("[ADDRESS_MASKED]"));
        assert!(!request.preserve_length);
        assert!(!request.preserve_format);
    }

    #[test]
    fn test_rule_deserializes_with_defaults() {
        let yaml = r#"
name: tc-default
piiType: TC_KIMLIK_NO
strategy: ASTERISK
description: Show first 3 and last 4 digits
"#;
        let rule: MaskingRule = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(rule.pii_type, PiiType::TcKimlikNo);
        assert!(rule.is_active);
        assert!(rule.preserve_length);
        assert_eq!(rule.id, 0);
    }
}
