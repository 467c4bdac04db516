//! Rule store trait
//!
//! The `RuleStore` trait is the repository abstraction over the masking rule
//! catalog. The engine never reads it directly; the rule resolver does, on
//! behalf of callers that want stored defaults applied to their requests.

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::collections::HashSet;

use crate::{Error, MaskingRule, MaskingStrategy, PiiType, Result};

/// Type alias for rule change streams
pub type RuleChangeStream<'a> = BoxStream<'a, Result<RuleChange>>;

/// Rule catalog change notification
#[derive(Debug, Clone)]
pub struct RuleChange {
    /// Timestamp of the change
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Catalog version after the change
    pub version: u32,
}

/// Masking rule store
///
/// Implementations:
/// - `MemoryRuleStore`: in-process catalog
/// - `FileRuleStore`: YAML/TOML catalog on disk
///
/// # Example
/// ```no_run
/// # use datamask_core::{PiiType, RuleStore};
/// # async fn example(store: &dyn RuleStore) -> datamask_core::Result<()> {
/// if let Some(rule) = store.find_active_by_pii_type(PiiType::Email).await? {
///     println!("email is masked with {}", rule.strategy);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// The unique active rule for a PII type, if any
    async fn find_active_by_pii_type(&self, pii_type: PiiType) -> Result<Option<MaskingRule>>;

    /// Every rule (active or not) for a PII type
    async fn find_by_pii_type(&self, pii_type: PiiType) -> Result<Vec<MaskingRule>>;

    /// All active rules, ordered by PII type
    async fn find_all_active(&self) -> Result<Vec<MaskingRule>>;

    /// All rules using a strategy
    async fn find_by_strategy(&self, strategy: MaskingStrategy) -> Result<Vec<MaskingRule>>;

    /// All rules, ordered by id
    async fn find_all(&self) -> Result<Vec<MaskingRule>>;

    /// Whether any rule exists for a PII type
    async fn exists_by_pii_type(&self, pii_type: PiiType) -> Result<bool> {
        Ok(!self.find_by_pii_type(pii_type).await?.is_empty())
    }

    /// Insert or replace a rule
    ///
    /// A rule with `id == 0` is assigned the next free id. The stored copy is
    /// returned.
    ///
    /// # Errors
    /// - `Error::DuplicateActiveRule` if another active rule has the same PII type
    /// - `Error::RuleNotFound` if a non-zero id does not exist
    async fn save(&self, rule: MaskingRule) -> Result<MaskingRule>;

    /// Delete a rule by id
    ///
    /// # Errors
    /// - `Error::RuleNotFound` if the id does not exist
    async fn delete(&self, id: u64) -> Result<()>;

    /// Watch for catalog changes
    async fn watch_changes(&self) -> Result<RuleChangeStream<'_>> {
        Err(Error::Unsupported(
            "This rule store does not support change notifications".to_string(),
        ))
    }
}

/// Check that no two active rules share a PII type
pub fn validate_unique_active(rules: &[MaskingRule]) -> Result<()> {
    let mut seen = HashSet::new();
    for rule in rules.iter().filter(|r| r.is_active) {
        if !seen.insert(rule.pii_type) {
            return Err(Error::DuplicateActiveRule(rule.pii_type));
        }
    }
    Ok(())
}

/// Insert or replace `rule` in `rules`, enforcing id assignment and the
/// single-active-rule invariant. Shared by the in-tree store implementations.
pub fn upsert_rule(rules: &mut Vec<MaskingRule>, mut rule: MaskingRule) -> Result<MaskingRule> {
    if rule.is_active
        && rules
            .iter()
            .any(|r| r.is_active && r.pii_type == rule.pii_type && r.id != rule.id)
    {
        return Err(Error::DuplicateActiveRule(rule.pii_type));
    }

    if rule.id == 0 {
        rule.id = rules.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        rules.push(rule.clone());
        return Ok(rule);
    }

    let existing = rules
        .iter_mut()
        .find(|r| r.id == rule.id)
        .ok_or(Error::RuleNotFound(rule.id))?;
    rule.created_at = existing.created_at;
    rule.touch();
    *existing = rule.clone();
    Ok(rule)
}
