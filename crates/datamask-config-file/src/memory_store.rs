//! In-memory RuleStore implementation

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use datamask_core::{
    MaskingRule, MaskingStrategy, PiiType, Result, RuleStore, rule_store::upsert_rule,
};

use crate::catalog::RuleCatalog;

/// Rule catalog held entirely in process memory
///
/// Useful for tests and for embedding the engine without a catalog file.
#[derive(Debug, Default)]
pub struct MemoryRuleStore {
    catalog: RwLock<RuleCatalog>,
}

impl MemoryRuleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `rules`
    ///
    /// # Errors
    /// - `Error::ConfigValidation` if two active rules share a PII type
    pub fn with_rules(rules: Vec<MaskingRule>) -> Result<Self> {
        Ok(Self {
            catalog: RwLock::new(RuleCatalog::new(rules)?),
        })
    }
}

#[async_trait]
impl RuleStore for MemoryRuleStore {
    async fn find_active_by_pii_type(&self, pii_type: PiiType) -> Result<Option<MaskingRule>> {
        Ok(self.catalog.read().await.active_for(pii_type))
    }

    async fn find_by_pii_type(&self, pii_type: PiiType) -> Result<Vec<MaskingRule>> {
        Ok(self.catalog.read().await.by_pii_type(pii_type))
    }

    async fn find_all_active(&self) -> Result<Vec<MaskingRule>> {
        Ok(self.catalog.read().await.all_active())
    }

    async fn find_by_strategy(&self, strategy: MaskingStrategy) -> Result<Vec<MaskingRule>> {
        Ok(self.catalog.read().await.by_strategy(strategy))
    }

    async fn find_all(&self) -> Result<Vec<MaskingRule>> {
        Ok(self.catalog.read().await.sorted_by_id())
    }

    async fn save(&self, rule: MaskingRule) -> Result<MaskingRule> {
        let mut catalog = self.catalog.write().await;
        let stored = upsert_rule(&mut catalog.rules, rule)?;
        debug!(id = stored.id, pii_type = %stored.pii_type, "Saved masking rule");
        Ok(stored)
    }

    async fn delete(&self, id: u64) -> Result<()> {
        self.catalog.write().await.remove(id)?;
        debug!(id, "Deleted masking rule");
        Ok(())
    }
}
