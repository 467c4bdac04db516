//! Rule resolution
//!
//! Looks up the active rule for a PII type and, depending on the merge
//! policy, uses it to fill in whatever a caller left unspecified.

use datamask_core::{
    MaskingRequest, MaskingRule, MaskingStrategy, PartialMaskingRequest, PiiType, Result,
    RuleStore,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// How stored rule defaults and per-request options combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleMergePolicy {
    /// Options present on the request win; the active rule fills the rest
    #[default]
    RequestOverrides,

    /// The rule store is never consulted while building requests
    IgnoreRules,
}

impl std::str::FromStr for RuleMergePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "request_overrides" => Ok(RuleMergePolicy::RequestOverrides),
            "ignore_rules" => Ok(RuleMergePolicy::IgnoreRules),
            other => Err(format!("unknown merge policy '{}'", other)),
        }
    }
}

/// Resolver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub merge_policy: RuleMergePolicy,

    /// Strategy used when neither the request nor a rule names one
    #[serde(default)]
    pub fallback_strategy: MaskingStrategy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            merge_policy: RuleMergePolicy::RequestOverrides,
            fallback_strategy: MaskingStrategy::Asterisk,
        }
    }
}

/// Resolves stored masking rules for callers assembling requests
pub struct RuleResolver<S: ?Sized = dyn RuleStore> {
    store: Arc<S>,
    config: ResolverConfig,
}

impl<S: RuleStore + ?Sized> RuleResolver<S> {
    pub fn new(store: Arc<S>, config: ResolverConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The unique active rule for `pii_type`, if one exists
    pub async fn active_rule_for(&self, pii_type: PiiType) -> Result<Option<MaskingRule>> {
        self.store.find_active_by_pii_type(pii_type).await
    }

    /// Build a complete request for `data` from the active rule
    pub async fn request_for(
        &self,
        data: Option<String>,
        pii_type: PiiType,
    ) -> Result<MaskingRequest> {
        let mut partial = PartialMaskingRequest::new(String::new(), pii_type);
        partial.data = data;
        self.apply_defaults(partial).await
    }

    /// Complete a partial request according to the merge policy
    pub async fn apply_defaults(&self, partial: PartialMaskingRequest) -> Result<MaskingRequest> {
        if self.config.merge_policy == RuleMergePolicy::IgnoreRules {
            return Ok(partial.with_defaults(self.config.fallback_strategy));
        }

        match self.active_rule_for(partial.pii_type).await? {
            Some(rule) => {
                debug!(
                    pii_type = %partial.pii_type,
                    rule = %rule.name,
                    "Applying active masking rule defaults"
                );
                Ok(partial.merge_rule(&rule))
            }
            None => {
                debug!(
                    pii_type = %partial.pii_type,
                    fallback = %self.config.fallback_strategy,
                    "No active masking rule, using fallback"
                );
                Ok(partial.with_defaults(self.config.fallback_strategy))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use datamask_core::Error;
    use mockall::mock;
    use mockall::predicate::*;

    mock! {
        pub Store {}

        #[async_trait]
        impl RuleStore for Store {
            async fn find_active_by_pii_type(&self, pii_type: PiiType) -> Result<Option<MaskingRule>>;
            async fn find_by_pii_type(&self, pii_type: PiiType) -> Result<Vec<MaskingRule>>;
            async fn find_all_active(&self) -> Result<Vec<MaskingRule>>;
            async fn find_by_strategy(&self, strategy: MaskingStrategy) -> Result<Vec<MaskingRule>>;
            async fn find_all(&self) -> Result<Vec<MaskingRule>>;
            async fn save(&self, rule: MaskingRule) -> Result<MaskingRule>;
            async fn delete(&self, id: u64) -> Result<()>;
        }
    }

    fn address_rule() -> MaskingRule {
        MaskingRule::new("address", PiiType::Address, MaskingStrategy::Placeholder)
            .with_replacement_value("[ADDRESS_MASKED]")
            .with_flags(false, false)
    }

    #[tokio::test]
    async fn test_active_rule_for_delegates_to_store() {
        let mut store = MockStore::new();
        store
            .expect_find_active_by_pii_type()
            .with(eq(PiiType::Address))
            .times(1)
            .returning(|_| Ok(Some(address_rule())));

        let resolver = RuleResolver::new(Arc::new(store), ResolverConfig::default());
        let rule = resolver.active_rule_for(PiiType::Address).await.unwrap().unwrap();

        assert_eq!(rule.strategy, MaskingStrategy::Placeholder);
    }

    #[tokio::test]
    async fn test_active_rule_for_missing() {
        let mut store = MockStore::new();
        store
            .expect_find_active_by_pii_type()
            .returning(|_| Ok(None));

        let resolver = RuleResolver::new(Arc::new(store), ResolverConfig::default());
        assert!(resolver.active_rule_for(PiiType::Passport).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_request_for_uses_rule() {
        let mut store = MockStore::new();
        store
            .expect_find_active_by_pii_type()
            .returning(|_| Ok(Some(address_rule())));

        let resolver = RuleResolver::new(Arc::new(store), ResolverConfig::default());
        let request = resolver
            .request_for(Some("Bağdat Cad. 10".to_string()), PiiType::Address)
            .await
            .unwrap();

        assert_eq!(request.data.as_deref(), Some("Bağdat Cad. 10"));
        assert_eq!(request.strategy, MaskingStrategy::Placeholder);
        assert_eq!(request.replacement_value.as_deref(), Some("[ADDRESS_MASKED]"));
        assert!(!request.preserve_length);
    }

    #[tokio::test]
    async fn test_request_options_override_rule() {
        let mut store = MockStore::new();
        store
            .expect_find_active_by_pii_type()
            .returning(|_| Ok(Some(address_rule())));

        let resolver = RuleResolver::new(Arc::new(store), ResolverConfig::default());
        let mut partial = PartialMaskingRequest::new("Bağdat Cad. 10", PiiType::Address)
            .with_strategy(MaskingStrategy::Asterisk);
        partial.preserve_format = Some(true);

        let request = resolver.apply_defaults(partial).await.unwrap();

        assert_eq!(request.strategy, MaskingStrategy::Asterisk);
        assert!(request.preserve_format);
        // Not overridden, so taken from the rule
        assert!(!request.preserve_length);
    }

    #[tokio::test]
    async fn test_no_rule_uses_fallback() {
        let mut store = MockStore::new();
        store
            .expect_find_active_by_pii_type()
            .returning(|_| Ok(None));

        let config = ResolverConfig {
            merge_policy: RuleMergePolicy::RequestOverrides,
            fallback_strategy: MaskingStrategy::Hash,
        };
        let resolver = RuleResolver::new(Arc::new(store), config);
        let request = resolver
            .request_for(Some("x".to_string()), PiiType::Text)
            .await
            .unwrap();

        assert_eq!(request.strategy, MaskingStrategy::Hash);
        assert!(request.preserve_length);
        assert!(request.preserve_format);
    }

    #[tokio::test]
    async fn test_ignore_rules_never_reads_store() {
        let mut store = MockStore::new();
        store.expect_find_active_by_pii_type().times(0);

        let config = ResolverConfig {
            merge_policy: RuleMergePolicy::IgnoreRules,
            fallback_strategy: MaskingStrategy::Partial,
        };
        let resolver = RuleResolver::new(Arc::new(store), config);
        let request = resolver
            .request_for(Some("1234567890".to_string()), PiiType::Numeric)
            .await
            .unwrap();

        assert_eq!(request.strategy, MaskingStrategy::Partial);
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let mut store = MockStore::new();
        store
            .expect_find_active_by_pii_type()
            .returning(|_| Err(Error::Internal("catalog offline".to_string())));

        let resolver = RuleResolver::new(Arc::new(store), ResolverConfig::default());
        let result = resolver.request_for(Some("x".to_string()), PiiType::Email).await;

        assert!(matches!(result, Err(Error::Internal(_))));
    }

    #[tokio::test]
    async fn test_resolver_over_trait_object() {
        let mut store = MockStore::new();
        store
            .expect_find_active_by_pii_type()
            .returning(|_| Ok(None));

        let store: Arc<dyn RuleStore> = Arc::new(store);
        let resolver: RuleResolver = RuleResolver::new(store, ResolverConfig::default());
        assert!(resolver.active_rule_for(PiiType::Email).await.unwrap().is_none());
    }

    #[test]
    fn test_merge_policy_parsing() {
        assert_eq!(
            "request-overrides".parse::<RuleMergePolicy>().unwrap(),
            RuleMergePolicy::RequestOverrides
        );
        assert_eq!(
            "IGNORE_RULES".parse::<RuleMergePolicy>().unwrap(),
            RuleMergePolicy::IgnoreRules
        );
        assert!("merge".parse::<RuleMergePolicy>().is_err());
    }

    #[test]
    fn test_merge_policy_serde() {
        let json = serde_json::to_string(&RuleMergePolicy::IgnoreRules).unwrap();
        assert_eq!(json, "\"ignore_rules\"");
    }
}
