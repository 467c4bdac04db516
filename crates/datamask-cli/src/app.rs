//! Command implementations
//!
//! Commands write to a caller-supplied writer so they can be exercised
//! without touching the process's stdout.

use anyhow::Context;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use datamask_config_file::{FileRuleStore, MemoryRuleStore, RuleCatalog};
use datamask_core::{
    BatchMaskingResponse, MaskingRequest, MaskingStrategy, PartialMaskingRequest, PiiType,
    RuleStore,
};
use datamask_engine::{Masker, MaskingEngine, RuleResolver};
use datamask_observability::MaskingMetrics;

use crate::config::DataMaskConfig;

/// Per-invocation masking options from the command line
#[derive(Debug, Clone, Default)]
pub struct MaskOverrides {
    pub strategy: Option<MaskingStrategy>,
    pub replacement: Option<String>,
    pub preserve_length: Option<bool>,
    pub preserve_format: Option<bool>,
}

/// Everything a command needs, built once from configuration
pub struct App {
    engine: MaskingEngine,
    resolver: RuleResolver,
    store: Arc<dyn RuleStore>,
    metrics: Option<MaskingMetrics>,
    has_catalog: bool,
}

impl App {
    pub async fn from_config(config: &DataMaskConfig) -> anyhow::Result<Self> {
        let (store, has_catalog): (Arc<dyn RuleStore>, bool) = match &config.rules_path {
            Some(path) => {
                let store = FileRuleStore::new(path)
                    .await
                    .with_context(|| format!("Failed to open rule catalog {}", path))?;
                (Arc::new(store), true)
            }
            None => (Arc::new(MemoryRuleStore::new()), false),
        };

        let metrics = if config.metrics.enabled {
            Some(MaskingMetrics::new().context("Failed to create metrics registry")?)
        } else {
            None
        };

        Ok(Self::new(store, config, metrics, has_catalog))
    }

    pub fn new(
        store: Arc<dyn RuleStore>,
        config: &DataMaskConfig,
        metrics: Option<MaskingMetrics>,
        has_catalog: bool,
    ) -> Self {
        let mut engine = MaskingEngine::new().log_values(config.logging.log_values);
        if let Some(metrics) = &metrics {
            engine = engine.with_observer(Arc::new(metrics.clone()));
        }

        Self {
            engine,
            resolver: RuleResolver::new(store.clone(), config.resolver.clone()),
            store,
            metrics,
            has_catalog,
        }
    }

    /// Complete a request template from the overrides and the active rule
    async fn build_request(
        &self,
        data: Option<String>,
        pii_type: PiiType,
        overrides: &MaskOverrides,
    ) -> anyhow::Result<MaskingRequest> {
        let partial = PartialMaskingRequest {
            data,
            pii_type,
            strategy: overrides.strategy,
            custom_pattern: None,
            replacement_value: overrides.replacement.clone(),
            preserve_length: overrides.preserve_length,
            preserve_format: overrides.preserve_format,
        };
        Ok(self.resolver.apply_defaults(partial).await?)
    }

    /// Mask one value and print the response; returns the success flag
    pub async fn mask(
        &self,
        value: String,
        pii_type: PiiType,
        overrides: &MaskOverrides,
        pretty: bool,
        out: &mut impl Write,
    ) -> anyhow::Result<bool> {
        let request = self.build_request(Some(value), pii_type, overrides).await?;
        let response = self.engine.mask(&request);
        write_json(out, &response, pretty)?;
        Ok(response.success)
    }

    /// Mask one value per input line and print the batch response
    pub async fn batch(
        &self,
        input: impl BufRead,
        pii_type: PiiType,
        overrides: &MaskOverrides,
        pretty: bool,
        out: &mut impl Write,
    ) -> anyhow::Result<BatchMaskingResponse> {
        let template = self.build_request(None, pii_type, overrides).await?;

        let mut requests = Vec::new();
        for line in input.lines() {
            let line = line.context("Failed to read batch input")?;
            requests.push(MaskingRequest {
                data: Some(line),
                ..template.clone()
            });
        }

        let batch = self.engine.mask_batch(&requests);
        info!(
            job_id = %batch.job_id,
            total = batch.total_processed,
            failed = batch.total_failed,
            "Batch masking finished"
        );
        write_json(out, &batch, pretty)?;
        Ok(batch)
    }

    pub async fn list_rules(&self, active_only: bool, out: &mut impl Write) -> anyhow::Result<()> {
        self.warn_without_catalog();
        let rules = if active_only {
            self.store.find_all_active().await?
        } else {
            self.store.find_all().await?
        };

        for rule in rules {
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}",
                rule.id,
                rule.pii_type,
                rule.strategy,
                if rule.is_active { "active" } else { "inactive" },
                rule.name
            )?;
        }
        Ok(())
    }

    pub async fn show_rule(&self, pii_type: PiiType, out: &mut impl Write) -> anyhow::Result<()> {
        self.warn_without_catalog();
        match self.resolver.active_rule_for(pii_type).await? {
            Some(rule) => write_json(out, &rule, true),
            None => anyhow::bail!("No active masking rule for {}", pii_type),
        }
    }

    /// Metrics text, when metrics are enabled
    pub fn metrics_text(&self) -> anyhow::Result<Option<String>> {
        self.metrics
            .as_ref()
            .map(|m| m.gather_text().context("Failed to encode metrics"))
            .transpose()
    }

    fn warn_without_catalog(&self) {
        if !self.has_catalog {
            warn!("No rule catalog configured; use --rules or DATAMASK_RULES_PATH");
        }
    }
}

/// Validate a catalog file without opening it as a store
pub fn validate_rules(path: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let catalog =
        RuleCatalog::load(path).with_context(|| format!("Invalid rule catalog {:?}", path))?;
    let active = catalog.rules.iter().filter(|r| r.is_active).count();
    writeln!(
        out,
        "{:?}: {} rules ({} active)",
        path,
        catalog.rules.len(),
        active
    )?;
    Ok(())
}

pub fn list_pii_types(out: &mut impl Write) -> anyhow::Result<()> {
    for pii_type in PiiType::ALL {
        writeln!(out, "{}", pii_type)?;
    }
    Ok(())
}

pub fn list_strategies(out: &mut impl Write) -> anyhow::Result<()> {
    for strategy in MaskingStrategy::ALL {
        writeln!(out, "{}", strategy)?;
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(out: &mut impl Write, value: &T, pretty: bool) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}
