//! On-disk rule catalog format

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::error;

use datamask_core::{
    Error, MaskingRule, MaskingStrategy, PiiType, Result, rule_store::validate_unique_active,
};

/// Serialization format of a catalog file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Yaml,
    Toml,
}

impl CatalogFormat {
    /// TOML for `.toml` files, YAML for everything else
    pub fn from_path(path: &Path) -> Self {
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            CatalogFormat::Toml
        } else {
            CatalogFormat::Yaml
        }
    }
}

/// A validated set of masking rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleCatalog {
    #[serde(default)]
    pub rules: Vec<MaskingRule>,
}

impl RuleCatalog {
    /// Build a catalog, assigning ids to unnumbered rules and validating it
    pub fn new(mut rules: Vec<MaskingRule>) -> Result<Self> {
        let mut next_id = rules.iter().map(|r| r.id).max().unwrap_or(0);
        for rule in rules.iter_mut().filter(|r| r.id == 0) {
            next_id += 1;
            rule.id = next_id;
        }

        let catalog = Self { rules };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse catalog text
    pub fn parse(contents: &str, format: CatalogFormat) -> Result<Self> {
        let parsed: RuleCatalog = match format {
            CatalogFormat::Toml => toml::from_str(contents).map_err(|e| {
                error!("Failed to parse TOML rule catalog: {}", e);
                Error::Config(format!("Invalid TOML: {}", e))
            })?,
            CatalogFormat::Yaml => {
                // An empty YAML document is an empty catalog
                if contents.trim().is_empty() {
                    RuleCatalog::default()
                } else {
                    serde_yaml::from_str(contents).map_err(|e| {
                        error!("Failed to parse YAML rule catalog: {}", e);
                        Error::Config(format!("Invalid YAML: {}", e))
                    })?
                }
            }
        };

        Self::new(parsed.rules)
    }

    /// Read and parse a catalog file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            error!("Failed to read rule catalog {:?}: {}", path, e);
            Error::Io(e)
        })?;
        Self::parse(&contents, CatalogFormat::from_path(path))
    }

    /// Serialize the catalog
    pub fn render(&self, format: CatalogFormat) -> Result<String> {
        match format {
            CatalogFormat::Toml => toml::to_string_pretty(self).map_err(|e| {
                error!("Failed to serialize TOML rule catalog: {}", e);
                Error::Config(format!("TOML serialization error: {}", e))
            }),
            CatalogFormat::Yaml => serde_yaml::to_string(self).map_err(|e| {
                error!("Failed to serialize YAML rule catalog: {}", e);
                Error::Config(format!("YAML serialization error: {}", e))
            }),
        }
    }

    /// Check id uniqueness and the single-active-rule invariant
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for rule in &self.rules {
            if !ids.insert(rule.id) {
                return Err(Error::ConfigValidation(format!(
                    "rule id {} is used more than once",
                    rule.id
                )));
            }
        }

        validate_unique_active(&self.rules).map_err(|e| Error::ConfigValidation(e.to_string()))
    }

    pub fn active_for(&self, pii_type: PiiType) -> Option<MaskingRule> {
        self.rules
            .iter()
            .find(|r| r.is_active && r.pii_type == pii_type)
            .cloned()
    }

    pub fn by_pii_type(&self, pii_type: PiiType) -> Vec<MaskingRule> {
        self.sorted_by_id()
            .into_iter()
            .filter(|r| r.pii_type == pii_type)
            .collect()
    }

    /// Active rules ordered by PII type
    pub fn all_active(&self) -> Vec<MaskingRule> {
        let mut rules: Vec<_> = self.rules.iter().filter(|r| r.is_active).cloned().collect();
        rules.sort_by_key(|r| r.pii_type);
        rules
    }

    pub fn by_strategy(&self, strategy: MaskingStrategy) -> Vec<MaskingRule> {
        self.sorted_by_id()
            .into_iter()
            .filter(|r| r.strategy == strategy)
            .collect()
    }

    pub fn sorted_by_id(&self) -> Vec<MaskingRule> {
        let mut rules = self.rules.clone();
        rules.sort_by_key(|r| r.id);
        rules
    }

    /// Remove a rule by id
    pub fn remove(&mut self, id: u64) -> Result<MaskingRule> {
        let index = self
            .rules
            .iter()
            .position(|r| r.id == id)
            .ok_or(Error::RuleNotFound(id))?;
        Ok(self.rules.remove(index))
    }
}
