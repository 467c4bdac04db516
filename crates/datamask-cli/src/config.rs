use anyhow::Context;
use datamask_core::MaskingStrategy;
use datamask_engine::{ResolverConfig, RuleMergePolicy};
use datamask_observability::{LogFormat, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataMaskConfig {
    /// Rule catalog file; without one every request uses the fallback strategy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_path: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Print Prometheus metrics to stderr after a batch run
    #[serde(default)]
    pub enabled: bool,
}

impl DataMaskConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents).with_context(|| format!("Invalid TOML in {:?}", path))?
        } else {
            // Default to YAML
            serde_yaml::from_str(&contents).with_context(|| format!("Invalid YAML in {:?}", path))?
        };

        Ok(config)
    }

    /// Merge environment variables into config (env vars take precedence)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("DATAMASK_RULES_PATH") {
            self.rules_path = Some(val);
        }

        // Logging settings
        if let Ok(val) = std::env::var("DATAMASK_LOG_LEVEL") {
            self.logging.level = val;
        }

        if let Ok(val) = std::env::var("DATAMASK_LOG_FORMAT") {
            match val.parse::<LogFormat>() {
                Ok(format) => self.logging.format = format,
                Err(e) => eprintln!("Warning: {}, using default", e),
            }
        }

        if let Ok(val) = std::env::var("DATAMASK_LOG_VALUES")
            && let Ok(enabled) = val.parse::<bool>()
        {
            self.logging.log_values = enabled;
        }

        // Resolver settings
        if let Ok(val) = std::env::var("DATAMASK_MERGE_POLICY") {
            match val.parse::<RuleMergePolicy>() {
                Ok(policy) => self.resolver.merge_policy = policy,
                Err(e) => eprintln!("Warning: Invalid DATAMASK_MERGE_POLICY: {}, using default", e),
            }
        }

        if let Ok(val) = std::env::var("DATAMASK_FALLBACK_STRATEGY") {
            match val.parse::<MaskingStrategy>() {
                Ok(strategy) => self.resolver.fallback_strategy = strategy,
                Err(e) => eprintln!("Warning: {}, using default", e),
            }
        }

        if let Ok(val) = std::env::var("DATAMASK_METRICS")
            && let Ok(enabled) = val.parse::<bool>()
        {
            self.metrics.enabled = enabled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    const ENV_VARS: &[&str] = &[
        "DATAMASK_RULES_PATH",
        "DATAMASK_LOG_LEVEL",
        "DATAMASK_LOG_FORMAT",
        "DATAMASK_LOG_VALUES",
        "DATAMASK_MERGE_POLICY",
        "DATAMASK_FALLBACK_STRATEGY",
        "DATAMASK_METRICS",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_defaults() {
        let config = DataMaskConfig::default();
        assert!(config.rules_path.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.resolver.merge_policy, RuleMergePolicy::RequestOverrides);
        assert_eq!(config.resolver.fallback_strategy, MaskingStrategy::Asterisk);
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            file,
            r#"
rules_path: /etc/datamask/rules.yaml
logging:
  level: debug
  format: json
resolver:
  merge_policy: ignore_rules
  fallback_strategy: HASH
metrics:
  enabled: true
"#
        )
        .unwrap();

        let config = DataMaskConfig::from_file(file.path()).unwrap();
        assert_eq!(config.rules_path.as_deref(), Some("/etc/datamask/rules.yaml"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.resolver.merge_policy, RuleMergePolicy::IgnoreRules);
        assert_eq!(config.resolver.fallback_strategy, MaskingStrategy::Hash);
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            "rules_path = \"rules.toml\"\n\n[logging]\nlevel = \"warn\"\n"
        )
        .unwrap();

        let config = DataMaskConfig::from_file(file.path()).unwrap();
        assert_eq!(config.rules_path.as_deref(), Some("rules.toml"));
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_missing_file() {
        assert!(DataMaskConfig::from_file("/nonexistent/datamask.yaml").is_err());
    }

    #[test]
    #[serial_test::serial]
    fn test_merge_env_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("DATAMASK_RULES_PATH", "/tmp/rules.yaml");
            std::env::set_var("DATAMASK_LOG_FORMAT", "json");
            std::env::set_var("DATAMASK_LOG_VALUES", "true");
            std::env::set_var("DATAMASK_MERGE_POLICY", "ignore-rules");
            std::env::set_var("DATAMASK_FALLBACK_STRATEGY", "partial");
            std::env::set_var("DATAMASK_METRICS", "true");
        }

        let mut config = DataMaskConfig::default();
        config.merge_env();

        assert_eq!(config.rules_path.as_deref(), Some("/tmp/rules.yaml"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.logging.log_values);
        assert_eq!(config.resolver.merge_policy, RuleMergePolicy::IgnoreRules);
        assert_eq!(config.resolver.fallback_strategy, MaskingStrategy::Partial);
        assert!(config.metrics.enabled);

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_merge_env_ignores_invalid_values() {
        clear_env();
        unsafe {
            std::env::set_var("DATAMASK_MERGE_POLICY", "whatever");
            std::env::set_var("DATAMASK_FALLBACK_STRATEGY", "SHRED");
            std::env::set_var("DATAMASK_METRICS", "yes please");
        }

        let mut config = DataMaskConfig::default();
        config.merge_env();

        assert_eq!(config, DataMaskConfig::default());

        clear_env();
    }
}
