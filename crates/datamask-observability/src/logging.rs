//! Structured logging setup
//!
//! Logs always go to stderr so that command output on stdout stays
//! machine-readable.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::Level;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("Invalid log format '{}'. Use 'text' or 'json'", other)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base level: trace, debug, info, warn or error
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Allow original values to appear in trace-level logs
    #[serde(default)]
    pub log_values: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::Text,
            log_values: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Map a level name to a `Level`, falling back to INFO
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Build the filter: `RUST_LOG` wins when set, otherwise the configured level
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(parse_level(&config.level).to_string()))
}

/// Install the global tracing subscriber
pub fn init_logging(config: &LoggingConfig) -> Result<(), SetGlobalDefaultError> {
    let builder = FmtSubscriber::builder()
        .with_env_filter(build_filter(config))
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("WARN"), Level::WARN);
        assert_eq!(parse_level("loud"), Level::INFO);
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_logging_config_defaults() {
        let config: LoggingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LoggingConfig::default());
        assert!(!config.log_values);

        let config: LoggingConfig =
            serde_json::from_str(r#"{"level": "debug", "format": "json"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
    }
}
