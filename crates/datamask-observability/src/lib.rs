//! DataMask Observability
//!
//! This crate provides observability features:
//! - Structured logging (text or JSON, filtered by level)
//! - Metrics collection (Prometheus) for masking calls

pub mod logging;
pub mod metrics;

pub use logging::{LogFormat, LoggingConfig, init_logging};
pub use metrics::MaskingMetrics;
