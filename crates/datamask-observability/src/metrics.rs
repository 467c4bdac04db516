//! Metrics collection with Prometheus
//!
//! This module provides Prometheus metrics for the masking engine:
//! - Mask call counts by PII type and strategy
//! - Success, failure and pass-through counts
//! - Per-strategy latency histogram

use datamask_core::{MaskOutcome, MaskingObserver, MaskingStrategy, PiiType};
use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use std::time::Duration;

/// Metrics collector for masking calls
#[derive(Clone)]
pub struct MaskingMetrics {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Every mask call, including pass-through
    pub requests_total: CounterVec,
    pub success_total: CounterVec,
    pub failure_total: CounterVec,
    /// Absent or empty inputs returned unchanged
    pub passthrough_total: CounterVec,

    pub duration_seconds: HistogramVec,
}

impl MaskingMetrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = CounterVec::new(
            Opts::new("datamask_mask_requests_total", "Total number of mask calls"),
            &["pii_type", "strategy"],
        )?;

        let success_total = CounterVec::new(
            Opts::new(
                "datamask_mask_success_total",
                "Total number of successful mask calls",
            ),
            &["pii_type", "strategy"],
        )?;

        let failure_total = CounterVec::new(
            Opts::new(
                "datamask_mask_failure_total",
                "Total number of failed mask calls",
            ),
            &["pii_type", "strategy"],
        )?;

        let passthrough_total = CounterVec::new(
            Opts::new(
                "datamask_mask_passthrough_total",
                "Total number of absent or empty inputs passed through",
            ),
            &["pii_type"],
        )?;

        let duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "datamask_mask_duration_seconds",
                "Mask call duration in seconds",
            )
            .buckets(vec![
                0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05,
            ]),
            &["strategy"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(success_total.clone()))?;
        registry.register(Box::new(failure_total.clone()))?;
        registry.register(Box::new(passthrough_total.clone()))?;
        registry.register(Box::new(duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            success_total,
            failure_total,
            passthrough_total,
            duration_seconds,
        })
    }

    /// Get the Prometheus registry for exporting metrics
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record one mask call
    pub fn record(
        &self,
        pii_type: PiiType,
        strategy: MaskingStrategy,
        outcome: MaskOutcome,
        duration_secs: f64,
    ) {
        let labels = [pii_type.as_str(), strategy.as_str()];
        self.requests_total.with_label_values(&labels).inc();

        match outcome {
            MaskOutcome::PassThrough => self
                .passthrough_total
                .with_label_values(&[pii_type.as_str()])
                .inc(),
            MaskOutcome::Success => self.success_total.with_label_values(&labels).inc(),
            MaskOutcome::Failure => self.failure_total.with_label_values(&labels).inc(),
        }

        self.duration_seconds
            .with_label_values(&[strategy.as_str()])
            .observe(duration_secs);
    }

    /// Render every metric in the Prometheus text format
    pub fn gather_text(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

impl MaskingObserver for MaskingMetrics {
    fn on_mask(
        &self,
        pii_type: PiiType,
        strategy: MaskingStrategy,
        outcome: MaskOutcome,
        elapsed: Duration,
    ) {
        self.record(pii_type, strategy, outcome, elapsed.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter_value(metrics: &MaskingMetrics, name: &str) -> f64 {
        metrics
            .registry()
            .gather()
            .iter()
            .find(|m| m.name() == name)
            .unwrap_or_else(|| panic!("{} metric not found", name))
            .metric
            .iter()
            .map(|m| m.counter.as_ref().unwrap().value.unwrap())
            .sum()
    }

    #[test]
    fn test_metrics_creation() {
        let metrics = MaskingMetrics::new().unwrap();
        // Vectors without observations are not exported yet
        assert!(metrics.registry().gather().is_empty());
    }

    #[test]
    fn test_record_success() {
        let metrics = MaskingMetrics::new().unwrap();
        metrics.record(PiiType::Email, MaskingStrategy::Asterisk, MaskOutcome::Success, 0.001);
        metrics.record(PiiType::Email, MaskingStrategy::Asterisk, MaskOutcome::Success, 0.002);

        assert_eq!(counter_value(&metrics, "datamask_mask_requests_total"), 2.0);
        assert_eq!(counter_value(&metrics, "datamask_mask_success_total"), 2.0);
    }

    #[test]
    fn test_observer_records_outcomes() {
        let metrics = MaskingMetrics::new().unwrap();
        let observer: &dyn MaskingObserver = &metrics;

        observer.on_mask(
            PiiType::Text,
            MaskingStrategy::Random,
            MaskOutcome::Failure,
            Duration::from_micros(40),
        );
        observer.on_mask(
            PiiType::Text,
            MaskingStrategy::Random,
            MaskOutcome::PassThrough,
            Duration::from_micros(1),
        );

        assert_eq!(counter_value(&metrics, "datamask_mask_requests_total"), 2.0);
        assert_eq!(counter_value(&metrics, "datamask_mask_failure_total"), 1.0);
        assert_eq!(counter_value(&metrics, "datamask_mask_passthrough_total"), 1.0);
    }

    #[test]
    fn test_gather_text() {
        let metrics = MaskingMetrics::new().unwrap();
        metrics.record(PiiType::TcKimlikNo, MaskingStrategy::Hash, MaskOutcome::Success, 0.0005);

        let text = metrics.gather_text().unwrap();
        assert!(text.contains("datamask_mask_requests_total"));
        assert!(text.contains("pii_type=\"TC_KIMLIK_NO\""));
        assert!(text.contains("datamask_mask_duration_seconds_bucket"));
    }
}
