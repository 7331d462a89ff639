//! Engine metrics
//!
//! Emitted through the `metrics` facade; they are dropped unless the host
//! process installs a recorder.

use crate::market::MarketAnalysis;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Completed market analyses
    Analyses,
    /// Analyses that fell back to the unweighted mean
    AggregationFallbacks,
    /// Equipment features with no standard value
    UnknownFeatures,
}

/// Histogram metric types
#[derive(Debug, Clone, Copy)]
pub enum HistogramMetric {
    /// Confidence level per analysis
    ConfidenceLevel,
    /// Comparables per analysis
    ComparableCount,
}

impl CounterMetric {
    pub fn name(&self) -> &'static str {
        match self {
            CounterMetric::Analyses => "fmv_analyses_total",
            CounterMetric::AggregationFallbacks => "fmv_aggregation_fallbacks_total",
            CounterMetric::UnknownFeatures => "fmv_unknown_features_total",
        }
    }
}

impl HistogramMetric {
    pub fn name(&self) -> &'static str {
        match self {
            HistogramMetric::ConfidenceLevel => "fmv_confidence_level",
            HistogramMetric::ComparableCount => "fmv_comparable_count",
        }
    }
}

fn increment(metric: CounterMetric, by: u64) {
    ::metrics::counter!(metric.name()).increment(by);
}

fn record(metric: HistogramMetric, value: f64) {
    ::metrics::histogram!(metric.name()).record(value);
}

/// Record a completed analysis
pub fn record_analysis(analysis: &MarketAnalysis) {
    increment(CounterMetric::Analyses, 1);
    record(
        HistogramMetric::ConfidenceLevel,
        f64::from(analysis.confidence_level),
    );
    record(
        HistogramMetric::ComparableCount,
        analysis.comparables.len() as f64,
    );
}

/// Record an unweighted-mean fallback
pub fn record_fallback() {
    increment(CounterMetric::AggregationFallbacks, 1);
}

/// Record features that had no standard value
pub fn record_unknown_features(count: usize) {
    tracing::debug!(count, "Unknown equipment features");
    increment(CounterMetric::UnknownFeatures, count as u64);
}
