//! Telemetry module
//!
//! Structured logging and metrics

mod logging;
mod metrics;

pub use logging::init_logging;
pub use metrics::{
    record_analysis, record_fallback, record_unknown_features, CounterMetric, HistogramMetric,
};

use crate::config::TelemetryConfig;

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level, config.log_format)
}
