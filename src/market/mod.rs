//! Market value aggregation
//!
//! Combines adjusted comparable prices into a quality-weighted market value
//! and rates how much the result can be trusted.

mod calculator;
mod confidence;
mod types;

pub use calculator::MarketValueCalculator;
pub use confidence::ConfidenceCalculator;
pub use types::{
    AggregationFallback, CalculationBreakdown, CalculationMethod, CalculationStep,
    ConfidenceFactors, ConfidenceResult, MarketAnalysis, MarketValueResult, PriceRange,
    ScoredComparable,
};
