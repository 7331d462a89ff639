//! Market analysis types

use crate::adjustment::AdjustmentBreakdown;
use crate::money::{format_signed_usd, format_usd};
use crate::quality::QualityScoreBreakdown;
use crate::vehicle::{ComparableVehicle, LossVehicle};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use uuid::Uuid;

/// A comparable enriched with its quality score and adjustments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredComparable {
    #[serde(flatten)]
    pub comparable: ComparableVehicle,
    pub quality_score: QualityScoreBreakdown,
    pub adjustments: AdjustmentBreakdown,
}

impl ScoredComparable {
    /// Final quality score, used as the aggregation weight
    pub fn weight(&self) -> Decimal {
        self.quality_score.final_score
    }

    pub fn adjusted_price(&self) -> Decimal {
        self.adjustments.adjusted_price
    }
}

/// One line of the audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationStep {
    /// 1-based position in the trail
    pub step: u32,
    pub description: String,
    pub formula: String,
    pub result: Decimal,
}

/// Recoverable condition resolved during aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AggregationFallback {
    /// Quality scores summed to zero or less; the plain mean was used
    UnweightedMean { weight_sum: Decimal },
    /// Some scores were negative and weighted as zero; the raw sum stayed positive
    ClampedNegativeWeights { clamped: usize, raw_score_sum: Decimal },
}

/// Ordered audit trail of the aggregation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationBreakdown {
    pub steps: Vec<CalculationStep>,
    #[serde(default)]
    pub fallback: Option<AggregationFallback>,
}

/// Output of the market value aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketValueResult {
    pub final_market_value: Decimal,
    pub steps: Vec<CalculationStep>,
    pub fallback: Option<AggregationFallback>,
}

/// Inputs to the confidence level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceFactors {
    pub comparable_count: usize,
    /// Coefficient of variation of the quality scores
    pub quality_score_variance: Decimal,
    /// Coefficient of variation of the adjusted prices
    pub price_variance: Decimal,
}

/// Confidence level with the factors that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfidenceResult {
    /// 0 to 100
    pub level: u8,
    pub factors: ConfidenceFactors,
}

/// Aggregation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculationMethod {
    #[default]
    QualityWeightedAverage,
}

/// Spread of adjusted prices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: Decimal,
    pub high: Decimal,
    pub median: Decimal,
}

/// Complete market analysis for one appraisal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    pub appraisal_id: Uuid,
    pub loss_vehicle: LossVehicle,
    pub comparables: Vec<ScoredComparable>,
    pub calculated_market_value: Decimal,
    pub calculation_method: CalculationMethod,
    pub confidence_level: u8,
    pub confidence_factors: ConfidenceFactors,
    pub calculation_breakdown: CalculationBreakdown,
    pub price_range: PriceRange,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MarketAnalysis {
    /// Whether a recoverable fallback was applied
    pub fn used_fallback(&self) -> bool {
        self.calculation_breakdown.fallback.is_some()
    }

    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        let mut out = String::new();
        let rule = "───────────────────────────────────────────────────────";

        let _ = writeln!(out);
        let _ = writeln!(out, "══════════════════════════════════════════════════════");
        let _ = writeln!(out, "               MARKET VALUE ANALYSIS");
        let _ = writeln!(out, "══════════════════════════════════════════════════════");
        let _ = writeln!(out);
        let _ = writeln!(out, "LOSS VEHICLE");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Vehicle:          {}", self.loss_vehicle.describe());
        let _ = writeln!(out, "Mileage:          {}", self.loss_vehicle.mileage);
        let _ = writeln!(out, "Condition:        {}", self.loss_vehicle.condition);
        let _ = writeln!(out);
        let _ = writeln!(out, "COMPARABLES");
        let _ = writeln!(out, "{rule}");
        for (i, scored) in self.comparables.iter().enumerate() {
            let comp = &scored.comparable;
            let _ = writeln!(
                out,
                "{:>2}. {:<28} list {:>12}  adj {:>12}  = {:>12}  score {}",
                i + 1,
                comp.describe(),
                format_usd(comp.list_price),
                format_signed_usd(scored.adjustments.total_adjustment),
                format_usd(scored.adjusted_price()),
                scored.weight(),
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "RESULT");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "Market Value:     {}",
            format_usd(self.calculated_market_value)
        );
        let _ = writeln!(
            out,
            "Price Range:      {} - {} (median {})",
            format_usd(self.price_range.low),
            format_usd(self.price_range.high),
            format_usd(self.price_range.median)
        );
        let _ = writeln!(out, "Confidence:       {}%", self.confidence_level);
        match self.calculation_breakdown.fallback {
            Some(AggregationFallback::UnweightedMean { .. }) => {
                let _ = writeln!(out, "Method:           unweighted mean (fallback)");
            }
            Some(AggregationFallback::ClampedNegativeWeights { clamped, .. }) => {
                let _ = writeln!(
                    out,
                    "Method:           quality-weighted average ({clamped} negative scores weighted as zero)"
                );
            }
            None => {
                let _ = writeln!(out, "Method:           quality-weighted average");
            }
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "AUDIT TRAIL");
        let _ = writeln!(out, "{rule}");
        for step in &self.calculation_breakdown.steps {
            let _ = writeln!(
                out,
                "{:>2}. {}\n    {} = {}",
                step.step, step.description, step.formula, step.result
            );
        }
        let _ = writeln!(out, "══════════════════════════════════════════════════════");
        out
    }
}
