//! Confidence level from sample size and scatter

use super::{ConfidenceFactors, ConfidenceResult, ScoredComparable};
use crate::config::ConfidenceConfig;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Rates how far a market value can be trusted.
///
/// Starts from a base that grows with the number of comparables and
/// subtracts capped penalties for spread in quality scores and prices.
#[derive(Debug, Clone, Default)]
pub struct ConfidenceCalculator {
    config: ConfidenceConfig,
}

impl ConfidenceCalculator {
    pub fn new(config: ConfidenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConfidenceConfig {
        &self.config
    }

    /// Confidence level in 0..=100 with its contributing factors
    pub fn calculate_confidence_level(&self, scored: &[ScoredComparable]) -> ConfidenceResult {
        let scores: Vec<Decimal> = scored.iter().map(|s| s.weight()).collect();
        let prices: Vec<Decimal> = scored.iter().map(|s| s.adjusted_price()).collect();

        let quality_cv = coefficient_of_variation(&scores);
        let price_cv = coefficient_of_variation(&prices);

        let base = Decimal::from(self.config.base_for(scored.len()));
        let quality_penalty =
            (quality_cv * self.config.quality_variance_weight).min(self.config.max_quality_penalty);
        let price_penalty =
            (price_cv * self.config.price_variance_weight).min(self.config.max_price_penalty);

        let level = (base - quality_penalty - price_penalty)
            .round()
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
            .to_u8()
            .unwrap_or(0);

        ConfidenceResult {
            level,
            factors: ConfidenceFactors {
                comparable_count: scored.len(),
                quality_score_variance: quality_cv,
                price_variance: price_cv,
            },
        }
    }
}

/// Population standard deviation over the absolute mean, rounded to 4 places.
///
/// Zero for fewer than two values. The mean is floored at 1 so a set centred
/// on zero reads as highly scattered instead of undefined.
pub fn coefficient_of_variation(values: &[Decimal]) -> Decimal {
    if values.len() < 2 {
        return Decimal::ZERO;
    }

    let xs: Vec<f64> = values
        .iter()
        .map(|v| v.to_f64().unwrap_or(0.0))
        .collect();
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let variance = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if std_dev < 1e-9 {
        return Decimal::ZERO;
    }

    let cv = std_dev / mean.abs().max(1.0);
    Decimal::try_from(cv)
        .map(|d| d.round_dp(4))
        .unwrap_or(Decimal::ZERO)
}
