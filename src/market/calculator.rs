//! Quality-weighted market value

use super::{AggregationFallback, CalculationStep, MarketValueResult, PriceRange, ScoredComparable};
use crate::engine::ValuationError;
use crate::money::{format_usd, round_cents};
use crate::vehicle::LossVehicle;
use rust_decimal::Decimal;

/// Aggregates adjusted prices into a single market value
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketValueCalculator;

impl MarketValueCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Weighted average of adjusted prices by quality score.
    ///
    /// When the raw scores sum to zero or less the plain mean is used and the
    /// fallback is recorded. Otherwise negative scores carry zero weight and,
    /// if any were clamped, that is recorded too.
    pub fn calculate_market_value(
        &self,
        scored: &[ScoredComparable],
        loss: &LossVehicle,
    ) -> Result<MarketValueResult, ValuationError> {
        if scored.is_empty() {
            return Err(ValuationError::NoComparables);
        }

        let raw_score_sum = checked_sum(scored.iter().map(|s| s.weight()), "quality score sum")?;
        if raw_score_sum <= Decimal::ZERO {
            return unweighted_mean(scored, loss, raw_score_sum);
        }

        let mut trail = StepLog::default();
        let mut weighted_sum = Decimal::ZERO;
        let mut weight_sum = Decimal::ZERO;
        let mut clamped = 0;

        for (i, item) in scored.iter().enumerate() {
            let score = item.weight();
            let weight = score.max(Decimal::ZERO);
            let weighted = item
                .adjusted_price()
                .checked_mul(weight)
                .ok_or(ValuationError::Overflow { stage: "weighted price" })?;
            weighted_sum = weighted_sum
                .checked_add(weighted)
                .ok_or(ValuationError::Overflow { stage: "weighted price sum" })?;
            weight_sum = weight_sum
                .checked_add(weight)
                .ok_or(ValuationError::Overflow { stage: "weight sum" })?;

            let mut description = format!(
                "Weight comparable {} ({}) adjusted price by quality score",
                i + 1,
                item.comparable.describe()
            );
            if score < Decimal::ZERO {
                clamped += 1;
                description.push_str(&format!("; negative score {score} counts as zero weight"));
            }
            trail.push(
                description,
                format!("{} × {}", format_usd(item.adjusted_price()), weight),
                weighted,
            );
        }

        let (sum_formula, weight_formula) = if clamped > 0 {
            ("Σ(adjustedPrice × max(0, qualityScore))", "Σ(max(0, qualityScore))")
        } else {
            ("Σ(adjustedPrice × qualityScore)", "Σ(qualityScore)")
        };
        trail.push(
            "Sum of weighted adjusted prices".to_string(),
            sum_formula.to_string(),
            weighted_sum,
        );
        trail.push(
            "Sum of quality score weights".to_string(),
            weight_formula.to_string(),
            weight_sum,
        );

        let fallback = if clamped > 0 {
            tracing::warn!(
                clamped,
                %raw_score_sum,
                "Negative quality scores weighted as zero"
            );
            trail.push(
                format!(
                    "{clamped} negative quality score(s) weighted as zero; raw scores sum to {raw_score_sum}"
                ),
                "Σ(qualityScore) > 0".to_string(),
                raw_score_sum,
            );
            Some(AggregationFallback::ClampedNegativeWeights {
                clamped,
                raw_score_sum,
            })
        } else {
            None
        };

        let market_value = round_cents(weighted_sum / weight_sum);
        trail.push(
            format!("Quality-weighted market value for {}", loss.describe()),
            format!("{} / {}", format_usd(weighted_sum), weight_sum),
            market_value,
        );

        Ok(MarketValueResult {
            final_market_value: market_value,
            steps: trail.finish(),
            fallback,
        })
    }

    /// Low, high and median adjusted price, `None` for an empty set
    pub fn price_range(&self, scored: &[ScoredComparable]) -> Option<PriceRange> {
        let mut prices: Vec<Decimal> = scored.iter().map(|s| s.adjusted_price()).collect();
        prices.sort();

        let low = *prices.first()?;
        let high = *prices.last()?;
        let mid = prices.len() / 2;
        let median = if prices.len() % 2 == 0 {
            let (lower, upper) = (prices[mid - 1], prices[mid]);
            round_cents(lower + (upper - lower) / Decimal::TWO)
        } else {
            prices[mid]
        };

        Some(PriceRange { low, high, median })
    }
}

/// Plain mean of adjusted prices, used when the score sum is not positive
fn unweighted_mean(
    scored: &[ScoredComparable],
    loss: &LossVehicle,
    raw_score_sum: Decimal,
) -> Result<MarketValueResult, ValuationError> {
    tracing::warn!(
        %raw_score_sum,
        comparables = scored.len(),
        "Quality scores are degenerate, using unweighted mean"
    );

    let mut trail = StepLog::default();
    for (i, item) in scored.iter().enumerate() {
        trail.push(
            format!(
                "Quality score of comparable {} ({})",
                i + 1,
                item.comparable.describe()
            ),
            "qualityScore".to_string(),
            item.weight(),
        );
    }
    trail.push(
        "Sum of quality scores".to_string(),
        "Σ(qualityScore)".to_string(),
        raw_score_sum,
    );

    let price_sum = checked_sum(scored.iter().map(|s| s.adjusted_price()), "adjusted price sum")?;
    let market_value = round_cents(price_sum / Decimal::from(scored.len()));

    trail.push(
        format!(
            "Fallback: quality scores sum to {raw_score_sum}, so the unweighted mean of adjusted prices is used"
        ),
        "Σ(qualityScore) ≤ 0".to_string(),
        raw_score_sum,
    );
    trail.push(
        "Sum of adjusted prices".to_string(),
        "Σ(adjustedPrice)".to_string(),
        price_sum,
    );
    trail.push(
        format!("Unweighted mean market value for {}", loss.describe()),
        format!("{} / {}", format_usd(price_sum), scored.len()),
        market_value,
    );

    Ok(MarketValueResult {
        final_market_value: market_value,
        steps: trail.finish(),
        fallback: Some(AggregationFallback::UnweightedMean {
            weight_sum: raw_score_sum,
        }),
    })
}

fn checked_sum(
    mut values: impl Iterator<Item = Decimal>,
    stage: &'static str,
) -> Result<Decimal, ValuationError> {
    values.try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).ok_or(ValuationError::Overflow { stage })
    })
}

/// Numbers steps as they are recorded
#[derive(Default)]
struct StepLog {
    steps: Vec<CalculationStep>,
}

impl StepLog {
    fn push(&mut self, description: String, formula: String, result: Decimal) {
        let step = self.steps.len() as u32 + 1;
        self.steps.push(CalculationStep {
            step,
            description,
            formula,
            result,
        });
    }

    fn finish(self) -> Vec<CalculationStep> {
        self.steps
    }
}
