//! Additive quality score calculator

use super::QualityScoreBreakdown;
use crate::config::QualityConfig;
use crate::engine::ValuationError;
use crate::vehicle::{normalize_feature, ComparableVehicle, LossVehicle};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// Scores comparables against the loss vehicle.
///
/// Holds only its configuration; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct QualityScoreCalculator {
    config: QualityConfig,
}

impl QualityScoreCalculator {
    /// Create a calculator with the given rates
    pub fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Score one comparable.
    ///
    /// The comparable must already carry `distance_from_loss`.
    pub fn score(
        &self,
        comparable: &ComparableVehicle,
        loss: &LossVehicle,
    ) -> Result<QualityScoreBreakdown, ValuationError> {
        let distance = comparable
            .distance_from_loss
            .ok_or(ValuationError::MissingDistance { id: comparable.id })?;
        if distance < Decimal::ZERO {
            return Err(ValuationError::InvalidDistance {
                id: comparable.id,
                miles: distance,
            });
        }

        let distance_score = self.distance_component(distance);
        let age_score = self.age_component(comparable.year, loss.year);
        let mileage_score = self.mileage_component(comparable.mileage, loss.mileage);
        let equipment_score = self.equipment_component(&comparable.equipment, &loss.equipment);

        let base_score = self.config.base_score;
        let final_score = base_score + distance_score + age_score + mileage_score + equipment_score;

        Ok(QualityScoreBreakdown {
            base_score,
            distance_score,
            age_score,
            mileage_score,
            equipment_score,
            final_score,
        })
    }

    /// Per-mile penalty beyond the free allowance
    pub fn distance_component(&self, distance_miles: Decimal) -> Decimal {
        let excess = distance_miles - self.config.free_distance_miles;
        if excess <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        penalty(excess * self.config.distance_penalty_per_mile)
    }

    /// Fixed penalty per model year of difference
    pub fn age_component(&self, comparable_year: i32, loss_year: i32) -> Decimal {
        let years = (comparable_year - loss_year).unsigned_abs();
        penalty(Decimal::from(years) * self.config.age_penalty_per_year)
    }

    /// Bonus inside the mileage band, penalty scaled by the excess fraction outside it
    pub fn mileage_component(&self, comparable_miles: u32, loss_miles: u32) -> Decimal {
        let difference = Decimal::from(comparable_miles.abs_diff(loss_miles));
        let band = Decimal::from(loss_miles) * self.config.mileage_band_pct;
        if difference <= band {
            return self.config.mileage_bonus;
        }

        let reference = loss_miles.max(self.config.min_reference_mileage).max(1);
        let excess_fraction = (difference - band) / Decimal::from(reference);
        penalty(excess_fraction * self.config.mileage_excess_penalty)
    }

    /// Flat penalty per feature present on only one of the two vehicles
    pub fn equipment_component(
        &self,
        comparable_features: &BTreeSet<String>,
        loss_features: &BTreeSet<String>,
    ) -> Decimal {
        let comparable: BTreeSet<String> =
            comparable_features.iter().map(|f| normalize_feature(f)).collect();
        let loss: BTreeSet<String> = loss_features.iter().map(|f| normalize_feature(f)).collect();

        let missing = Decimal::from(loss.difference(&comparable).count());
        let extra = Decimal::from(comparable.difference(&loss).count());

        penalty(
            missing * self.config.missing_feature_penalty
                + extra * self.config.extra_feature_penalty,
        )
    }
}

/// Negate a penalty rounded to two places, keeping zero unsigned
fn penalty(points: Decimal) -> Decimal {
    let rounded = points.round_dp(2);
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        -rounded
    }
}
