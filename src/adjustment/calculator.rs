//! Mileage, equipment and condition adjustment calculator

use super::{AdjustmentBreakdown, ConditionAdjustment, EquipmentAdjustment, MileageAdjustment};
use crate::config::AdjustmentConfig;
use crate::equipment::EquipmentValueLookup;
use crate::money::{format_signed_usd, format_usd, group_thousands, round_cents};
use crate::vehicle::{normalize_feature, ComparableVehicle, Condition, LossVehicle};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

/// Computes dollar adjustments for comparables.
///
/// Holds only its configuration; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct AdjustmentCalculator {
    config: AdjustmentConfig,
}

impl AdjustmentCalculator {
    /// Create a calculator with the given rates
    pub fn new(config: AdjustmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdjustmentConfig {
        &self.config
    }

    /// Compute all adjustments for one comparable
    pub fn adjust(
        &self,
        comparable: &ComparableVehicle,
        loss: &LossVehicle,
        equipment: &dyn EquipmentValueLookup,
        as_of: DateTime<Utc>,
    ) -> AdjustmentBreakdown {
        let mileage_adjustment = self.mileage_adjustment(comparable, loss, as_of);
        let equipment_adjustments =
            self.equipment_adjustments(&comparable.equipment, &loss.equipment, equipment);
        let condition_adjustment =
            self.condition_adjustment(comparable.list_price, comparable.condition, loss.condition);

        let equipment_total: Decimal = equipment_adjustments.iter().map(|a| a.value).sum();
        let total_adjustment = mileage_adjustment.adjustment_amount
            + equipment_total
            + condition_adjustment.adjustment_amount;
        let adjusted_price = (comparable.list_price + total_adjustment).max(Decimal::ZERO);

        AdjustmentBreakdown {
            mileage_adjustment,
            equipment_adjustments,
            condition_adjustment,
            total_adjustment,
            adjusted_price,
        }
    }

    /// Price the mileage difference at the loss vehicle's depreciation tier.
    ///
    /// A comparable with fewer miles is adjusted down, one with more miles up.
    pub fn mileage_adjustment(
        &self,
        comparable: &ComparableVehicle,
        loss: &LossVehicle,
        as_of: DateTime<Utc>,
    ) -> MileageAdjustment {
        let age = loss.age_at(as_of);
        let rate = self.config.depreciation_rate(age);
        let difference = i64::from(comparable.mileage) - i64::from(loss.mileage);
        let amount = round_cents(Decimal::from(difference) * rate);

        let miles = group_thousands(&difference.unsigned_abs().to_string());
        let explanation = match difference.signum() {
            0 => "Mileage matches the loss vehicle; no adjustment".to_string(),
            -1 => format!(
                "Comparable has {miles} fewer miles than the loss vehicle; {} at {}/mile for a {age}-year-old vehicle",
                format_signed_usd(amount),
                format_usd(rate),
            ),
            _ => format!(
                "Comparable has {miles} more miles than the loss vehicle; {} at {}/mile for a {age}-year-old vehicle",
                format_signed_usd(amount),
                format_usd(rate),
            ),
        };

        MileageAdjustment {
            mileage_difference: difference,
            depreciation_rate: rate,
            adjustment_amount: amount,
            explanation,
        }
    }

    /// Add the value of options only the loss vehicle has, subtract options
    /// only the comparable has.
    ///
    /// Loss-only features come first, then comparable-only features, each sorted by name.
    pub fn equipment_adjustments(
        &self,
        comparable_features: &BTreeSet<String>,
        loss_features: &BTreeSet<String>,
        lookup: &dyn EquipmentValueLookup,
    ) -> Vec<EquipmentAdjustment> {
        let comparable = keyed(comparable_features);
        let loss = keyed(loss_features);

        let missing = loss
            .iter()
            .filter(|(key, _)| !comparable.contains_key(*key))
            .map(|(_, name)| line_item(name, lookup, true));
        let extra = comparable
            .iter()
            .filter(|(key, _)| !loss.contains_key(*key))
            .map(|(_, name)| line_item(name, lookup, false));

        missing.chain(extra).collect()
    }

    /// Rescale the comparable's price to the baseline condition.
    ///
    /// The baseline is Good unless `normalize_to_loss_condition` is set, in
    /// which case it is the loss vehicle's own grade.
    pub fn condition_adjustment(
        &self,
        list_price: Decimal,
        comparable_condition: Condition,
        loss_condition: Condition,
    ) -> ConditionAdjustment {
        let multipliers = &self.config.condition_multipliers;
        let multiplier = multipliers.for_condition(comparable_condition);
        let (baseline_condition, baseline) = if self.config.normalize_to_loss_condition {
            (loss_condition, multipliers.for_condition(loss_condition))
        } else {
            (Condition::Good, multipliers.good)
        };

        if multiplier <= Decimal::ZERO || baseline <= Decimal::ZERO {
            tracing::warn!(
                condition = %comparable_condition,
                %multiplier,
                %baseline,
                "Condition multiplier is not positive, skipping condition adjustment"
            );
            return ConditionAdjustment {
                multiplier,
                adjustment_amount: Decimal::ZERO,
                explanation: format!(
                    "Condition multipliers {comparable_condition} (x{multiplier}) and {baseline_condition} (x{baseline}) must be positive; condition adjustment skipped"
                ),
            };
        }

        let amount = round_cents(list_price * (baseline / multiplier - Decimal::ONE));

        let explanation = if amount.is_zero() {
            format!(
                "Comparable in {comparable_condition} condition matches the {baseline_condition} baseline; no adjustment"
            )
        } else {
            format!(
                "Comparable in {comparable_condition} condition (x{multiplier}) normalized to {baseline_condition} (x{baseline}); {}",
                format_signed_usd(amount),
            )
        };

        ConditionAdjustment {
            multiplier,
            adjustment_amount: amount,
            explanation,
        }
    }
}

/// Normalized feature key to the name as entered
fn keyed(features: &BTreeSet<String>) -> BTreeMap<String, &str> {
    features
        .iter()
        .map(|name| (normalize_feature(name), name.trim()))
        .collect()
}

fn line_item(
    name: &str,
    lookup: &dyn EquipmentValueLookup,
    loss_only: bool,
) -> EquipmentAdjustment {
    let (holder, other) = if loss_only {
        ("Loss vehicle", "comparable")
    } else {
        ("Comparable", "loss vehicle")
    };

    match lookup.value_of(name) {
        Some(standard) => {
            let standard = round_cents(standard);
            let value = if loss_only || standard.is_zero() {
                standard
            } else {
                -standard
            };
            EquipmentAdjustment {
                name: name.to_string(),
                value,
                known: true,
                explanation: format!(
                    "{holder} has {name} and the {other} does not; {}",
                    format_signed_usd(value)
                ),
            }
        }
        None => {
            tracing::debug!(feature = name, "No standard value for feature");
            EquipmentAdjustment {
                name: name.to_string(),
                value: Decimal::ZERO,
                known: false,
                explanation: format!(
                    "{holder} has {name} and the {other} does not; no standard value on file, no adjustment"
                ),
            }
        }
    }
}
