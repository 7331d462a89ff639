//! Configuration types for fmv-engine
//!
//! Every scoring rate, depreciation tier and confidence curve is a named
//! setting so call sites and tests can override the stock methodology.

use crate::vehicle::Condition;
use anyhow::{bail, ensure};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub quality: QualityConfig,
    #[serde(default)]
    pub adjustment: AdjustmentConfig,
    #[serde(default)]
    pub confidence: ConfidenceConfig,
    #[serde(default)]
    pub equipment: EquipmentConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Quality score rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Starting score before any component is applied
    #[serde(with = "rust_decimal::serde::float")]
    pub base_score: Decimal,
    /// Distance allowance with no penalty (miles)
    #[serde(with = "rust_decimal::serde::float")]
    pub free_distance_miles: Decimal,
    /// Points subtracted per mile beyond the allowance
    #[serde(with = "rust_decimal::serde::float")]
    pub distance_penalty_per_mile: Decimal,
    /// Points subtracted per model year of difference
    #[serde(with = "rust_decimal::serde::float")]
    pub age_penalty_per_year: Decimal,
    /// Mileage band as a fraction of the loss vehicle's mileage
    #[serde(with = "rust_decimal::serde::float")]
    pub mileage_band_pct: Decimal,
    /// Points added when the comparable's mileage is inside the band
    #[serde(with = "rust_decimal::serde::float")]
    pub mileage_bonus: Decimal,
    /// Points subtracted per 1.0 of mileage excess fraction outside the band
    #[serde(with = "rust_decimal::serde::float")]
    pub mileage_excess_penalty: Decimal,
    /// Floor on the mileage used as the excess-fraction denominator
    pub min_reference_mileage: u32,
    /// Points subtracted per feature the loss vehicle has and the comparable lacks
    #[serde(with = "rust_decimal::serde::float")]
    pub missing_feature_penalty: Decimal,
    /// Points subtracted per feature the comparable has and the loss vehicle lacks
    #[serde(with = "rust_decimal::serde::float")]
    pub extra_feature_penalty: Decimal,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            base_score: Decimal::new(100, 0),
            free_distance_miles: Decimal::new(100, 0),
            distance_penalty_per_mile: Decimal::new(1, 1), // 0.1
            age_penalty_per_year: Decimal::new(2, 0),
            mileage_band_pct: Decimal::new(20, 2), // 0.20 = 20%
            mileage_bonus: Decimal::new(10, 0),
            mileage_excess_penalty: Decimal::new(50, 0),
            min_reference_mileage: 10_000,
            missing_feature_penalty: Decimal::ONE,
            extra_feature_penalty: Decimal::ONE,
        }
    }
}

/// Price adjustment rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentConfig {
    /// Oldest age (years) still treated as a newer vehicle
    pub new_vehicle_max_age: u32,
    /// Dollars per mile for newer vehicles
    #[serde(with = "rust_decimal::serde::float")]
    pub new_vehicle_rate: Decimal,
    /// Oldest age (years) still treated as a mid-life vehicle
    pub mid_vehicle_max_age: u32,
    /// Dollars per mile for mid-life vehicles
    #[serde(with = "rust_decimal::serde::float")]
    pub mid_vehicle_rate: Decimal,
    /// Dollars per mile for anything older
    #[serde(with = "rust_decimal::serde::float")]
    pub old_vehicle_rate: Decimal,
    /// Scale condition adjustments toward the loss vehicle's grade instead of Good
    pub normalize_to_loss_condition: bool,
    pub condition_multipliers: ConditionMultipliers,
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            new_vehicle_max_age: 3,
            new_vehicle_rate: Decimal::new(25, 2), // $0.25/mile
            mid_vehicle_max_age: 7,
            mid_vehicle_rate: Decimal::new(15, 2), // $0.15/mile
            old_vehicle_rate: Decimal::new(5, 2),  // $0.05/mile
            normalize_to_loss_condition: false,
            condition_multipliers: ConditionMultipliers::default(),
        }
    }
}

impl AdjustmentConfig {
    /// Per-mile depreciation rate for a vehicle of the given age
    pub fn depreciation_rate(&self, age_years: u32) -> Decimal {
        if age_years <= self.new_vehicle_max_age {
            self.new_vehicle_rate
        } else if age_years <= self.mid_vehicle_max_age {
            self.mid_vehicle_rate
        } else {
            self.old_vehicle_rate
        }
    }
}

/// Price multipliers by condition grade, Good being the baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionMultipliers {
    #[serde(with = "rust_decimal::serde::float")]
    pub excellent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub good: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub fair: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub poor: Decimal,
}

impl Default for ConditionMultipliers {
    fn default() -> Self {
        Self {
            excellent: Decimal::new(105, 2),
            good: Decimal::ONE,
            fair: Decimal::new(95, 2),
            poor: Decimal::new(85, 2),
        }
    }
}

impl ConditionMultipliers {
    pub fn for_condition(&self, condition: Condition) -> Decimal {
        match condition {
            Condition::Excellent => self.excellent,
            Condition::Good => self.good,
            Condition::Fair => self.fair,
            Condition::Poor => self.poor,
        }
    }
}

/// Confidence curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Base confidence for 1, 2, 3... comparables; the last entry applies to larger sets
    pub base_by_count: Vec<u8>,
    /// Points per 1.0 coefficient of variation in quality scores
    #[serde(with = "rust_decimal::serde::float")]
    pub quality_variance_weight: Decimal,
    /// Cap on the quality-score penalty
    #[serde(with = "rust_decimal::serde::float")]
    pub max_quality_penalty: Decimal,
    /// Points per 1.0 coefficient of variation in adjusted prices
    #[serde(with = "rust_decimal::serde::float")]
    pub price_variance_weight: Decimal,
    /// Cap on the price penalty
    #[serde(with = "rust_decimal::serde::float")]
    pub max_price_penalty: Decimal,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            base_by_count: vec![40, 55, 68, 80, 90],
            quality_variance_weight: Decimal::new(50, 0),
            max_quality_penalty: Decimal::new(25, 0),
            price_variance_weight: Decimal::new(100, 0),
            max_price_penalty: Decimal::new(30, 0),
        }
    }
}

impl ConfidenceConfig {
    /// Base confidence before variance penalties
    pub fn base_for(&self, count: usize) -> u8 {
        if count == 0 {
            return 0;
        }
        self.base_by_count
            .get(count - 1)
            .or(self.base_by_count.last())
            .copied()
            .unwrap_or(0)
    }
}

/// Equipment value overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentConfig {
    /// Feature name to dollar value; replaces or extends the standard table
    #[serde(serialize_with = "float_values")]
    pub custom_values: BTreeMap<String, Decimal>,
}

fn float_values<S: Serializer>(
    values: &BTreeMap<String, Decimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(
        values
            .iter()
            .map(|(name, value)| (name, value.to_f64().unwrap_or_default())),
    )
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl Config {
    /// Load configuration from a TOML file and validate it
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the calculators cannot use
    pub fn validate(&self) -> anyhow::Result<()> {
        let q = &self.quality;
        for (name, value) in [
            ("quality.free_distance_miles", q.free_distance_miles),
            ("quality.distance_penalty_per_mile", q.distance_penalty_per_mile),
            ("quality.age_penalty_per_year", q.age_penalty_per_year),
            ("quality.mileage_band_pct", q.mileage_band_pct),
            ("quality.mileage_excess_penalty", q.mileage_excess_penalty),
            ("quality.missing_feature_penalty", q.missing_feature_penalty),
            ("quality.extra_feature_penalty", q.extra_feature_penalty),
        ] {
            ensure!(value >= Decimal::ZERO, "{name} must not be negative, got {value}");
        }

        let a = &self.adjustment;
        for (name, value) in [
            ("adjustment.new_vehicle_rate", a.new_vehicle_rate),
            ("adjustment.mid_vehicle_rate", a.mid_vehicle_rate),
            ("adjustment.old_vehicle_rate", a.old_vehicle_rate),
        ] {
            ensure!(value >= Decimal::ZERO, "{name} must not be negative, got {value}");
        }
        ensure!(
            a.new_vehicle_max_age <= a.mid_vehicle_max_age,
            "adjustment.new_vehicle_max_age ({}) exceeds adjustment.mid_vehicle_max_age ({})",
            a.new_vehicle_max_age,
            a.mid_vehicle_max_age
        );
        for condition in Condition::ALL {
            let multiplier = a.condition_multipliers.for_condition(condition);
            ensure!(
                multiplier > Decimal::ZERO,
                "adjustment.condition_multipliers.{} must be positive, got {multiplier}",
                condition.label().to_lowercase()
            );
        }

        let c = &self.confidence;
        ensure!(
            !c.base_by_count.is_empty(),
            "confidence.base_by_count needs at least one entry"
        );
        if let Some(high) = c.base_by_count.iter().find(|&&b| b > 100) {
            bail!("confidence.base_by_count entries must be at most 100, got {high}");
        }
        for (name, value) in [
            ("confidence.quality_variance_weight", c.quality_variance_weight),
            ("confidence.max_quality_penalty", c.max_quality_penalty),
            ("confidence.price_variance_weight", c.price_variance_weight),
            ("confidence.max_price_penalty", c.max_price_penalty),
        ] {
            ensure!(value >= Decimal::ZERO, "{name} must not be negative, got {value}");
        }

        for (feature, value) in &self.equipment.custom_values {
            ensure!(
                *value >= Decimal::ZERO,
                "equipment.custom_values.\"{feature}\" must not be negative, got {value}"
            );
        }

        Ok(())
    }
}
