//! Comparable price adjustments
//!
//! Converts mileage, equipment and condition differences into dollar
//! adjustments so each comparable's price reflects the loss vehicle.

mod calculator;

pub use calculator::AdjustmentCalculator;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Mileage-based adjustment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MileageAdjustment {
    /// Comparable mileage minus loss vehicle mileage
    pub mileage_difference: i64,
    /// Dollars per mile for the loss vehicle's age tier
    pub depreciation_rate: Decimal,
    pub adjustment_amount: Decimal,
    pub explanation: String,
}

/// One equipment line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentAdjustment {
    /// Feature name as entered on the vehicle record
    pub name: String,
    /// Signed dollar adjustment
    pub value: Decimal,
    /// Whether the feature had a standard value on file
    pub known: bool,
    pub explanation: String,
}

/// Condition normalization adjustment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionAdjustment {
    /// The comparable's condition multiplier
    pub multiplier: Decimal,
    pub adjustment_amount: Decimal,
    pub explanation: String,
}

/// Full adjustment detail for one comparable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentBreakdown {
    pub mileage_adjustment: MileageAdjustment,
    pub equipment_adjustments: Vec<EquipmentAdjustment>,
    pub condition_adjustment: ConditionAdjustment,
    /// Sum of all adjustments
    pub total_adjustment: Decimal,
    /// List price plus total adjustment, floored at zero
    pub adjusted_price: Decimal,
}

impl AdjustmentBreakdown {
    /// Net of all equipment line items
    pub fn equipment_total(&self) -> Decimal {
        self.equipment_adjustments.iter().map(|a| a.value).sum()
    }

    /// Equipment names that had no standard value
    pub fn unknown_features(&self) -> impl Iterator<Item = &str> {
        self.equipment_adjustments
            .iter()
            .filter(|a| !a.known)
            .map(|a| a.name.as_str())
    }
}
