//! Comparable quality scoring
//!
//! Scores how closely each comparable matches the loss vehicle. Higher is
//! better; the score is later used as the comparable's aggregation weight.

mod calculator;

pub use calculator::QualityScoreCalculator;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Signed contribution of each scoring component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityScoreBreakdown {
    /// Starting score
    pub base_score: Decimal,
    /// Penalty for distance beyond the free allowance (zero or negative)
    pub distance_score: Decimal,
    /// Penalty for model-year difference (zero or negative)
    pub age_score: Decimal,
    /// Bonus inside the mileage band, penalty outside it
    pub mileage_score: Decimal,
    /// Penalty for equipment mismatches (zero or negative)
    pub equipment_score: Decimal,
    /// Sum of the base score and all components
    pub final_score: Decimal,
}

impl QualityScoreBreakdown {
    /// Total of the component contributions, excluding the base score
    pub fn component_total(&self) -> Decimal {
        self.distance_score + self.age_score + self.mileage_score + self.equipment_score
    }
}
