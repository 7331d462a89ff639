//! Valuation engine
//!
//! Runs the full pipeline for one appraisal: attach distances, validate,
//! score, adjust, aggregate and rate confidence.

mod types;

pub use types::ValuationError;

use crate::adjustment::AdjustmentCalculator;
use crate::config::Config;
use crate::distance::{attach_distances, DistanceProvider};
use crate::equipment::{EquipmentValueLookup, StandardEquipmentValues};
use crate::market::{
    AggregationFallback, CalculationBreakdown, CalculationMethod, ConfidenceCalculator,
    MarketAnalysis, MarketValueCalculator, ScoredComparable,
};
use crate::quality::QualityScoreCalculator;
use crate::telemetry;
use crate::vehicle::{validate_inputs, ComparableVehicle, LossVehicle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Everything needed to value one appraisal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppraisalRequest {
    pub appraisal_id: Uuid,
    pub loss_vehicle: LossVehicle,
    pub comparables: Vec<ComparableVehicle>,
}

/// Quality-weighted valuation pipeline.
///
/// Holds configuration and immutable collaborators only, so one engine can
/// serve concurrent callers.
#[derive(Clone)]
pub struct ValuationEngine {
    quality: QualityScoreCalculator,
    adjustment: AdjustmentCalculator,
    market: MarketValueCalculator,
    confidence: ConfidenceCalculator,
    equipment: Arc<dyn EquipmentValueLookup>,
    distance: Option<Arc<dyn DistanceProvider>>,
}

impl ValuationEngine {
    /// Create an engine from configuration, using the standard equipment table
    /// with the configured overrides and no distance provider
    pub fn new(config: &Config) -> Self {
        Self {
            quality: QualityScoreCalculator::new(config.quality.clone()),
            adjustment: AdjustmentCalculator::new(config.adjustment.clone()),
            market: MarketValueCalculator::new(),
            confidence: ConfidenceCalculator::new(config.confidence.clone()),
            equipment: Arc::new(StandardEquipmentValues::from_config(&config.equipment)),
            distance: None,
        }
    }

    /// Replace the equipment value source
    pub fn with_equipment(mut self, lookup: impl EquipmentValueLookup + 'static) -> Self {
        self.equipment = Arc::new(lookup);
        self
    }

    /// Resolve missing distances from coordinates with this provider
    pub fn with_distance(mut self, provider: impl DistanceProvider + 'static) -> Self {
        self.distance = Some(Arc::new(provider));
        self
    }

    pub fn equipment(&self) -> &dyn EquipmentValueLookup {
        self.equipment.as_ref()
    }

    /// Score and adjust every comparable without aggregating.
    ///
    /// This is what runs when a comparable is saved or updated.
    pub fn score_comparables(
        &self,
        request: &AppraisalRequest,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<ScoredComparable>, ValuationError> {
        let loss = &request.loss_vehicle;
        let mut comparables = request.comparables.clone();

        if let Some(provider) = &self.distance {
            attach_distances(loss, &mut comparables, provider.as_ref());
        }
        validate_inputs(request.appraisal_id, loss, &comparables, as_of)?;

        comparables
            .into_iter()
            .map(|comparable| -> Result<ScoredComparable, ValuationError> {
                let quality_score = self.quality.score(&comparable, loss)?;
                let adjustments =
                    self.adjustment
                        .adjust(&comparable, loss, self.equipment.as_ref(), as_of);

                let unknown = adjustments.unknown_features().count();
                if unknown > 0 {
                    telemetry::record_unknown_features(unknown);
                }

                tracing::debug!(
                    comparable = %comparable.id,
                    vehicle = %comparable.describe(),
                    score = %quality_score.final_score,
                    adjusted_price = %adjustments.adjusted_price,
                    "Scored comparable"
                );

                Ok(ScoredComparable {
                    comparable,
                    quality_score,
                    adjustments,
                })
            })
            .collect()
    }

    /// Produce the full market analysis.
    ///
    /// `as_of` fixes the loss vehicle's age and the analysis timestamps, so the
    /// same request and `as_of` always yield the same analysis.
    #[tracing::instrument(
        skip_all,
        fields(appraisal_id = %request.appraisal_id, comparables = request.comparables.len())
    )]
    pub fn analyze(
        &self,
        request: &AppraisalRequest,
        as_of: DateTime<Utc>,
    ) -> Result<MarketAnalysis, ValuationError> {
        let scored = self.score_comparables(request, as_of)?;
        let loss = &request.loss_vehicle;

        let value = self.market.calculate_market_value(&scored, loss)?;
        let confidence = self.confidence.calculate_confidence_level(&scored);
        let price_range = self
            .market
            .price_range(&scored)
            .ok_or(ValuationError::NoComparables)?;

        if let Some(AggregationFallback::UnweightedMean { .. }) = value.fallback {
            telemetry::record_fallback();
        }

        let analysis = MarketAnalysis {
            appraisal_id: request.appraisal_id,
            loss_vehicle: loss.clone(),
            comparables: scored,
            calculated_market_value: value.final_market_value,
            calculation_method: CalculationMethod::QualityWeightedAverage,
            confidence_level: confidence.level,
            confidence_factors: confidence.factors,
            calculation_breakdown: CalculationBreakdown {
                steps: value.steps,
                fallback: value.fallback,
            },
            price_range,
            created_at: as_of,
            updated_at: as_of,
        };

        telemetry::record_analysis(&analysis);
        tracing::info!(
            market_value = %analysis.calculated_market_value,
            confidence = analysis.confidence_level,
            fallback = analysis.used_fallback(),
            "Market analysis complete"
        );

        Ok(analysis)
    }
}

impl Default for ValuationEngine {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::HaversineDistance;
    use crate::vehicle::{Condition, GeoPoint};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use std::collections::BTreeSet;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    fn request() -> AppraisalRequest {
        let appraisal_id = Uuid::new_v4();
        AppraisalRequest {
            appraisal_id,
            loss_vehicle: LossVehicle {
                year: 2015,
                make: "Honda".to_string(),
                model: "Accord".to_string(),
                mileage: 85_000,
                location: "Columbus, OH".to_string(),
                coordinates: Some(GeoPoint::new(39.9612, -82.9988)),
                condition: Condition::Good,
                equipment: BTreeSet::new(),
            },
            comparables: vec![ComparableVehicle::new(
                appraisal_id,
                2015,
                "Honda",
                "Accord",
                80_000,
                "Dayton, OH",
                dec!(12000),
                Condition::Good,
            )
            .with_distance(dec!(50))],
        }
    }

    #[test]
    fn test_worked_example() {
        let engine = ValuationEngine::default();
        let analysis = engine.analyze(&request(), as_of()).unwrap();

        assert_eq!(analysis.comparables[0].quality_score.final_score, dec!(110));
        assert_eq!(analysis.comparables[0].adjustments.adjusted_price, dec!(11750));
        assert_eq!(analysis.calculated_market_value, dec!(11750));
        assert_eq!(analysis.confidence_level, 40);
        assert_eq!(analysis.confidence_factors.comparable_count, 1);
        assert_eq!(
            analysis.calculation_method,
            CalculationMethod::QualityWeightedAverage
        );
        assert!(!analysis.used_fallback());
        assert_eq!(analysis.created_at, as_of());
    }

    #[test]
    fn test_missing_distance_without_provider() {
        let engine = ValuationEngine::default();
        let mut req = request();
        req.comparables[0].distance_from_loss = None;
        req.comparables[0].coordinates = Some(GeoPoint::new(39.7589, -84.1916));

        let result = engine.analyze(&req, as_of());
        assert!(matches!(result, Err(ValuationError::MissingDistance { .. })));
    }

    #[test]
    fn test_distance_provider_fills_gap() {
        let engine = ValuationEngine::default().with_distance(HaversineDistance::new());
        let mut req = request();
        req.comparables[0].distance_from_loss = None;
        req.comparables[0].coordinates = Some(GeoPoint::new(39.7589, -84.1916));

        let scored = engine.score_comparables(&req, as_of()).unwrap();
        let miles = scored[0].comparable.distance_from_loss.unwrap();
        assert!(miles > dec!(60) && miles < dec!(75), "got {miles}");
        // Request itself is not modified
        assert!(req.comparables[0].distance_from_loss.is_none());
    }

    #[test]
    fn test_custom_equipment_lookup() {
        let lookup = StandardEquipmentValues::new().with_overrides([("Sunroof", dec!(2000))]);
        let engine = ValuationEngine::default().with_equipment(lookup);
        let mut req = request();
        req.loss_vehicle.equipment.insert("Sunroof".to_string());

        let analysis = engine.analyze(&req, as_of()).unwrap();
        // -250 mileage + 2000 sunroof
        assert_eq!(analysis.calculated_market_value, dec!(13750));
    }

    #[test]
    fn test_validation_runs_first() {
        let engine = ValuationEngine::default();
        let mut req = request();
        req.comparables.clear();
        assert_eq!(
            engine.analyze(&req, as_of()),
            Err(ValuationError::NoComparables)
        );
    }
}
