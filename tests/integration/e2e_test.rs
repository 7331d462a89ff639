//! End-to-end valuation tests

use crate::common::{as_of, comparable, loss_vehicle, market_of_five, worked_scenario};
use fmv_engine::config::{Config, QualityConfig};
use fmv_engine::market::AggregationFallback;
use fmv_engine::money::round_cents;
use fmv_engine::{AppraisalRequest, ValuationEngine, ValuationError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

#[test]
fn test_worked_scenario() {
    let engine = ValuationEngine::default();
    let analysis = engine.analyze(&worked_scenario(), as_of()).unwrap();

    let scored = &analysis.comparables[0];
    assert_eq!(scored.quality_score.distance_score, dec!(0));
    assert_eq!(scored.quality_score.age_score, dec!(0));
    assert_eq!(scored.quality_score.mileage_score, dec!(10));
    assert_eq!(scored.quality_score.equipment_score, dec!(0));
    assert_eq!(scored.quality_score.final_score, dec!(110));

    let mileage = &scored.adjustments.mileage_adjustment;
    assert_eq!(mileage.depreciation_rate, dec!(0.05));
    assert_eq!(mileage.mileage_difference, -5_000);
    assert_eq!(mileage.adjustment_amount, dec!(-250));
    assert_eq!(scored.adjustments.condition_adjustment.adjustment_amount, dec!(0));
    assert_eq!(scored.adjustments.total_adjustment, dec!(-250));
    assert_eq!(scored.adjustments.adjusted_price, dec!(11750));

    assert_eq!(analysis.calculated_market_value, dec!(11750));
    assert!((35..=45).contains(&analysis.confidence_level));
}

#[test]
fn test_analysis_is_deterministic() {
    let engine = ValuationEngine::default();
    let request = market_of_five();

    let first = engine.analyze(&request, as_of()).unwrap();
    let second = engine.analyze(&request, as_of()).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_equal_scores_give_arithmetic_mean() {
    let appraisal_id = Uuid::new_v4();
    // Same year, mileage and distance: identical scores, different prices
    let request = AppraisalRequest {
        appraisal_id,
        loss_vehicle: loss_vehicle(),
        comparables: vec![
            comparable(appraisal_id, 2015, 85_000, dec!(20), dec!(10000)),
            comparable(appraisal_id, 2015, 85_000, dec!(20), dec!(11000)),
            comparable(appraisal_id, 2015, 85_000, dec!(20), dec!(12500)),
        ],
    };

    let analysis = ValuationEngine::default().analyze(&request, as_of()).unwrap();

    let prices: Vec<Decimal> = analysis
        .comparables
        .iter()
        .map(|c| c.adjustments.adjusted_price)
        .collect();
    let mean = prices.iter().copied().sum::<Decimal>() / Decimal::from(prices.len());
    assert_eq!(analysis.calculated_market_value, round_cents(mean));
    assert_eq!(analysis.calculated_market_value, dec!(11166.67));
}

#[test]
fn test_zero_scores_fall_back_to_mean() {
    let config = Config {
        quality: QualityConfig {
            base_score: dec!(0),
            mileage_bonus: dec!(0),
            ..QualityConfig::default()
        },
        ..Config::default()
    };
    let appraisal_id = Uuid::new_v4();
    let request = AppraisalRequest {
        appraisal_id,
        loss_vehicle: loss_vehicle(),
        comparables: vec![
            comparable(appraisal_id, 2015, 85_000, dec!(20), dec!(9000)),
            comparable(appraisal_id, 2015, 85_000, dec!(20), dec!(12000)),
        ],
    };

    let analysis = ValuationEngine::new(&config)
        .analyze(&request, as_of())
        .unwrap();

    assert!(analysis
        .comparables
        .iter()
        .all(|c| c.quality_score.final_score == dec!(0)));
    assert_eq!(analysis.calculated_market_value, dec!(10500));
    assert_eq!(
        analysis.calculation_breakdown.fallback,
        Some(AggregationFallback::UnweightedMean {
            weight_sum: dec!(0)
        })
    );
    assert!(analysis
        .calculation_breakdown
        .steps
        .iter()
        .any(|s| s.description.contains("unweighted mean")));
}

#[test]
fn test_scores_summing_below_zero_fall_back_even_with_a_positive_score() {
    let config = Config {
        quality: QualityConfig {
            base_score: dec!(12),
            mileage_bonus: dec!(0),
            ..QualityConfig::default()
        },
        ..Config::default()
    };
    let appraisal_id = Uuid::new_v4();
    let request = AppraisalRequest {
        appraisal_id,
        loss_vehicle: loss_vehicle(),
        comparables: vec![
            comparable(appraisal_id, 2014, 85_000, dec!(20), dec!(10000)),
            comparable(appraisal_id, 2004, 85_000, dec!(20), dec!(40000)),
            comparable(appraisal_id, 2005, 85_000, dec!(20), dec!(50000)),
        ],
    };

    let analysis = ValuationEngine::new(&config)
        .analyze(&request, as_of())
        .unwrap();

    let scores: Vec<Decimal> = analysis
        .comparables
        .iter()
        .map(|c| c.quality_score.final_score)
        .collect();
    assert_eq!(scores, vec![dec!(10), dec!(-10), dec!(-8)]);
    assert_eq!(analysis.calculated_market_value, dec!(33333.33));
    assert_eq!(
        analysis.calculation_breakdown.fallback,
        Some(AggregationFallback::UnweightedMean {
            weight_sum: dec!(-8)
        })
    );
    assert!(analysis.format_table().contains("unweighted mean (fallback)"));
}

#[test]
fn test_oversized_list_price_is_a_validation_error() {
    let mut request = worked_scenario();
    request.comparables[0].list_price = Decimal::MAX / dec!(2);

    let result = ValuationEngine::default().analyze(&request, as_of());
    assert!(matches!(
        result,
        Err(ValuationError::InvalidListPrice { .. })
    ));
}

#[test]
fn test_market_of_five() {
    let analysis = ValuationEngine::default()
        .analyze(&market_of_five(), as_of())
        .unwrap();

    assert_eq!(analysis.comparables.len(), 5);
    assert_eq!(analysis.confidence_factors.comparable_count, 5);
    assert!(analysis.confidence_level <= 90);
    assert!(analysis.confidence_level > 40);

    let range = analysis.price_range;
    assert!(range.low <= analysis.calculated_market_value);
    assert!(analysis.calculated_market_value <= range.high);

    // The custom wrap has no standard value and degrades to a zero line item
    let wrap = analysis.comparables[4]
        .adjustments
        .equipment_adjustments
        .iter()
        .find(|a| a.name == "Custom Wrap")
        .unwrap();
    assert_eq!(wrap.value, dec!(0));
    assert!(!wrap.known);

    for scored in &analysis.comparables {
        let a = &scored.adjustments;
        assert_eq!(
            a.adjusted_price,
            (scored.comparable.list_price + a.total_adjustment).max(Decimal::ZERO)
        );
    }
}

#[test]
fn test_audit_trail_reproduces_value() {
    let analysis = ValuationEngine::default()
        .analyze(&market_of_five(), as_of())
        .unwrap();
    let steps = &analysis.calculation_breakdown.steps;

    // one weighted price per comparable, two sums, one division
    assert_eq!(steps.len(), analysis.comparables.len() + 3);
    let weighted_sum = steps[steps.len() - 3].result;
    let weight_sum = steps[steps.len() - 2].result;
    assert_eq!(
        round_cents(weighted_sum / weight_sum),
        analysis.calculated_market_value
    );
    assert_eq!(steps.last().unwrap().result, analysis.calculated_market_value);
}

#[test]
fn test_empty_comparables_rejected() {
    let request = AppraisalRequest {
        appraisal_id: Uuid::new_v4(),
        loss_vehicle: loss_vehicle(),
        comparables: Vec::new(),
    };
    let result = ValuationEngine::default().analyze(&request, as_of());
    assert_eq!(result, Err(ValuationError::NoComparables));
}

#[test]
fn test_json_output_shape() {
    let analysis = ValuationEngine::default()
        .analyze(&worked_scenario(), as_of())
        .unwrap();
    let json = serde_json::to_value(&analysis).unwrap();

    assert_eq!(json["calculationMethod"], "quality-weighted-average");
    assert!(json["calculatedMarketValue"].is_string());
    assert!(json["confidenceFactors"]["comparableCount"].is_number());
    assert!(json["comparables"][0]["qualityScore"]["finalScore"].is_string());
    assert!(json["comparables"][0]["adjustments"]["mileageAdjustment"]["explanation"].is_string());
    assert!(json["comparables"][0]["listPrice"].is_string());
}
