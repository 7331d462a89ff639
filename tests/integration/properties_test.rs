//! Property tests for scoring, adjustment and confidence bounds

use crate::common::{as_of, comparable, loss_vehicle};
use fmv_engine::quality::QualityScoreCalculator;
use fmv_engine::vehicle::Condition;
use fmv_engine::{AppraisalRequest, ValuationEngine};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

fn condition() -> impl Strategy<Value = Condition> {
    prop_oneof![
        Just(Condition::Excellent),
        Just(Condition::Good),
        Just(Condition::Fair),
        Just(Condition::Poor),
    ]
}

proptest! {
    #[test]
    fn mileage_score_never_rises_as_gap_widens(
        loss_miles in 0u32..300_000,
        gap in 0u32..200_000,
        extra in 1u32..50_000,
    ) {
        let calc = QualityScoreCalculator::default();
        let near = calc.mileage_component(loss_miles.saturating_add(gap), loss_miles);
        let far = calc.mileage_component(loss_miles.saturating_add(gap + extra), loss_miles);
        prop_assert!(far <= near);
    }

    #[test]
    fn mileage_score_never_rises_below_loss_mileage(
        loss_miles in 50_000u32..300_000,
        gap in 0u32..40_000,
        extra in 1u32..10_000,
    ) {
        let calc = QualityScoreCalculator::default();
        let near = calc.mileage_component(loss_miles - gap, loss_miles);
        let far = calc.mileage_component(loss_miles - gap - extra, loss_miles);
        prop_assert!(far <= near);
    }

    #[test]
    fn analysis_stays_in_bounds(
        comps in prop::collection::vec(
            (2000i32..=2026, 0u32..400_000, 0u32..2_000, 100u32..80_000, condition()),
            1..8,
        ),
        loss_year in 2000i32..=2025,
    ) {
        let appraisal_id = Uuid::new_v4();
        let mut loss = loss_vehicle();
        loss.year = loss_year;

        let comparables = comps
            .into_iter()
            .map(|(year, miles, distance, price, condition)| {
                let mut c = comparable(
                    appraisal_id,
                    year,
                    miles,
                    Decimal::from(distance),
                    Decimal::from(price),
                );
                c.condition = condition;
                c
            })
            .collect();

        let request = AppraisalRequest { appraisal_id, loss_vehicle: loss, comparables };
        let analysis = ValuationEngine::default().analyze(&request, as_of()).unwrap();

        prop_assert!(analysis.confidence_level <= 100);
        prop_assert!(analysis.calculated_market_value >= Decimal::ZERO);
        for scored in &analysis.comparables {
            prop_assert!(scored.adjustments.adjusted_price >= Decimal::ZERO);
        }
        prop_assert!(analysis.price_range.low <= analysis.calculated_market_value);
        prop_assert!(analysis.calculated_market_value <= analysis.price_range.high);
    }
}
