//! Shared fixtures

use chrono::{DateTime, TimeZone, Utc};
use fmv_engine::vehicle::{ComparableVehicle, Condition, LossVehicle};
use fmv_engine::AppraisalRequest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeSet;
use uuid::Uuid;

pub fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
}

pub fn loss_vehicle() -> LossVehicle {
    LossVehicle {
        year: 2015,
        make: "Honda".to_string(),
        model: "Accord".to_string(),
        mileage: 85_000,
        location: "Columbus, OH".to_string(),
        coordinates: None,
        condition: Condition::Good,
        equipment: BTreeSet::new(),
    }
}

pub fn comparable(
    appraisal_id: Uuid,
    year: i32,
    mileage: u32,
    distance: Decimal,
    price: Decimal,
) -> ComparableVehicle {
    ComparableVehicle::new(
        appraisal_id,
        year,
        "Honda",
        "Accord",
        mileage,
        "Dayton, OH",
        price,
        Condition::Good,
    )
    .with_distance(distance)
}

/// Loss vehicle and the single comparable of the worked scenario
pub fn worked_scenario() -> AppraisalRequest {
    let appraisal_id = Uuid::new_v4();
    AppraisalRequest {
        appraisal_id,
        loss_vehicle: loss_vehicle(),
        comparables: vec![comparable(appraisal_id, 2015, 80_000, dec!(50), dec!(12000))],
    }
}

/// Five varied comparables
pub fn market_of_five() -> AppraisalRequest {
    let appraisal_id = Uuid::new_v4();
    let mut loss = loss_vehicle();
    loss.equipment = ["Sunroof", "Navigation"].into_iter().map(String::from).collect();

    let comparables = vec![
        comparable(appraisal_id, 2015, 80_000, dec!(50), dec!(12000))
            .with_equipment(["Sunroof", "Navigation"]),
        comparable(appraisal_id, 2016, 72_000, dec!(85), dec!(13200)).with_equipment(["Sunroof"]),
        comparable(appraisal_id, 2014, 98_000, dec!(140), dec!(10900)),
        comparable(appraisal_id, 2015, 120_000, dec!(30), dec!(10400))
            .with_equipment(["Sunroof", "Navigation", "Leather Seats"]),
        comparable(appraisal_id, 2015, 88_500, dec!(210), dec!(11600))
            .with_equipment(["Navigation", "Custom Wrap"]),
    ];

    AppraisalRequest {
        appraisal_id,
        loss_vehicle: loss,
        comparables,
    }
}
