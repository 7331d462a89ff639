//! Input validation run before the engine touches any record

use super::{ComparableVehicle, LossVehicle};
use crate::engine::ValuationError;
use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;
use uuid::Uuid;

/// Oldest accepted model year
pub const MIN_MODEL_YEAR: i32 = 1900;
/// How many model years ahead of `as_of` a listing may be
pub const MAX_MODEL_YEAR_LEAD: i32 = 2;
/// Highest accepted listing price ($100M)
pub const MAX_LIST_PRICE: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Check that the loss vehicle and every comparable are well-formed
pub fn validate_inputs(
    appraisal_id: Uuid,
    loss: &LossVehicle,
    comparables: &[ComparableVehicle],
    as_of: DateTime<Utc>,
) -> Result<(), ValuationError> {
    let max_year = as_of.year() + MAX_MODEL_YEAR_LEAD;

    let loss_label = "Loss vehicle".to_string();
    check_text(&loss_label, "make", &loss.make)?;
    check_text(&loss_label, "model", &loss.model)?;
    check_text(&loss_label, "location", &loss.location)?;
    check_year(&loss_label, loss.year, max_year)?;

    if comparables.is_empty() {
        return Err(ValuationError::NoComparables);
    }

    let mut seen = HashSet::with_capacity(comparables.len());
    for comp in comparables {
        if !seen.insert(comp.id) {
            return Err(ValuationError::DuplicateComparable(comp.id));
        }
        if comp.appraisal_id != appraisal_id {
            return Err(ValuationError::AppraisalMismatch {
                id: comp.id,
                expected: appraisal_id,
                found: comp.appraisal_id,
            });
        }

        let label = format!("Comparable {}", comp.id);
        check_text(&label, "make", &comp.make)?;
        check_text(&label, "model", &comp.model)?;
        check_text(&label, "location", &comp.location)?;
        check_year(&label, comp.year, max_year)?;

        if comp.list_price <= Decimal::ZERO || comp.list_price > MAX_LIST_PRICE {
            return Err(ValuationError::InvalidListPrice {
                id: comp.id,
                price: comp.list_price,
                max: MAX_LIST_PRICE,
            });
        }
        if let Some(miles) = comp.distance_from_loss {
            if miles < Decimal::ZERO {
                return Err(ValuationError::InvalidDistance { id: comp.id, miles });
            }
        }
    }

    Ok(())
}

fn check_text(record: &str, field: &'static str, value: &str) -> Result<(), ValuationError> {
    if value.trim().is_empty() {
        return Err(ValuationError::MissingField {
            record: record.to_string(),
            field,
        });
    }
    Ok(())
}

fn check_year(record: &str, year: i32, max: i32) -> Result<(), ValuationError> {
    if !(MIN_MODEL_YEAR..=max).contains(&year) {
        return Err(ValuationError::InvalidYear {
            record: record.to_string(),
            year,
            min: MIN_MODEL_YEAR,
            max,
        });
    }
    Ok(())
}
