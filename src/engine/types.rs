//! Engine error types

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised before or during a valuation.
///
/// Recoverable conditions (degenerate weights, unknown equipment) are not
/// errors; they are resolved with a fallback and recorded in the audit trail.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValuationError {
    /// No comparables were supplied
    #[error("At least one comparable vehicle is required")]
    NoComparables,
    /// A required text field is blank
    #[error("{record}: required field `{field}` is empty")]
    MissingField { record: String, field: &'static str },
    /// Model year outside the accepted range
    #[error("{record}: model year {year} is outside {min}..={max}")]
    InvalidYear {
        record: String,
        year: i32,
        min: i32,
        max: i32,
    },
    /// Listing price must be positive and no more than `max`
    #[error("Comparable {id}: list price must be in (0, {max}], got {price}")]
    InvalidListPrice { id: Uuid, price: Decimal, max: Decimal },
    /// Distance has not been attached to the comparable
    #[error("Comparable {id}: distance from loss vehicle is unknown")]
    MissingDistance { id: Uuid },
    /// Distance is negative
    #[error("Comparable {id}: distance from loss vehicle must not be negative, got {miles}")]
    InvalidDistance { id: Uuid, miles: Decimal },
    /// Same comparable supplied twice
    #[error("Comparable {0} appears more than once")]
    DuplicateComparable(Uuid),
    /// Comparable is owned by another appraisal
    #[error("Comparable {id} belongs to appraisal {found}, expected {expected}")]
    AppraisalMismatch {
        id: Uuid,
        expected: Uuid,
        found: Uuid,
    },
    /// Decimal range exceeded while aggregating
    #[error("Arithmetic overflow while computing {stage}")]
    Overflow { stage: &'static str },
}
