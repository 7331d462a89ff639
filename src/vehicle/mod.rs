//! Vehicle data model
//!
//! Loss vehicle and comparable listing records, plus the validation layer
//! that runs before any scoring.

mod types;
mod validation;

pub use types::{
    normalize_feature, ComparableVehicle, Condition, GeoPoint, ListingSource, LossVehicle,
    SourceKind,
};
pub use validation::{validate_inputs, MAX_LIST_PRICE, MAX_MODEL_YEAR_LEAD, MIN_MODEL_YEAR};
