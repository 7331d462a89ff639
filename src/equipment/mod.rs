//! Equipment value lookup
//!
//! Maps installed options to a standard dollar value

mod standard;

pub use standard::StandardEquipmentValues;

use rust_decimal::Decimal;

/// Trait for equipment value sources
pub trait EquipmentValueLookup: Send + Sync {
    /// Standard dollar value of a feature, `None` when the feature is not on file
    fn value_of(&self, feature: &str) -> Option<Decimal>;

    /// Standard dollar value of a feature, zero when unknown
    fn get_value(&self, feature: &str) -> Decimal {
        self.value_of(feature).unwrap_or(Decimal::ZERO)
    }
}
