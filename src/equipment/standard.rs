//! Built-in equipment value table

use super::EquipmentValueLookup;
use crate::config::EquipmentConfig;
use crate::vehicle::normalize_feature;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Stock option values in whole dollars
const STANDARD_VALUES: &[(&str, i64)] = &[
    ("Sunroof", 1_200),
    ("Panoramic Roof", 1_800),
    ("Navigation", 800),
    ("Leather Seats", 1_000),
    ("Heated Seats", 400),
    ("Ventilated Seats", 600),
    ("Premium Audio", 700),
    ("Backup Camera", 300),
    ("360 Camera", 650),
    ("Blind Spot Monitoring", 450),
    ("Adaptive Cruise Control", 700),
    ("Lane Keep Assist", 400),
    ("Remote Start", 350),
    ("Third Row Seating", 1_500),
    ("Tow Package", 500),
    ("All Wheel Drive", 1_800),
    ("Four Wheel Drive", 2_000),
    ("Alloy Wheels", 500),
    ("Running Boards", 300),
    ("Bed Liner", 250),
];

/// Immutable equipment lookup seeded with the standard table.
///
/// Customer overrides are applied once at construction.
#[derive(Debug, Clone)]
pub struct StandardEquipmentValues {
    /// Normalized feature key to (display name, value)
    values: BTreeMap<String, (String, Decimal)>,
}

impl StandardEquipmentValues {
    /// Create a lookup with the standard table only
    pub fn new() -> Self {
        let values = STANDARD_VALUES
            .iter()
            .map(|(name, dollars)| {
                (
                    normalize_feature(name),
                    (name.to_string(), Decimal::new(*dollars, 0)),
                )
            })
            .collect();
        Self { values }
    }

    /// Create from EquipmentConfig
    pub fn from_config(config: &EquipmentConfig) -> Self {
        Self::new().with_overrides(
            config
                .custom_values
                .iter()
                .map(|(name, value)| (name.clone(), *value)),
        )
    }

    /// Replace or add feature values
    pub fn with_overrides<I, S>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: Into<String>,
    {
        for (name, value) in overrides {
            let name = name.into();
            self.values.insert(normalize_feature(&name), (name, value));
        }
        self
    }

    /// Number of known features
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Known features as (display name, value), ordered by normalized name
    pub fn entries(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.values
            .values()
            .map(|(name, value)| (name.as_str(), *value))
    }
}

impl Default for StandardEquipmentValues {
    fn default() -> Self {
        Self::new()
    }
}

impl EquipmentValueLookup for StandardEquipmentValues {
    fn value_of(&self, feature: &str) -> Option<Decimal> {
        self.values
            .get(&normalize_feature(feature))
            .map(|(_, value)| *value)
    }
}
