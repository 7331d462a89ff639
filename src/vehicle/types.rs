//! Vehicle record types

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Physical condition grade of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    #[serde(alias = "Excellent")]
    Excellent,
    #[serde(alias = "Good")]
    Good,
    #[serde(alias = "Fair")]
    Fair,
    #[serde(alias = "Poor")]
    Poor,
}

impl Condition {
    /// All grades, best first
    pub const ALL: [Condition; 4] = [
        Condition::Excellent,
        Condition::Good,
        Condition::Fair,
        Condition::Poor,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Condition::Excellent => "Excellent",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
            Condition::Poor => "Poor",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolved geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// The insured vehicle being valued
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LossVehicle {
    /// Model year
    pub year: i32,
    pub make: String,
    pub model: String,
    /// Odometer reading in miles
    pub mileage: u32,
    /// Free-form location, e.g. "Columbus, OH"
    pub location: String,
    /// Geocoded location, when known
    #[serde(default)]
    pub coordinates: Option<GeoPoint>,
    pub condition: Condition,
    /// Installed options by feature name
    #[serde(default)]
    pub equipment: BTreeSet<String>,
}

impl LossVehicle {
    /// Vehicle age in whole model years at `as_of`, never negative
    pub fn age_at(&self, as_of: DateTime<Utc>) -> u32 {
        u32::try_from(as_of.year() - self.year).unwrap_or(0)
    }

    /// Short "year make model" label
    pub fn describe(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }
}

/// Where a comparable listing came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Dealer,
    Private,
    Auction,
    Online,
    #[default]
    Other,
}

/// Provenance metadata for a comparable. Never used in calculations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSource {
    #[serde(default)]
    pub kind: SourceKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub listed_at: Option<DateTime<Utc>>,
}

/// A comparable vehicle listing supplied by the appraiser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparableVehicle {
    pub id: Uuid,
    pub appraisal_id: Uuid,
    pub year: i32,
    pub make: String,
    pub model: String,
    pub mileage: u32,
    pub location: String,
    #[serde(default)]
    pub coordinates: Option<GeoPoint>,
    /// Miles from the loss vehicle, attached upstream by a distance provider
    #[serde(default)]
    pub distance_from_loss: Option<Decimal>,
    /// Asking price in dollars
    pub list_price: Decimal,
    pub condition: Condition,
    #[serde(default)]
    pub equipment: BTreeSet<String>,
    #[serde(default)]
    pub source: ListingSource,
}

impl ComparableVehicle {
    /// Create a new comparable with a fresh identifier and no equipment
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        appraisal_id: Uuid,
        year: i32,
        make: impl Into<String>,
        model: impl Into<String>,
        mileage: u32,
        location: impl Into<String>,
        list_price: Decimal,
        condition: Condition,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            appraisal_id,
            year,
            make: make.into(),
            model: model.into(),
            mileage,
            location: location.into(),
            coordinates: None,
            distance_from_loss: None,
            list_price,
            condition,
            equipment: BTreeSet::new(),
            source: ListingSource::default(),
        }
    }

    /// Set the pre-computed distance from the loss vehicle
    pub fn with_distance(mut self, miles: Decimal) -> Self {
        self.distance_from_loss = Some(miles);
        self
    }

    /// Set the geocoded position
    pub fn with_coordinates(mut self, point: GeoPoint) -> Self {
        self.coordinates = Some(point);
        self
    }

    /// Add installed options
    pub fn with_equipment<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.equipment.extend(features.into_iter().map(Into::into));
        self
    }

    /// Short "year make model" label
    pub fn describe(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }
}

/// Canonical key for comparing feature names: trimmed, whitespace collapsed, lowercase
pub fn normalize_feature(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
