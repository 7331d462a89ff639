//! Great-circle distance on a spherical Earth

use super::DistanceProvider;
use crate::vehicle::GeoPoint;
use rust_decimal::Decimal;

/// Mean Earth radius in miles
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Haversine distance provider, rounded to a tenth of a mile
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineDistance;

impl HaversineDistance {
    pub fn new() -> Self {
        Self
    }
}

impl DistanceProvider for HaversineDistance {
    fn distance_miles(&self, from: &GeoPoint, to: &GeoPoint) -> Option<Decimal> {
        let coords = [from.latitude, from.longitude, to.latitude, to.longitude];
        if coords.iter().any(|c| !c.is_finite()) {
            return None;
        }
        if from.latitude.abs() > 90.0 || to.latitude.abs() > 90.0 {
            return None;
        }

        let lat1 = from.latitude.to_radians();
        let lat2 = to.latitude.to_radians();
        let d_lat = (to.latitude - from.latitude).to_radians();
        let d_lon = (to.longitude - from.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        let miles = EARTH_RADIUS_MILES * c;

        Decimal::try_from(miles).ok().map(|d| d.round_dp(1))
    }
}
