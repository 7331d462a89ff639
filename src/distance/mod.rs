//! Distance lookup between the loss vehicle and comparables

mod haversine;

pub use haversine::{HaversineDistance, EARTH_RADIUS_MILES};

use crate::vehicle::{ComparableVehicle, GeoPoint, LossVehicle};
use rust_decimal::Decimal;

/// Trait for distance sources
pub trait DistanceProvider: Send + Sync {
    /// Distance in miles between two points, `None` if it cannot be determined
    fn distance_miles(&self, from: &GeoPoint, to: &GeoPoint) -> Option<Decimal>;
}

/// Fill in `distance_from_loss` for comparables that lack it.
///
/// Comparables that already carry a distance are left as they are. Returns
/// the number of distances attached.
pub fn attach_distances(
    loss: &LossVehicle,
    comparables: &mut [ComparableVehicle],
    provider: &dyn DistanceProvider,
) -> usize {
    let Some(origin) = loss.coordinates else {
        return 0;
    };

    let mut attached = 0;
    for comp in comparables
        .iter_mut()
        .filter(|c| c.distance_from_loss.is_none())
    {
        let Some(point) = comp.coordinates else {
            continue;
        };
        if let Some(miles) = provider.distance_miles(&origin, &point) {
            tracing::debug!(comparable = %comp.id, %miles, "Attached distance");
            comp.distance_from_loss = Some(miles);
            attached += 1;
        }
    }
    attached
}
