//! Haversine distance oracle (fallback when the routing service is unavailable).
//!
//! Uses great-circle distance and estimates travel time from an assumed
//! average urban speed. Less accurate than road routing but always available.

use crate::model::GeoPoint;
use crate::oracle::{Leg, OracleError};
use crate::traits::DistanceOracle;

/// Average urban driving speed assumption for time estimation.
pub const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let (lat1, lng1) = from.coords();
    let (lat2, lng2) = to.coords();

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.min(1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Haversine-based distance oracle.
///
/// Never fails, which is what makes it usable as the per-edge fallback.
#[derive(Debug, Clone)]
pub struct HaversineOracle {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineOracle {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineOracle {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Infallible leg estimate between two points.
    pub fn leg(&self, from: GeoPoint, to: GeoPoint) -> Leg {
        let km = haversine_km(from, to);
        Leg::new(km, self.km_to_minutes(km))
    }

    /// Convert distance in km to travel time in minutes.
    fn km_to_minutes(&self, km: f64) -> f64 {
        if self.speed_kmh <= 0.0 {
            return 0.0;
        }
        km / self.speed_kmh * 60.0
    }
}

impl DistanceOracle for HaversineOracle {
    fn distance(&self, from: GeoPoint, to: GeoPoint) -> Result<Leg, OracleError> {
        Ok(self.leg(from, to))
    }
}
