//! Travel legs, oracle selection and per-edge fallback.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::haversine::HaversineOracle;
use crate::model::GeoPoint;
use crate::osrm::{OsrmClient, OsrmConfig};
use crate::traits::DistanceOracle;

/// Travel distance and duration of one directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Leg {
    pub distance_km: f64,
    pub duration_min: f64,
}

impl Leg {
    pub const ZERO: Leg = Leg {
        distance_km: 0.0,
        duration_min: 0.0,
    };

    pub const fn new(distance_km: f64, duration_min: f64) -> Self {
        Self {
            distance_km,
            duration_min,
        }
    }

    /// Both components finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.distance_km.is_finite()
            && self.duration_min.is_finite()
            && self.distance_km >= 0.0
            && self.duration_min >= 0.0
    }
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("No route: {0}")]
    NoRoute(String),

    #[error("Invalid leg: {distance_km} km, {duration_min} min")]
    InvalidLeg { distance_km: f64, duration_min: f64 },

    #[error("Oracle unavailable: {0}")]
    Unavailable(String),
}

/// Oracle chosen by configuration: the remote routing service or the local
/// great-circle formula.
#[derive(Debug, Clone)]
pub enum OracleBackend {
    Remote(OsrmClient),
    Local(HaversineOracle),
}

impl OracleBackend {
    pub fn remote(config: OsrmConfig) -> Result<Self, OracleError> {
        Ok(OracleBackend::Remote(OsrmClient::new(config)?))
    }

    pub fn local(speed_kmh: f64) -> Self {
        OracleBackend::Local(HaversineOracle::new(speed_kmh))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, OracleBackend::Remote(_))
    }
}

impl DistanceOracle for OracleBackend {
    fn distance(&self, from: GeoPoint, to: GeoPoint) -> Result<Leg, OracleError> {
        match self {
            OracleBackend::Remote(client) => client.distance(from, to),
            OracleBackend::Local(haversine) => haversine.distance(from, to),
        }
    }
}

/// Where a resolved leg came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegSource {
    Oracle,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLeg {
    pub leg: Leg,
    pub source: LegSource,
}

impl ResolvedLeg {
    pub fn is_fallback(&self) -> bool {
        self.source == LegSource::Fallback
    }
}

/// Wraps a primary oracle with the haversine formula so a failed or
/// nonsensical lookup degrades a single edge instead of the whole route.
#[derive(Debug, Clone)]
pub struct ResilientOracle<O> {
    primary: O,
    fallback: HaversineOracle,
}

impl<O> ResilientOracle<O>
where
    O: DistanceOracle,
{
    pub fn new(primary: O, fallback: HaversineOracle) -> Self {
        Self { primary, fallback }
    }

    pub fn primary(&self) -> &O {
        &self.primary
    }

    pub fn resolve(&self, from: GeoPoint, to: GeoPoint) -> ResolvedLeg {
        let result = self.primary.distance(from, to).and_then(|leg| {
            if leg.is_valid() {
                Ok(leg)
            } else {
                Err(OracleError::InvalidLeg {
                    distance_km: leg.distance_km,
                    duration_min: leg.duration_min,
                })
            }
        });

        match result {
            Ok(leg) => ResolvedLeg {
                leg,
                source: LegSource::Oracle,
            },
            Err(err) => {
                warn!(%from, %to, error = %err, "distance lookup failed, using haversine fallback");
                ResolvedLeg {
                    leg: self.fallback.leg(from, to),
                    source: LegSource::Fallback,
                }
            }
        }
    }
}
