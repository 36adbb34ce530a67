//! Test fixtures for collection-route-planner.
//!
//! Provides realistic test data including:
//! - Caxias do Sul container sites and the Codeca garage depot
//! - Builders for containers, readings and snapshots
//! - Stub distance oracles (planar, failing on one edge, counting)
#![allow(dead_code)]

pub mod caxias_do_sul_locations;

use std::sync::atomic::{AtomicUsize, Ordering};

use collection_route_planner::model::{Container, ContainerId, ContainerSnapshot, Depot, GeoPoint, Reading};
use collection_route_planner::oracle::{Leg, OracleError};
use collection_route_planner::traits::DistanceOracle;
use jiff::Timestamp;

pub use caxias_do_sul_locations::*;

// ============================================================================
// Builders
// ============================================================================

pub fn point(location: &Location) -> GeoPoint {
    GeoPoint::from(location.coords())
}

pub fn codeca_depot() -> Depot {
    Depot::new(CODECA_GARAGE.name, point(&CODECA_GARAGE))
}

pub fn reading_at(id: impl Into<ContainerId>, level: f64, secs: i64) -> Reading {
    Reading {
        container_id: id.into(),
        level,
        battery: 80.0,
        rssi: -72,
        recorded_at: Timestamp::from_second(secs).unwrap(),
    }
}

/// Container at `position` whose latest reading reports `level`.
pub fn snapshot_at(id: impl Into<ContainerId>, position: GeoPoint, level: f64) -> ContainerSnapshot {
    let id = id.into();
    let reading = reading_at(id.clone(), level, 1_760_000_000);
    ContainerSnapshot::new(Container::new(id.clone(), id.to_string(), position), Some(reading))
}

pub fn snapshot(id: impl Into<ContainerId>, location: &Location, level: f64) -> ContainerSnapshot {
    let mut snapshot = snapshot_at(id, point(location), level);
    snapshot.container.name = location.name.to_string();
    snapshot
}

/// Registered container that has never reported.
pub fn silent(id: impl Into<ContainerId>, location: &Location) -> ContainerSnapshot {
    let id = id.into();
    ContainerSnapshot::new(Container::new(id, location.name, point(location)), None)
}

/// Every Caxias do Sul site with a container, levels cycling through the
/// urgency bands.
pub fn city_snapshot() -> Vec<ContainerSnapshot> {
    const LEVELS: [f64; 6] = [92.0, 35.0, 78.0, 55.0, 61.0, 12.0];
    all_sites()
        .iter()
        .enumerate()
        .map(|(i, site)| snapshot((i + 1) as u64, site, LEVELS[i % LEVELS.len()]))
        .collect()
}

// ============================================================================
// Stub oracles
// ============================================================================

/// Euclidean distance over raw coordinates: one degree is one kilometre,
/// one kilometre is two minutes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarOracle;

impl PlanarOracle {
    pub fn leg(from: GeoPoint, to: GeoPoint) -> Leg {
        let km = ((from.latitude - to.latitude).powi(2) + (from.longitude - to.longitude).powi(2))
            .sqrt();
        Leg::new(km, km * 2.0)
    }
}

impl DistanceOracle for PlanarOracle {
    fn distance(&self, from: GeoPoint, to: GeoPoint) -> Result<Leg, OracleError> {
        Ok(Self::leg(from, to))
    }
}

/// Planar oracle that fails every lookup ending at `broken`.
#[derive(Debug, Clone, Copy)]
pub struct FailingEdgeOracle {
    pub broken: GeoPoint,
}

impl DistanceOracle for FailingEdgeOracle {
    fn distance(&self, from: GeoPoint, to: GeoPoint) -> Result<Leg, OracleError> {
        if to == self.broken {
            return Err(OracleError::Unavailable("timed out".to_string()));
        }
        Ok(PlanarOracle::leg(from, to))
    }
}

/// Oracle that always answers with a negative distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegativeOracle;

impl DistanceOracle for NegativeOracle {
    fn distance(&self, _from: GeoPoint, _to: GeoPoint) -> Result<Leg, OracleError> {
        Ok(Leg::new(-1.0, 3.0))
    }
}

/// Counts lookups made through the wrapped oracle.
#[derive(Debug, Default)]
pub struct CountingOracle<O> {
    pub inner: O,
    calls: AtomicUsize,
}

impl<O> CountingOracle<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<O: DistanceOracle> DistanceOracle for CountingOracle<O> {
    fn distance(&self, from: GeoPoint, to: GeoPoint) -> Result<Leg, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.distance(from, to)
    }
}
