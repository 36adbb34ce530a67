//! Capabilities the planner consumes from its collaborators.
//!
//! These are intentionally minimal. The engine is generic over the oracle,
//! while telemetry and history are plain seams the hosting service
//! implements for its own storage.

use crate::history::{HistoryError, RouteRecord};
use crate::model::{ContainerSnapshot, GeoPoint};
use crate::oracle::{Leg, OracleError};
use crate::telemetry::TelemetryError;

/// Travel distance/duration between two points.
///
/// Called once per directed edge the sequencer evaluates. Implementations
/// must be safe to call concurrently: the sequencer fans lookups out across
/// a thread pool.
///
/// Implementations must bound their own latency. The engine neither times
/// out nor interrupts a lookup, so a call that never returns blocks the
/// step (and any cancellation) forever. Return an error on timeout and the
/// edge falls back to the haversine estimate.
pub trait DistanceOracle {
    fn distance(&self, from: GeoPoint, to: GeoPoint) -> Result<Leg, OracleError>;
}

impl<T> DistanceOracle for &T
where
    T: DistanceOracle + ?Sized,
{
    fn distance(&self, from: GeoPoint, to: GeoPoint) -> Result<Leg, OracleError> {
        (**self).distance(from, to)
    }
}

/// Supplies every registered container with its latest reading.
///
/// The returned vector is an immutable snapshot for the duration of one
/// optimization call; its order is the "unsorted" baseline visiting order.
pub trait TelemetrySource {
    fn snapshot(&self) -> Result<Vec<ContainerSnapshot>, TelemetryError>;
}

/// Persists optimized routes for history and reporting.
pub trait RouteHistory {
    fn record(&self, record: RouteRecord) -> Result<(), HistoryError>;
}
