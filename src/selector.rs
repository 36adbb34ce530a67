//! Candidate selection by fill-level policy.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::model::{Container, ContainerId, ContainerSnapshot, GeoPoint, Reading, clamp_percent};
use crate::route::RouteWarning;

/// Threshold used when the caller does not override it.
pub const DEFAULT_FILL_THRESHOLD: f64 = 50.0;

/// A container that warrants pickup, borrowed from the telemetry snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub container: &'a Container,
    pub reading: &'a Reading,
    /// Validated copy of the container's position.
    pub position: GeoPoint,
}

impl Candidate<'_> {
    pub fn fill_level(&self) -> f64 {
        self.reading.fill_level()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    /// Candidates in snapshot order.
    pub candidates: Vec<Candidate<'a>>,
    /// Containers that qualified by level but could not be routed.
    pub warnings: Vec<RouteWarning>,
}

impl Selection<'_> {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}

/// Clamps a threshold into [0, 100]; NaN falls back to the default.
pub fn clamp_threshold(threshold: f64) -> f64 {
    if threshold.is_nan() {
        return DEFAULT_FILL_THRESHOLD;
    }
    clamp_percent(threshold)
}

/// Most recent reading by timestamp. On equal timestamps the reading
/// appended last wins.
pub fn latest_reading(readings: &[Reading]) -> Option<&Reading> {
    readings.iter().max_by_key(|reading| reading.recorded_at)
}

/// Returns the containers whose latest fill level is at or above
/// `threshold`.
///
/// Containers without a reading never qualify. Qualifying containers with
/// a missing or out-of-range position are dropped with a warning instead of
/// failing the whole selection.
pub fn select_candidates(snapshots: &[ContainerSnapshot], threshold: f64) -> Selection<'_> {
    let threshold = clamp_threshold(threshold);
    let mut selection = Selection::default();
    let mut seen: HashSet<&ContainerId> = HashSet::new();

    for snapshot in snapshots {
        let Some(reading) = snapshot.reading.as_ref() else {
            continue;
        };
        let level = reading.fill_level();
        if level.is_nan() || level < threshold {
            continue;
        }

        let container = &snapshot.container;
        if !seen.insert(&container.id) {
            warn!(container = %container.id, "ignoring duplicate container in snapshot");
            selection.warnings.push(RouteWarning::DuplicateContainer {
                container_id: container.id.clone(),
            });
            continue;
        }

        match container.position {
            Some(position) if position.is_valid() => selection.candidates.push(Candidate {
                container,
                reading,
                position,
            }),
            Some(position) => {
                warn!(container = %container.id, %position, "excluding container with invalid coordinates");
                selection.warnings.push(RouteWarning::InvalidCoordinates {
                    container_id: container.id.clone(),
                    latitude: position.latitude,
                    longitude: position.longitude,
                });
            }
            None => {
                warn!(container = %container.id, "excluding container without coordinates");
                selection.warnings.push(RouteWarning::MissingCoordinates {
                    container_id: container.id.clone(),
                });
            }
        }
    }

    debug!(
        threshold,
        total = snapshots.len(),
        selected = selection.candidates.len(),
        excluded = selection.warnings.len(),
        "selected route candidates"
    );

    selection
}
