//! Route result model and assembly.

use serde::{Deserialize, Serialize};

use crate::metrics::Savings;
use crate::model::{ContainerCategory, ContainerId, Depot, FillUrgency, GeoPoint};
use crate::sequencer::Sequence;

/// Id reported for the depot point.
pub const DEPOT_POINT_ID: &str = "depot";

/// One entry of the ordered route. The depot is always order 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RoutePoint {
    Depot {
        order: usize,
        id: String,
        name: String,
        position: GeoPoint,
    },
    Container(ContainerStop),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStop {
    pub order: usize,
    pub id: ContainerId,
    pub name: String,
    pub position: GeoPoint,
    pub fill_level: f64,
    pub battery_level: f64,
    pub category: ContainerCategory,
    pub urgency: FillUrgency,
    /// Leg from the previous point.
    pub leg_distance_km: f64,
    pub leg_duration_min: f64,
    /// Distance driven from the depot up to and including this leg.
    pub cumulative_distance_km: f64,
}

impl RoutePoint {
    pub fn depot(depot: &Depot) -> Self {
        RoutePoint::Depot {
            order: 0,
            id: DEPOT_POINT_ID.to_string(),
            name: depot.name.clone(),
            position: depot.position,
        }
    }

    pub fn order(&self) -> usize {
        match self {
            RoutePoint::Depot { order, .. } => *order,
            RoutePoint::Container(stop) => stop.order,
        }
    }

    pub fn position(&self) -> GeoPoint {
        match self {
            RoutePoint::Depot { position, .. } => *position,
            RoutePoint::Container(stop) => stop.position,
        }
    }

    pub fn is_depot(&self) -> bool {
        matches!(self, RoutePoint::Depot { .. })
    }

    pub fn container_id(&self) -> Option<&ContainerId> {
        match self {
            RoutePoint::Depot { .. } => None,
            RoutePoint::Container(stop) => Some(&stop.id),
        }
    }
}

/// Container left out of the route, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RouteWarning {
    MissingCoordinates {
        container_id: ContainerId,
    },
    InvalidCoordinates {
        container_id: ContainerId,
        latitude: f64,
        longitude: f64,
    },
    DuplicateContainer {
        container_id: ContainerId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub containers_count: usize,
    pub critical_count: usize,
    pub average_fill_level: f64,
}

/// Outcome of one optimization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub success: bool,
    pub message: String,
    pub fill_threshold: f64,
    pub total_distance_km: f64,
    pub total_duration_min: f64,
    pub points: Vec<RoutePoint>,
    pub savings: Savings,
    pub summary: RouteSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<RouteWarning>,
    /// Edge lookups answered by the haversine fallback.
    #[serde(default)]
    pub fallback_lookups: usize,
}

impl RouteResult {
    /// Result for a run where nothing crossed the threshold.
    pub fn depot_only(depot: &Depot, fill_threshold: f64, warnings: Vec<RouteWarning>) -> Self {
        Self {
            success: true,
            message: format!("No containers at or above {fill_threshold}% fill level"),
            fill_threshold,
            total_distance_km: 0.0,
            total_duration_min: 0.0,
            points: vec![RoutePoint::depot(depot)],
            savings: Savings::default(),
            summary: RouteSummary::default(),
            warnings,
            fallback_lookups: 0,
        }
    }

    pub fn stops(&self) -> impl Iterator<Item = &ContainerStop> {
        self.points.iter().filter_map(|point| match point {
            RoutePoint::Container(stop) => Some(stop),
            RoutePoint::Depot { .. } => None,
        })
    }

    pub fn container_ids(&self) -> Vec<ContainerId> {
        self.points
            .iter()
            .filter_map(RoutePoint::container_id)
            .cloned()
            .collect()
    }
}

/// Builds the final result: the depot at order 0 followed by the sequenced
/// stops. Totals are the sums of the per-stop legs.
pub fn assemble(
    depot: &Depot,
    sequence: &Sequence<'_>,
    savings: Savings,
    fill_threshold: f64,
    warnings: Vec<RouteWarning>,
    fallback_lookups: usize,
) -> RouteResult {
    let mut points = Vec::with_capacity(sequence.stops.len() + 1);
    points.push(RoutePoint::depot(depot));

    let mut cumulative_distance_km = 0.0;
    let mut total_duration_min = 0.0;
    let mut critical_count = 0;
    let mut fill_sum = 0.0;

    for (index, stop) in sequence.stops.iter().enumerate() {
        let container = stop.candidate.container;
        let reading = stop.candidate.reading;
        let fill_level = reading.fill_level();
        let urgency = FillUrgency::from_level(fill_level);

        cumulative_distance_km += stop.leg.distance_km;
        total_duration_min += stop.leg.duration_min;
        fill_sum += fill_level;
        if urgency == FillUrgency::Critical {
            critical_count += 1;
        }

        points.push(RoutePoint::Container(ContainerStop {
            order: index + 1,
            id: container.id.clone(),
            name: container.name.clone(),
            position: stop.candidate.position,
            fill_level,
            battery_level: reading.battery_level(),
            category: container.category,
            urgency,
            leg_distance_km: stop.leg.distance_km,
            leg_duration_min: stop.leg.duration_min,
            cumulative_distance_km,
        }));
    }

    let containers_count = sequence.stops.len();
    let average_fill_level = if containers_count > 0 {
        fill_sum / containers_count as f64
    } else {
        0.0
    };

    RouteResult {
        success: true,
        message: format!("Optimized route covering {containers_count} containers"),
        fill_threshold,
        total_distance_km: cumulative_distance_km,
        total_duration_min,
        points,
        savings,
        summary: RouteSummary {
            containers_count,
            critical_count,
            average_fill_level,
        },
        warnings,
        fallback_lookups,
    }
}
