//! Domain model shared by the selector, sequencer and route assembly.
//!
//! Containers and readings are owned by the registry and telemetry
//! collaborators; the planner only ever borrows them for the duration of
//! one optimization call.

use std::cmp::Ordering;
use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Fill level (percent) at which a container becomes worth a detour.
pub const MEDIUM_FILL_LEVEL: f64 = 50.0;

/// Fill level (percent) at which a container is flagged critical.
pub const CRITICAL_FILL_LEVEL: f64 = 75.0;

/// Container identifier.
///
/// Ordering is "natural": two numeric ids compare as numbers, anything else
/// compares as text, and numeric ids sort before textual ones. The
/// sequencer relies on this ordering to break distance ties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawContainerId", into = "String")]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for ContainerId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.parse::<u64>(), other.0.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ContainerId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContainerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for ContainerId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<ContainerId> for String {
    fn from(id: ContainerId) -> Self {
        id.0
    }
}

// Registries hand out both numeric and textual ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawContainerId {
    Number(u64),
    Text(String),
}

impl From<RawContainerId> for ContainerId {
    fn from(raw: RawContainerId) -> Self {
        match raw {
            RawContainerId::Number(n) => Self(n.to_string()),
            RawContainerId::Text(s) => Self(s),
        }
    }
}

/// WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and inside [-90, 90] x [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Returns the point as a `(lat, lng)` tuple.
    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Kind of waste a container holds. Carried through to the route output,
/// never used for routing decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerCategory {
    #[serde(alias = "Orgânico", alias = "Organico")]
    Organic,
    #[serde(alias = "Seletivo")]
    Selective,
    #[default]
    #[serde(alias = "Misto")]
    Mixed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
}

/// A registered waste container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: ContainerId,
    pub name: String,
    /// Registries accept containers before they are geolocated.
    #[serde(default)]
    pub position: Option<GeoPoint>,
    #[serde(default)]
    pub category: ContainerCategory,
    #[serde(default)]
    pub status: ContainerStatus,
}

impl Container {
    pub fn new(id: impl Into<ContainerId>, name: impl Into<String>, position: GeoPoint) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position: Some(position),
            category: ContainerCategory::default(),
            status: ContainerStatus::default(),
        }
    }

    pub fn with_category(mut self, category: ContainerCategory) -> Self {
        self.category = category;
        self
    }
}

/// One sensor report for a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub container_id: ContainerId,
    /// Fill level in percent.
    pub level: f64,
    /// Battery charge in percent.
    #[serde(default)]
    pub battery: f64,
    /// Signal strength in dBm.
    #[serde(default)]
    pub rssi: i32,
    pub recorded_at: Timestamp,
}

impl Reading {
    /// Fill level clamped to [0, 100].
    pub fn fill_level(&self) -> f64 {
        clamp_percent(self.level)
    }

    /// Battery charge clamped to [0, 100].
    pub fn battery_level(&self) -> f64 {
        clamp_percent(self.battery)
    }
}

/// Clamps a percentage into [0, 100]. NaN stays NaN so it never passes a
/// threshold comparison.
pub fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// A container paired with its most recent reading, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    pub container: Container,
    pub reading: Option<Reading>,
}

impl ContainerSnapshot {
    pub fn new(container: Container, reading: Option<Reading>) -> Self {
        Self { container, reading }
    }

    /// Latest fill level, 0 for containers that never reported.
    pub fn fill_level(&self) -> f64 {
        self.reading.as_ref().map_or(0.0, Reading::fill_level)
    }

    pub fn urgency(&self) -> FillUrgency {
        FillUrgency::from_level(self.fill_level())
    }
}

/// Fixed start point of every collection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    pub name: String,
    pub position: GeoPoint,
}

impl Depot {
    pub fn new(name: impl Into<String>, position: GeoPoint) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

impl Default for Depot {
    fn default() -> Self {
        Self::new("Codeca (Garagem)", GeoPoint::new(-29.1750, -51.1850))
    }
}

/// Urgency band of a container's fill level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillUrgency {
    Low,
    Medium,
    Critical,
}

impl FillUrgency {
    pub fn from_level(level: f64) -> Self {
        if level >= CRITICAL_FILL_LEVEL {
            FillUrgency::Critical
        } else if level >= MEDIUM_FILL_LEVEL {
            FillUrgency::Medium
        } else {
            FillUrgency::Low
        }
    }
}

impl fmt::Display for FillUrgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FillUrgency::Low => "low",
            FillUrgency::Medium => "medium",
            FillUrgency::Critical => "critical",
        })
    }
}
