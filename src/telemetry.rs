//! In-memory container registry with append-only readings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Container, ContainerId, ContainerSnapshot, Depot, Reading};
use crate::selector::latest_reading;
use crate::traits::TelemetrySource;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Container {0} is already registered")]
    DuplicateContainer(ContainerId),

    #[error("Reading for unknown container {0}")]
    UnknownContainer(ContainerId),

    #[error("Telemetry source unavailable: {0}")]
    Unavailable(String),
}

/// Containers in registration order, each with its readings in append order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTelemetry {
    containers: Vec<Container>,
    readings: HashMap<ContainerId, Vec<Reading>>,
}

impl InMemoryTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from exported records. Readings are appended in the
    /// order given.
    pub fn from_records(
        containers: Vec<Container>,
        readings: Vec<Reading>,
    ) -> Result<Self, TelemetryError> {
        let mut telemetry = Self::new();
        for container in containers {
            telemetry.register(container)?;
        }
        for reading in readings {
            telemetry.append_reading(reading)?;
        }
        Ok(telemetry)
    }

    pub fn register(&mut self, container: Container) -> Result<(), TelemetryError> {
        if self.readings.contains_key(&container.id) {
            return Err(TelemetryError::DuplicateContainer(container.id));
        }
        self.readings.insert(container.id.clone(), Vec::new());
        self.containers.push(container);
        Ok(())
    }

    pub fn append_reading(&mut self, reading: Reading) -> Result<(), TelemetryError> {
        let readings = self
            .readings
            .get_mut(&reading.container_id)
            .ok_or_else(|| TelemetryError::UnknownContainer(reading.container_id.clone()))?;
        readings.push(reading);
        Ok(())
    }

    pub fn readings(&self, id: &ContainerId) -> &[Reading] {
        self.readings.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }
}

impl TelemetrySource for InMemoryTelemetry {
    fn snapshot(&self) -> Result<Vec<ContainerSnapshot>, TelemetryError> {
        Ok(self
            .containers
            .iter()
            .map(|container| {
                let latest = latest_reading(self.readings(&container.id)).cloned();
                ContainerSnapshot::new(container.clone(), latest)
            })
            .collect())
    }
}

/// Exported registry + telemetry, as read by the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryExport {
    #[serde(default)]
    pub depot: Option<Depot>,
    pub containers: Vec<Container>,
    #[serde(default)]
    pub readings: Vec<Reading>,
}

impl TelemetryExport {
    pub fn into_store(self) -> Result<(Option<Depot>, InMemoryTelemetry), TelemetryError> {
        let store = InMemoryTelemetry::from_records(self.containers, self.readings)?;
        Ok((self.depot, store))
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::model::GeoPoint;

    fn reading(id: u64, level: f64, secs: i64) -> Reading {
        Reading {
            container_id: ContainerId::from(id),
            level,
            battery: 50.0,
            rssi: -90,
            recorded_at: Timestamp::from_second(secs).unwrap(),
        }
    }

    fn container(id: u64) -> Container {
        Container::new(id, format!("Container {id}"), GeoPoint::new(-29.16, -51.18))
    }

    #[test]
    fn test_snapshot_uses_latest_reading() {
        let telemetry = InMemoryTelemetry::from_records(
            vec![container(1), container(2)],
            vec![reading(1, 90.0, 200), reading(1, 30.0, 100), reading(1, 40.0, 200)],
        )
        .unwrap();

        let snapshot = telemetry.snapshot().unwrap();
        assert_eq!(snapshot.len(), 2);
        // Equal timestamps: the later append wins.
        assert_eq!(snapshot[0].reading.as_ref().unwrap().level, 40.0);
        assert!(snapshot[1].reading.is_none());
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut telemetry = InMemoryTelemetry::new();
        telemetry.register(container(1)).unwrap();
        assert!(matches!(
            telemetry.register(container(1)),
            Err(TelemetryError::DuplicateContainer(_))
        ));
    }

    #[test]
    fn test_reading_for_unknown_container_is_rejected() {
        let mut telemetry = InMemoryTelemetry::new();
        assert!(matches!(
            telemetry.append_reading(reading(9, 10.0, 1)),
            Err(TelemetryError::UnknownContainer(id)) if id == ContainerId::from(9u64)
        ));
    }

    #[test]
    fn test_export_parses_registry_shapes() {
        let export: TelemetryExport = serde_json::from_str(
            r#"{
                "containers": [
                    {"id": 1, "name": "Rua Pinheiro Machado", "category": "Orgânico",
                     "position": {"latitude": -29.1651, "longitude": -51.1789}},
                    {"id": 2, "name": "Sem GPS", "position": null}
                ],
                "readings": [
                    {"container_id": 1, "level": 82, "battery": 77, "rssi": -71,
                     "recorded_at": "2026-03-01T08:00:00Z"}
                ]
            }"#,
        )
        .unwrap();

        let (depot, store) = export.into_store().unwrap();
        assert!(depot.is_none());
        assert_eq!(store.containers().len(), 2);
        assert_eq!(store.readings(&ContainerId::from(1u64)).len(), 1);
    }
}
