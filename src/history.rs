//! Route history collaborator: records optimized routes and totals their savings.

use jiff::Timestamp;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ContainerId;
use crate::route::RouteResult;
use crate::traits::RouteHistory;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("History store unavailable: {0}")]
    Unavailable(String),
}

/// A persisted optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    pub created_at: Timestamp,
    pub container_ids: Vec<ContainerId>,
    pub result: RouteResult,
}

impl RouteRecord {
    pub fn new(result: RouteResult) -> Self {
        Self::at(result, Timestamp::now())
    }

    pub fn at(result: RouteResult, created_at: Timestamp) -> Self {
        Self {
            created_at,
            container_ids: result.container_ids(),
            result,
        }
    }
}

/// Accumulated savings over a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsTotals {
    pub fuel_saved_l: f64,
    pub co2_saved_kg: f64,
    pub cost_saved: f64,
    pub time_saved_min: f64,
    pub distance_km: f64,
    pub route_count: usize,
}

impl SavingsTotals {
    fn add(&mut self, record: &RouteRecord) {
        let savings = &record.result.savings;
        self.fuel_saved_l += savings.fuel_saved_l;
        self.co2_saved_kg += savings.co2_saved_kg;
        self.cost_saved += savings.cost_saved;
        self.time_saved_min += savings.time_saved_min;
        self.distance_km += record.result.total_distance_km;
        self.route_count += 1;
    }
}

/// Process-local history, for tests and the CLI.
#[derive(Debug, Default)]
pub struct InMemoryRouteHistory {
    records: Mutex<Vec<RouteRecord>>,
}

impl InMemoryRouteHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Records, newest first.
    pub fn list(&self) -> Vec<RouteRecord> {
        let mut records = self.records.lock().clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    pub fn total_savings(&self) -> SavingsTotals {
        self.totals_where(|_| true)
    }

    /// Totals of the records created at or after `since`.
    pub fn total_savings_since(&self, since: Timestamp) -> SavingsTotals {
        self.totals_where(|record| record.created_at >= since)
    }

    fn totals_where<F>(&self, keep: F) -> SavingsTotals
    where
        F: Fn(&RouteRecord) -> bool,
    {
        let mut totals = SavingsTotals::default();
        for record in self.records.lock().iter().filter(|r| keep(*r)) {
            totals.add(record);
        }
        totals
    }
}

impl RouteHistory for InMemoryRouteHistory {
    fn record(&self, record: RouteRecord) -> Result<(), HistoryError> {
        self.records.lock().push(record);
        Ok(())
    }
}
