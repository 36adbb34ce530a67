//! Savings of the optimized route against the unsorted baseline.

use serde::{Deserialize, Serialize};

use crate::cancel::CancellationToken;
use crate::error::RouteError;
use crate::model::GeoPoint;
use crate::oracle::ResilientOracle;
use crate::selector::Candidate;
use crate::traits::DistanceOracle;

/// How "time saved" is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSavingsMode {
    /// `stops x per_stop_minutes`.
    #[default]
    PerStop,
    /// Baseline duration minus optimized duration, floored at zero.
    DurationDelta,
}

/// Business and environmental constants. They drift with fuel prices and
/// fleet composition, so they always come from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsModel {
    pub fuel_consumption_l_per_km: f64,
    pub co2_kg_per_liter: f64,
    pub fuel_unit_cost: f64,
    pub per_stop_minutes: f64,
    pub time_savings: TimeSavingsMode,
}

impl Default for SavingsModel {
    fn default() -> Self {
        Self {
            fuel_consumption_l_per_km: 0.08,
            co2_kg_per_liter: 3.125,
            fuel_unit_cost: 6.0,
            per_stop_minutes: 5.0,
            time_savings: TimeSavingsMode::PerStop,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Savings {
    pub fuel_saved_l: f64,
    pub co2_saved_kg: f64,
    pub cost_saved: f64,
    pub time_saved_min: f64,
    pub efficiency_gain_pct: f64,
}

/// Total distance and duration of one way of visiting the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteCost {
    pub distance_km: f64,
    pub duration_min: f64,
}

/// Result of walking the candidates in their given order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Walk {
    pub cost: RouteCost,
    pub fallback_lookups: usize,
}

/// Walks `candidates` in snapshot order from `origin`, the naive order a
/// driver without the planner would follow.
pub fn baseline_walk<O>(
    origin: GeoPoint,
    candidates: &[Candidate<'_>],
    oracle: &ResilientOracle<O>,
    cancel: &CancellationToken,
) -> Result<Walk, RouteError>
where
    O: DistanceOracle,
{
    let mut walk = Walk::default();
    let mut current = origin;

    for candidate in candidates {
        cancel.check()?;
        let resolved = oracle.resolve(current, candidate.position);
        walk.cost.distance_km += resolved.leg.distance_km;
        walk.cost.duration_min += resolved.leg.duration_min;
        if resolved.is_fallback() {
            walk.fallback_lookups += 1;
        }
        current = candidate.position;
    }

    Ok(walk)
}

/// Derives fuel, CO₂, cost, time and efficiency savings.
pub fn compute_savings(
    baseline: RouteCost,
    optimized: RouteCost,
    stop_count: usize,
    model: &SavingsModel,
) -> Savings {
    let distance_saved = (baseline.distance_km - optimized.distance_km).max(0.0);
    let fuel_saved_l = distance_saved * model.fuel_consumption_l_per_km;

    let time_saved_min = match model.time_savings {
        TimeSavingsMode::PerStop => stop_count as f64 * model.per_stop_minutes,
        TimeSavingsMode::DurationDelta => (baseline.duration_min - optimized.duration_min).max(0.0),
    };

    let efficiency_gain_pct = if baseline.distance_km > 0.0 {
        (distance_saved / baseline.distance_km * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    Savings {
        fuel_saved_l,
        co2_saved_kg: fuel_saved_l * model.co2_kg_per_liter,
        cost_saved: fuel_saved_l * model.fuel_unit_cost,
        time_saved_min,
        efficiency_gain_pct,
    }
}
