//! Nearest-neighbour route sequencing.
//!
//! Starting at the depot, repeatedly drive to the closest remaining
//! candidate until none are left. The run is one-way: there is no leg back
//! to the depot. Each step costs one oracle lookup per remaining candidate,
//! so a full run is O(n²) lookups, which is fine for the tens of containers
//! a single truck collects.

use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::debug;

use crate::cancel::CancellationToken;
use crate::error::RouteError;
use crate::model::GeoPoint;
use crate::oracle::{Leg, ResilientOracle, ResolvedLeg};
use crate::selector::Candidate;
use crate::traits::DistanceOracle;

#[derive(Debug, Clone, Copy)]
pub struct SequenceOptions {
    /// Fan the lookups of one step out over the rayon pool.
    pub parallel_lookups: bool,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            parallel_lookups: true,
        }
    }
}

/// A visited candidate and the leg that reached it.
#[derive(Debug, Clone, Copy)]
pub struct Stop<'a> {
    pub candidate: Candidate<'a>,
    pub leg: Leg,
}

#[derive(Debug, Clone, Default)]
pub struct Sequence<'a> {
    pub stops: Vec<Stop<'a>>,
    /// Lookups (chosen or not) that degraded to the haversine fallback.
    pub fallback_lookups: usize,
}

impl Sequence<'_> {
    pub fn distance_km(&self) -> f64 {
        self.stops.iter().map(|stop| stop.leg.distance_km).sum()
    }

    pub fn duration_min(&self) -> f64 {
        self.stops.iter().map(|stop| stop.leg.duration_min).sum()
    }
}

/// Orders `candidates` by the nearest-neighbour heuristic from `origin`.
///
/// Distance ties go to the smaller container id, so the same input always
/// yields the same order. Every lookup of a step completes before the next
/// stop is chosen; steps themselves are strictly sequential because the
/// current position changes each time.
pub fn nearest_neighbor<'a, O>(
    origin: GeoPoint,
    candidates: &[Candidate<'a>],
    oracle: &ResilientOracle<O>,
    options: SequenceOptions,
    cancel: &CancellationToken,
) -> Result<Sequence<'a>, RouteError>
where
    O: DistanceOracle + Sync,
{
    let mut remaining = candidates.to_vec();
    let mut sequence = Sequence {
        stops: Vec::with_capacity(remaining.len()),
        fallback_lookups: 0,
    };
    let mut current = origin;

    while !remaining.is_empty() {
        cancel.check()?;

        let lookups = lookup_step(current, &remaining, oracle, options, cancel)
            .ok_or(RouteError::ComputationAborted)?;
        sequence.fallback_lookups += lookups.iter().filter(|l| l.is_fallback()).count();

        let best = nearest_index(&remaining, &lookups);
        let leg = lookups[best].leg;
        let candidate = remaining.swap_remove(best);

        debug!(
            step = sequence.stops.len() + 1,
            container = %candidate.container.id,
            distance_km = leg.distance_km,
            remaining = remaining.len(),
            "selected nearest container"
        );

        current = candidate.position;
        sequence.stops.push(Stop { candidate, leg });
    }

    Ok(sequence)
}

/// Resolves `from -> candidate` for every remaining candidate. Returns
/// `None` if cancellation was observed before all lookups were issued.
/// Lookups already running finish (or time out) before this returns.
fn lookup_step<'a, O>(
    from: GeoPoint,
    remaining: &[Candidate<'a>],
    oracle: &ResilientOracle<O>,
    options: SequenceOptions,
    cancel: &CancellationToken,
) -> Option<Vec<ResolvedLeg>>
where
    O: DistanceOracle + Sync,
{
    let lookup = |candidate: &Candidate<'a>| {
        if cancel.is_cancelled() {
            None
        } else {
            Some(oracle.resolve(from, candidate.position))
        }
    };

    if options.parallel_lookups && remaining.len() > 1 {
        remaining.par_iter().map(lookup).collect()
    } else {
        remaining.iter().map(lookup).collect()
    }
}

fn nearest_index(remaining: &[Candidate<'_>], lookups: &[ResolvedLeg]) -> usize {
    let order = |a: &usize, b: &usize| -> Ordering {
        lookups[*a]
            .leg
            .distance_km
            .total_cmp(&lookups[*b].leg.distance_km)
            .then_with(|| remaining[*a].container.id.cmp(&remaining[*b].container.id))
    };

    (0..remaining.len()).min_by(order).unwrap_or(0)
}
