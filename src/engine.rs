//! The optimize-route operation: select, sequence, measure, assemble.

use tracing::{info, instrument, warn};

use crate::cancel::CancellationToken;
use crate::config::PlannerConfig;
use crate::error::RouteError;
use crate::haversine::HaversineOracle;
use crate::history::RouteRecord;
use crate::metrics::{RouteCost, baseline_walk, compute_savings};
use crate::model::{ContainerSnapshot, Depot};
use crate::oracle::{OracleBackend, ResilientOracle};
use crate::route::{RouteResult, assemble};
use crate::selector::{clamp_threshold, select_candidates};
use crate::sequencer::{SequenceOptions, nearest_neighbor};
use crate::traits::{DistanceOracle, RouteHistory, TelemetrySource};

/// Stateless route optimizer. Holds only configuration and the oracle; every
/// call to [`RouteOptimizer::optimize`] is independent.
#[derive(Debug, Clone)]
pub struct RouteOptimizer<O = OracleBackend> {
    config: PlannerConfig,
    oracle: ResilientOracle<O>,
}

impl RouteOptimizer<OracleBackend> {
    /// Picks the remote or local oracle according to `use_remote_oracle`.
    pub fn from_config(config: PlannerConfig) -> Result<Self, RouteError> {
        config.validate()?;
        let backend = if config.use_remote_oracle {
            OracleBackend::remote(config.osrm.clone())?
        } else {
            OracleBackend::local(config.average_speed_kmh)
        };
        Self::with_oracle(config, backend)
    }
}

impl<O> RouteOptimizer<O>
where
    O: DistanceOracle + Sync,
{
    /// Uses `oracle` as the primary distance source, with the haversine
    /// formula as the per-edge fallback.
    pub fn with_oracle(config: PlannerConfig, oracle: O) -> Result<Self, RouteError> {
        config.validate()?;
        let fallback = HaversineOracle::new(config.average_speed_kmh);
        Ok(Self {
            oracle: ResilientOracle::new(oracle, fallback),
            config,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        self.oracle.primary()
    }

    /// Computes the collection route for the containers at or above the
    /// configured fill threshold, starting at `depot`.
    ///
    /// Returns a depot-only result when nothing qualifies. Fails only on an
    /// invalid depot or caller cancellation; oracle failures degrade
    /// individual edges to the haversine estimate.
    #[instrument(skip_all, fields(containers = snapshots.len(), depot = %depot.name))]
    pub fn optimize(
        &self,
        snapshots: &[ContainerSnapshot],
        depot: &Depot,
        cancel: &CancellationToken,
    ) -> Result<RouteResult, RouteError> {
        if !depot.position.is_valid() {
            return Err(RouteError::InvalidInput(format!(
                "depot '{}' has invalid coordinates {}",
                depot.name, depot.position
            )));
        }
        cancel.check()?;

        let threshold = clamp_threshold(self.config.fill_threshold);
        let selection = select_candidates(snapshots, threshold);

        if selection.is_empty() {
            info!(threshold, "no containers above threshold");
            return Ok(RouteResult::depot_only(depot, threshold, selection.warnings));
        }

        let options = SequenceOptions {
            parallel_lookups: self.config.parallel_lookups,
        };
        let sequence = nearest_neighbor(
            depot.position,
            &selection.candidates,
            &self.oracle,
            options,
            cancel,
        )?;
        let baseline = baseline_walk(depot.position, &selection.candidates, &self.oracle, cancel)?;

        let optimized = RouteCost {
            distance_km: sequence.distance_km(),
            duration_min: sequence.duration_min(),
        };
        let savings = compute_savings(
            baseline.cost,
            optimized,
            sequence.stops.len(),
            &self.config.savings_model(),
        );
        let fallback_lookups = sequence.fallback_lookups + baseline.fallback_lookups;

        info!(
            stops = sequence.stops.len(),
            distance_km = optimized.distance_km,
            baseline_km = baseline.cost.distance_km,
            efficiency_gain_pct = savings.efficiency_gain_pct,
            fallback_lookups,
            "route optimized"
        );

        Ok(assemble(
            depot,
            &sequence,
            savings,
            threshold,
            selection.warnings,
            fallback_lookups,
        ))
    }

    /// Like [`RouteOptimizer::optimize`], then hands the result to `history`.
    /// A history failure is logged and does not fail the call.
    pub fn optimize_and_record<H>(
        &self,
        snapshots: &[ContainerSnapshot],
        depot: &Depot,
        cancel: &CancellationToken,
        history: &H,
    ) -> Result<RouteResult, RouteError>
    where
        H: RouteHistory + ?Sized,
    {
        let result = self.optimize(snapshots, depot, cancel)?;
        if let Err(err) = history.record(RouteRecord::new(result.clone())) {
            warn!(error = %err, "failed to record route history");
        }
        Ok(result)
    }

    /// Pulls a fresh snapshot from `source` and optimizes it.
    pub fn optimize_source<S>(
        &self,
        source: &S,
        depot: &Depot,
        cancel: &CancellationToken,
    ) -> Result<RouteResult, RouteError>
    where
        S: TelemetrySource + ?Sized,
    {
        let snapshots = source
            .snapshot()
            .map_err(|err| RouteError::InvalidInput(format!("telemetry snapshot failed: {err}")))?;
        self.optimize(&snapshots, depot, cancel)
    }
}

/// One-shot optimization with the oracle chosen by `config`.
pub fn optimize_route(
    snapshots: &[ContainerSnapshot],
    depot: &Depot,
    config: PlannerConfig,
) -> Result<RouteResult, RouteError> {
    RouteOptimizer::from_config(config)?.optimize(snapshots, depot, &CancellationToken::new())
}
