//! Planner configuration: defaults, optional TOML file, environment overrides.

use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::haversine::DEFAULT_SPEED_KMH;
use crate::metrics::{SavingsModel, TimeSavingsMode};
use crate::model::Depot;
use crate::osrm::OsrmConfig;
use crate::selector::DEFAULT_FILL_THRESHOLD;

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "ROUTE_PLANNER_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value {value:?} for {key}")]
    Env { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Minimum fill level (percent) for a container to be collected.
    pub fill_threshold: f64,
    pub fuel_consumption_l_per_km: f64,
    pub co2_kg_per_liter: f64,
    pub fuel_unit_cost: f64,
    pub per_stop_minutes: f64,
    pub time_savings: TimeSavingsMode,
    /// Use the OSRM service as primary oracle instead of the haversine formula.
    pub use_remote_oracle: bool,
    pub parallel_lookups: bool,
    /// Speed used to turn haversine distances into durations.
    pub average_speed_kmh: f64,
    pub osrm: OsrmConfig,
    pub depot: Depot,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        let savings = SavingsModel::default();
        Self {
            fill_threshold: DEFAULT_FILL_THRESHOLD,
            fuel_consumption_l_per_km: savings.fuel_consumption_l_per_km,
            co2_kg_per_liter: savings.co2_kg_per_liter,
            fuel_unit_cost: savings.fuel_unit_cost,
            per_stop_minutes: savings.per_stop_minutes,
            time_savings: savings.time_savings,
            use_remote_oracle: false,
            parallel_lookups: true,
            average_speed_kmh: DEFAULT_SPEED_KMH,
            osrm: OsrmConfig::default(),
            depot: Depot::default(),
        }
    }
}

impl PlannerConfig {
    /// Defaults, then the TOML file at `path` if given, then `ROUTE_PLANNER_*`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_toml_str(&fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `ROUTE_PLANNER_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        override_parsed(&get, "FILL_THRESHOLD", &mut self.fill_threshold)?;
        override_parsed(&get, "FUEL_CONSUMPTION_L_PER_KM", &mut self.fuel_consumption_l_per_km)?;
        override_parsed(&get, "CO2_KG_PER_LITER", &mut self.co2_kg_per_liter)?;
        override_parsed(&get, "FUEL_UNIT_COST", &mut self.fuel_unit_cost)?;
        override_parsed(&get, "PER_STOP_MINUTES", &mut self.per_stop_minutes)?;
        override_parsed(&get, "USE_REMOTE_ORACLE", &mut self.use_remote_oracle)?;
        override_parsed(&get, "PARALLEL_LOOKUPS", &mut self.parallel_lookups)?;
        override_parsed(&get, "AVERAGE_SPEED_KMH", &mut self.average_speed_kmh)?;
        override_parsed(&get, "OSRM_TIMEOUT_SECS", &mut self.osrm.timeout_secs)?;

        if let Some(url) = get("OSRM_URL") {
            self.osrm.base_url = url;
        }
        if let Some(profile) = get("OSRM_PROFILE") {
            self.osrm.profile = profile;
        }
        if let Some(mode) = get("TIME_SAVINGS") {
            self.time_savings = match mode.trim() {
                "per_stop" => TimeSavingsMode::PerStop,
                "duration_delta" => TimeSavingsMode::DurationDelta,
                _ => {
                    return Err(ConfigError::Env {
                        key: format!("{ENV_PREFIX}TIME_SAVINGS"),
                        value: mode,
                    });
                }
            };
        }

        Ok(())
    }

    /// Rejects constants that would make the savings or durations meaningless.
    /// The fill threshold is not checked: it is clamped at selection time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("fuel_consumption_l_per_km", self.fuel_consumption_l_per_km),
            ("co2_kg_per_liter", self.co2_kg_per_liter),
            ("fuel_unit_cost", self.fuel_unit_cost),
            ("per_stop_minutes", self.per_stop_minutes),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }

        if !self.average_speed_kmh.is_finite() || self.average_speed_kmh <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "average_speed_kmh must be positive (got {})",
                self.average_speed_kmh
            )));
        }

        if self.use_remote_oracle && self.osrm.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "osrm.base_url is required when use_remote_oracle is set".to_string(),
            ));
        }

        Ok(())
    }

    pub fn savings_model(&self) -> SavingsModel {
        SavingsModel {
            fuel_consumption_l_per_km: self.fuel_consumption_l_per_km,
            co2_kg_per_liter: self.co2_kg_per_liter,
            fuel_unit_cost: self.fuel_unit_cost,
            per_stop_minutes: self.per_stop_minutes,
            time_savings: self.time_savings,
        }
    }
}

fn override_parsed<T, G>(get: &G, name: &str, target: &mut T) -> Result<(), ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    if let Some(value) = get(name) {
        *target = value.trim().parse().map_err(|_| ConfigError::Env {
            key: format!("{ENV_PREFIX}{name}"),
            value,
        })?;
    }
    Ok(())
}
