//! OSRM HTTP adapter for point-to-point travel legs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::GeoPoint;
use crate::oracle::{Leg, OracleError};
use crate::traits::DistanceOracle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    /// Per-request timeout. A lookup that exceeds it degrades to the local
    /// fallback for that edge.
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    fn route_url(&self, from: GeoPoint, to: GeoPoint) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=false&alternatives=false&steps=false",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            from.longitude,
            from.latitude,
            to.longitude,
            to.latitude,
        )
    }
}

impl DistanceOracle for OsrmClient {
    fn distance(&self, from: GeoPoint, to: GeoPoint) -> Result<Leg, OracleError> {
        let url = self.route_url(from, to);
        debug!(%url, "requesting OSRM route");

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmRouteResponse>())?;

        body.into_leg()
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
}

impl OsrmRouteResponse {
    fn into_leg(self) -> Result<Leg, OracleError> {
        if self.code != "Ok" {
            return Err(OracleError::NoRoute(
                self.message.unwrap_or(self.code),
            ));
        }

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| OracleError::NoRoute("empty route list".to_string()))?;

        Ok(Leg::new(route.distance / 1000.0, route.duration / 60.0))
    }
}
