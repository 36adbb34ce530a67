//! collection-route-planner
//!
//! Plans the collection run of a waste truck: picks the containers whose
//! latest fill level crosses a threshold, orders them by nearest neighbour
//! from the depot, and reports the savings over visiting them unsorted.

pub mod cancel;
pub mod config;
pub mod engine;
pub mod error;
pub mod haversine;
pub mod history;
pub mod metrics;
pub mod model;
pub mod oracle;
pub mod osrm;
pub mod route;
pub mod selector;
pub mod sequencer;
pub mod telemetry;
pub mod traits;

pub use cancel::CancellationToken;
pub use config::PlannerConfig;
pub use engine::{RouteOptimizer, optimize_route};
pub use error::RouteError;
pub use model::{Container, ContainerId, ContainerSnapshot, Depot, GeoPoint, Reading};
pub use route::{RoutePoint, RouteResult};
pub use traits::{DistanceOracle, RouteHistory, TelemetrySource};
