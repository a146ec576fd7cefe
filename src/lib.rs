//! # mapbox-gateway
//!
//! A resilient async facade over four Mapbox APIs: trip optimization,
//! terrain elevation, batch forward geocoding and distance matrices.
//!
//! Every call goes through a per-instance retry policy (exponential backoff on
//! network errors, timeouts, 429 and 5xx) and every upstream failure is
//! narrowed to a stable, operation-specific [`GatewayError`]. Full upstream
//! detail is emitted through [`tracing`] events instead.
//!
//! ```no_run
//! use mapbox_gateway::{Coordinate, Gateway};
//!
//! # async fn example() -> Result<(), mapbox_gateway::GatewayError> {
//! let gateway = Gateway::from_env()?;
//!
//! let trip = gateway
//!     .optimize_route(&[
//!         Coordinate::new(2.3522, 48.8566),
//!         Coordinate::new(4.8357, 45.764),
//!     ])
//!     .await?;
//! println!("{} trip(s)", trip.trips.len());
//!
//! let matches = gateway.geocode_batch(&["Paris", "Lyon"]).await?;
//! for found in matches.iter().flatten() {
//!     println!("{}", found.place_name);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod errors;
pub(crate) mod http;
mod types;


pub use client::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_ELEVATION, DEFAULT_TIMEOUT, Gateway, GatewayBuilder,
};
pub use config::{
    ACCESS_TOKEN_ENV, BASE_URL_ENV, GatewayConfig, MAX_RETRIES_ENV, TIMEOUT_SECS_ENV,
};
pub use errors::{GatewayError, Operation};
pub use http::RetryPolicy;
pub use types::{
    Coordinate, DistanceMatrix, GeocodeFeature, MAX_MATRIX_COORDINATES,
    MAX_OPTIMIZATION_COORDINATES, MIN_COORDINATES, OptimizedTrips, Trip, TripWaypoint,
    encode_path,
};
