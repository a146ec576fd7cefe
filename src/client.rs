use crate::config::GatewayConfig;
use crate::errors::{GatewayError, Operation, TransportError};
use crate::http::RetryPolicy;
use crate::http::common::{DEFAULT_BASE_URL, Endpoint};
use crate::http::transport::Transport;
use crate::types::{
    Coordinate, DistanceMatrix, GeocodeFeature, GeocodeResponse, MAX_MATRIX_COORDINATES,
    MAX_OPTIMIZATION_COORDINATES, OptimizedTrips, TilequeryResponse, validate_coordinates,
    validate_locations,
};
use futures_util::future::{join_all, try_join_all};
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::{error, info, warn};

/// Default deadline for one upstream exchange, independent of retries.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default deadline for establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Elevation reported when the provider has no contour at a coordinate.
pub const DEFAULT_ELEVATION: f64 = 0.0;

/// Facade over the Mapbox optimization, tilequery, geocoding and distances APIs.
///
/// Each operation validates its input, performs its upstream exchanges through
/// a retry-aware transport, and narrows any upstream failure to one
/// operation-specific [`GatewayError`]. The gateway holds no per-call state, so
/// a single instance can serve concurrent calls; clones share one connection
/// pool.
#[derive(Debug, Clone)]
pub struct Gateway {
    transport: Transport,
}

/// Builder for `Gateway` instances.
///
/// # Example
///
/// ```
/// use mapbox_gateway::{Gateway, RetryPolicy};
/// use std::time::Duration;
///
/// let gateway = Gateway::builder("pk.my-token")
///     .timeout(Duration::from_secs(20))
///     .retry_policy(RetryPolicy::default().with_max_retries(2))
///     .build()
///     .expect("token is set");
/// ```
#[derive(Debug)]
pub struct GatewayBuilder {
    access_token: String,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    retry_policy: Option<RetryPolicy>,
}

impl GatewayBuilder {
    /// Overrides the API host. Defaults to `https://api.mapbox.com`.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the deadline for one upstream exchange.
    ///
    /// Each retry gets a fresh deadline. Defaults to [`DEFAULT_TIMEOUT`].
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout. Defaults to [`DEFAULT_CONNECT_TIMEOUT`].
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the retry policy for this gateway only.
    #[must_use]
    pub const fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Builds the `Gateway`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if the access token is empty, or
    /// [`GatewayError::ClientBuild`] if the HTTP client cannot be created.
    pub fn build(self) -> Result<Gateway, GatewayError> {
        let access_token = self.access_token.trim();
        if access_token.is_empty() {
            return Err(GatewayError::Configuration(
                "access token must not be empty".to_string(),
            ));
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let connect_timeout = self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        let http_client = ReqwestClient::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| GatewayError::ClientBuild(e.to_string()))?;

        let transport = Transport::new(
            http_client,
            self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            access_token.to_string(),
            self.retry_policy.unwrap_or_default(),
            timeout,
            connect_timeout,
        );

        Ok(Gateway { transport })
    }
}

impl Gateway {
    /// Creates a new builder for `Gateway` instances.
    #[must_use]
    pub fn builder(access_token: impl Into<String>) -> GatewayBuilder {
        GatewayBuilder {
            access_token: access_token.into(),
            base_url: None,
            timeout: None,
            connect_timeout: None,
            retry_policy: None,
        }
    }

    /// Creates a gateway with default settings.
    ///
    /// # Errors
    ///
    /// See [`GatewayBuilder::build`].
    pub fn new(access_token: impl Into<String>) -> Result<Self, GatewayError> {
        Self::builder(access_token).build()
    }

    /// Creates a gateway from `MAPBOX_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if `MAPBOX_ACCESS_TOKEN` is missing.
    pub fn from_env() -> Result<Self, GatewayError> {
        GatewayConfig::from_env()?.into_gateway()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        self.transport.retry_policy()
    }

    /// Computes an optimized driving trip through `waypoints`.
    ///
    /// Coordinates are sent in input order; the provider decides the visiting
    /// order and reports it through each waypoint's `waypoint_index`.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] for fewer than 2 or more than 12
    ///   waypoints, or an out-of-range coordinate
    /// - [`GatewayError::RouteOptimization`] if the upstream call fails
    pub async fn optimize_route(
        &self,
        waypoints: &[Coordinate],
    ) -> Result<OptimizedTrips, GatewayError> {
        let operation = Operation::RouteOptimization;
        validate_coordinates(waypoints, MAX_OPTIMIZATION_COORDINATES)?;

        let endpoint = Endpoint::OptimizedTrips {
            coordinates: waypoints,
        };
        let trips: OptimizedTrips = self
            .transport
            .get_json(operation, &endpoint)
            .await
            .map_err(|err| upstream_failure(operation, waypoints.len(), &err))?;

        info!(
            operation = %operation,
            input_count = waypoints.len(),
            trip_count = trips.trips.len(),
            "route optimized"
        );
        Ok(trips)
    }

    /// Looks up the contour elevation in meters at `coordinate`.
    ///
    /// A coordinate with no contour feature is not an error: it yields
    /// [`DEFAULT_ELEVATION`] and a warning is logged.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] for an out-of-range coordinate
    /// - [`GatewayError::ElevationLookup`] if the upstream call fails
    pub async fn elevation(&self, coordinate: Coordinate) -> Result<f64, GatewayError> {
        let operation = Operation::ElevationLookup;
        coordinate.validate()?;

        let endpoint = Endpoint::Tilequery { coordinate };
        let response: TilequeryResponse = self
            .transport
            .get_json(operation, &endpoint)
            .await
            .map_err(|err| upstream_failure(operation, 1, &err))?;

        let elevation = response
            .features
            .first()
            .and_then(|feature| feature.properties.ele);

        match elevation {
            Some(elevation) => {
                info!(operation = %operation, %coordinate, elevation, "elevation resolved");
                Ok(elevation)
            }
            None => {
                warn!(
                    operation = %operation,
                    %coordinate,
                    feature_count = response.features.len(),
                    default = DEFAULT_ELEVATION,
                    "no contour elevation found, using default"
                );
                Ok(DEFAULT_ELEVATION)
            }
        }
    }

    /// Geocodes every location concurrently, keeping the best match for each.
    ///
    /// The result is positionally aligned with `locations`; a location the
    /// provider could not match yields `None`. If any single lookup fails
    /// after its retries, the whole batch fails and no partial result is
    /// returned. See [`Gateway::geocode_batch_settled`] for per-item outcomes.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] for an empty list or a blank location
    /// - [`GatewayError::Geocoding`] if any upstream call fails
    pub async fn geocode_batch<S: AsRef<str>>(
        &self,
        locations: &[S],
    ) -> Result<Vec<Option<GeocodeFeature>>, GatewayError> {
        let operation = Operation::Geocoding;
        validate_locations(locations)?;

        let lookups = locations
            .iter()
            .map(|location| self.geocode_one(location.as_ref()));
        let results = try_join_all(lookups)
            .await
            .map_err(|err| upstream_failure(operation, locations.len(), &err))?;

        info!(
            operation = %operation,
            input_count = locations.len(),
            matched_count = results.iter().filter(|result| result.is_some()).count(),
            "locations geocoded"
        );
        Ok(results)
    }

    /// Geocodes every location concurrently, reporting each outcome separately.
    ///
    /// Unlike [`Gateway::geocode_batch`], a failed lookup does not discard the
    /// others: its slot holds a [`GatewayError::Geocoding`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for an empty list or a blank location.
    pub async fn geocode_batch_settled<S: AsRef<str>>(
        &self,
        locations: &[S],
    ) -> Result<Vec<Result<Option<GeocodeFeature>, GatewayError>>, GatewayError> {
        let operation = Operation::Geocoding;
        validate_locations(locations)?;

        let lookups = locations
            .iter()
            .map(|location| self.geocode_one(location.as_ref()));
        let outcomes: Vec<_> = join_all(lookups)
            .await
            .into_iter()
            .map(|outcome| outcome.map_err(|err| upstream_failure(operation, 1, &err)))
            .collect();

        info!(
            operation = %operation,
            input_count = locations.len(),
            failed_count = outcomes.iter().filter(|outcome| outcome.is_err()).count(),
            "locations geocoded"
        );
        Ok(outcomes)
    }

    async fn geocode_one(&self, query: &str) -> Result<Option<GeocodeFeature>, TransportError> {
        let endpoint = Endpoint::Geocoding { query };
        let response: GeocodeResponse = self
            .transport
            .get_json(Operation::Geocoding, &endpoint)
            .await?;
        Ok(response.features.into_iter().next())
    }

    /// Fetches driving distance and duration matrices between all `points`.
    ///
    /// Every point is both a source and a destination, in input order.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] for fewer than 2 or more than 25 points,
    ///   or an out-of-range coordinate
    /// - [`GatewayError::DistanceMatrix`] if the upstream call fails
    pub async fn distance_matrix(
        &self,
        points: &[Coordinate],
    ) -> Result<DistanceMatrix, GatewayError> {
        let operation = Operation::DistanceMatrix;
        validate_coordinates(points, MAX_MATRIX_COORDINATES)?;

        let endpoint = Endpoint::Distances {
            coordinates: points,
        };
        let matrix: DistanceMatrix = self
            .transport
            .get_json(operation, &endpoint)
            .await
            .map_err(|err| upstream_failure(operation, points.len(), &err))?;

        info!(
            operation = %operation,
            input_count = points.len(),
            rows = matrix.distances.len(),
            "distance matrix fetched"
        );
        Ok(matrix)
    }
}

/// Logs the full upstream cause, then narrows it for the caller.
fn upstream_failure(
    operation: Operation,
    input_count: usize,
    err: &TransportError,
) -> GatewayError {
    error!(
        operation = %operation,
        input_count,
        status_code = ?err.status_code(),
        error = %err,
        "upstream request failed"
    );
    GatewayError::upstream(operation, err)
}
