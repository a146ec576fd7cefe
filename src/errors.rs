use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// The upstream operation a request belongs to.
///
/// Used to tag log events and to pick the narrowed error variant when an
/// upstream call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    RouteOptimization,
    ElevationLookup,
    Geocoding,
    DistanceMatrix,
}

impl Operation {
    /// Stable snake_case name used as the `operation` log field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RouteOptimization => "route_optimization",
            Self::ElevationLookup => "elevation_lookup",
            Self::Geocoding => "geocoding",
            Self::DistanceMatrix => "distance_matrix",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`Gateway`](crate::Gateway).
///
/// Upstream failures are narrowed to one variant per operation. Their messages
/// are stable and never include the provider's response body; the HTTP status
/// is kept as a structured field so callers can still branch on it.
///
/// # Example
///
/// ```ignore
/// match gateway.elevation(coordinate).await {
///     Err(GatewayError::ElevationLookup { status_code: Some(401) }) => {
///         tracing::error!("access token rejected");
///     }
///     Err(GatewayError::Validation(reason)) => {
///         tracing::warn!("bad coordinate: {reason}");
///     }
///     // ...
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// Missing or unusable configuration, surfaced at construction.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Caller input rejected before any network call.
    #[error("Invalid input: {0}")]
    Validation(String),
    /// Failed to build the HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
    #[error("Route optimization failed")]
    RouteOptimization { status_code: Option<u16> },
    #[error("Elevation lookup failed")]
    ElevationLookup { status_code: Option<u16> },
    #[error("Geocoding failed")]
    Geocoding { status_code: Option<u16> },
    #[error("Distance matrix request failed")]
    DistanceMatrix { status_code: Option<u16> },
}

impl GatewayError {
    /// Builds the narrowed error for `operation`, keeping only the upstream status.
    pub(crate) fn upstream(operation: Operation, cause: &TransportError) -> Self {
        let status_code = cause.status_code();
        match operation {
            Operation::RouteOptimization => Self::RouteOptimization { status_code },
            Operation::ElevationLookup => Self::ElevationLookup { status_code },
            Operation::Geocoding => Self::Geocoding { status_code },
            Operation::DistanceMatrix => Self::DistanceMatrix { status_code },
        }
    }

    /// Upstream HTTP status, if the failure came with one.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RouteOptimization { status_code }
            | Self::ElevationLookup { status_code }
            | Self::Geocoding { status_code }
            | Self::DistanceMatrix { status_code } => *status_code,
            Self::Configuration(_) | Self::Validation(_) | Self::ClientBuild(_) => None,
        }
    }

    /// The operation an upstream failure belongs to.
    #[must_use]
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::RouteOptimization { .. } => Some(Operation::RouteOptimization),
            Self::ElevationLookup { .. } => Some(Operation::ElevationLookup),
            Self::Geocoding { .. } => Some(Operation::Geocoding),
            Self::DistanceMatrix { .. } => Some(Operation::DistanceMatrix),
            Self::Configuration(_) | Self::Validation(_) | Self::ClientBuild(_) => None,
        }
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Failure of a single upstream exchange, before narrowing.
#[derive(Debug, Error)]
pub(crate) enum TransportError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error (HTTP {status_code}): {message}")]
    Api { status_code: u16, message: String },
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// The provider answered 2xx but the body did not have the expected shape.
    #[error("Malformed API response: {0}")]
    MalformedResponse(String),
}

impl TransportError {
    /// Returns `true` if the exchange may succeed when sent again.
    ///
    /// Network-level failures, timeouts, 429 and 5xx are transient. Every
    /// upstream call is a GET, so resending is always safe.
    pub(crate) fn is_retryable(&self) -> bool {
        match self {
            // A builder error means the URL itself is bad; resending won't fix it
            TransportError::Http(err) => !err.is_builder(),
            TransportError::Api { status_code, .. } => *status_code == 429 || *status_code >= 500,
            TransportError::Timeout(_) => true,
            TransportError::MalformedResponse(_) => false,
        }
    }

    pub(crate) fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::Http(err) => err.status().map(|status| status.as_u16()),
            TransportError::Api { status_code, .. } => Some(*status_code),
            TransportError::Timeout(_) | TransportError::MalformedResponse(_) => None,
        }
    }
}
