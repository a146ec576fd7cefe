use crate::types::{Coordinate, encode_path};

// --- URL Construction ---
pub const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";

/// Query parameter carrying the access token.
///
/// The token is appended by [`authorize`] at send time only, so URLs built by
/// [`construct_endpoint_url`] are safe to log.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

const ROUTING_PROFILE: &str = "mapbox/driving";
const TERRAIN_TILESET: &str = "mapbox.mapbox-terrain-v2";
const GEOCODING_DATASET: &str = "mapbox.places-permanent";

/// Upstream endpoints, one per gateway operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint<'a> {
    /// Optimization API v1
    OptimizedTrips { coordinates: &'a [Coordinate] },
    /// Tilequery against the terrain contour layer
    Tilequery { coordinate: Coordinate },
    /// Forward geocoding of one free-text query
    Geocoding { query: &'a str },
    /// Distances API v1
    Distances { coordinates: &'a [Coordinate] },
}

impl Endpoint<'_> {
    fn to_path(&self) -> String {
        match self {
            Self::OptimizedTrips { coordinates } => format!(
                "/optimized-trips/v1/{ROUTING_PROFILE}/{}",
                encode_path(coordinates)
            ),
            Self::Tilequery { coordinate } => {
                format!("/v4/{TERRAIN_TILESET}/tilequery/{coordinate}.json")
            }
            Self::Geocoding { .. } => format!("/geocoding/v5/{GEOCODING_DATASET}"),
            Self::Distances { coordinates } => format!(
                "/distances/v1/{ROUTING_PROFILE}/{}",
                encode_path(coordinates)
            ),
        }
    }

    /// Endpoint-specific query parameters, excluding the access token.
    fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::OptimizedTrips { .. } => vec![("geometries", "geojson".to_string())],
            Self::Tilequery { .. } => vec![
                ("layers", "contour".to_string()),
                ("limit", "1".to_string()),
            ],
            Self::Geocoding { query } => {
                vec![("q", (*query).to_string()), ("limit", "1".to_string())]
            }
            Self::Distances { .. } => vec![("annotations", "duration,distance".to_string())],
        }
    }
}

/// Constructs the URL for an endpoint under `base_url`, without credentials.
#[must_use]
pub fn construct_endpoint_url(base_url: &str, endpoint: &Endpoint<'_>) -> String {
    let base = base_url.trim_end_matches('/');
    let path = endpoint.to_path();
    let query_string = endpoint
        .query_params()
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    if query_string.is_empty() {
        format!("{base}{path}")
    } else {
        format!("{base}{path}?{query_string}")
    }
}

/// Appends the access token to a URL built by [`construct_endpoint_url`].
#[must_use]
pub fn authorize(url: &str, access_token: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!(
        "{url}{separator}{ACCESS_TOKEN_PARAM}={}",
        urlencoding::encode(access_token)
    )
}
