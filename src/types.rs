//! Input coordinates and the provider response shapes.
//!
//! Response structs keep any field they don't name in a flattened `extra` map,
//! so provider data passes through to callers unmodified.

use crate::errors::GatewayError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Most coordinates the optimization endpoint accepts in one request.
pub const MAX_OPTIMIZATION_COORDINATES: usize = 12;

/// Most coordinates the distances endpoint accepts in one request.
pub const MAX_MATRIX_COORDINATES: usize = 25;

/// Fewest coordinates a route or matrix request needs.
pub const MIN_COORDINATES: usize = 2;

/// A WGS84 position, longitude first.
///
/// Serializes as a `[longitude, latitude]` array, matching the provider's
/// `location` and `center` fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Checks that both components are finite and within WGS84 bounds.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] naming the offending component.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(GatewayError::Validation(format!(
                "longitude {} is outside [-180, 180]",
                self.longitude
            )));
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(GatewayError::Validation(format!(
                "latitude {} is outside [-90, 90]",
                self.latitude
            )));
        }
        Ok(())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((longitude, latitude): (f64, f64)) -> Self {
        Self::new(longitude, latitude)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self::new(longitude, latitude)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coordinate: Coordinate) -> Self {
        [coordinate.longitude, coordinate.latitude]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.longitude, self.latitude)
    }
}

/// Encodes coordinates as `lon,lat` pairs joined by `;`, in input order.
#[must_use]
pub fn encode_path(coordinates: &[Coordinate]) -> String {
    coordinates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

/// Validates a coordinate sequence for a multi-point request.
pub(crate) fn validate_coordinates(
    coordinates: &[Coordinate],
    max: usize,
) -> Result<(), GatewayError> {
    if coordinates.len() < MIN_COORDINATES {
        return Err(GatewayError::Validation(format!(
            "at least {MIN_COORDINATES} coordinates are required, got {}",
            coordinates.len()
        )));
    }
    if coordinates.len() > max {
        return Err(GatewayError::Validation(format!(
            "at most {max} coordinates are allowed, got {}",
            coordinates.len()
        )));
    }
    coordinates.iter().try_for_each(Coordinate::validate)
}

/// Validates free-text geocoding queries.
pub(crate) fn validate_locations<S: AsRef<str>>(locations: &[S]) -> Result<(), GatewayError> {
    if locations.is_empty() {
        return Err(GatewayError::Validation(
            "at least one location is required".to_string(),
        ));
    }
    if let Some(index) = locations
        .iter()
        .position(|location| location.as_ref().trim().is_empty())
    {
        return Err(GatewayError::Validation(format!(
            "location at index {index} is blank"
        )));
    }
    Ok(())
}

// --- Optimization ---

/// Response of the optimized-trips endpoint.
///
/// Fields the provider omits stay omitted when the value is serialized again.
/// A `NoTrips` or similar answer deserializes with empty `trips`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedTrips {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trips: Vec<Trip>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub waypoints: Vec<TripWaypoint>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One optimized trip through all waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// GeoJSON LineString of the whole trip.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub geometry: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legs: Vec<Value>,
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An input waypoint snapped to the road network, with its place in the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripWaypoint {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub location: Coordinate,
    /// Position of this waypoint in the optimized visiting order.
    pub waypoint_index: usize,
    pub trips_index: usize,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// --- Tilequery ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TilequeryResponse {
    pub features: Vec<TilequeryFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TilequeryFeature {
    #[serde(default)]
    pub properties: ContourProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct ContourProperties {
    /// Contour elevation in meters.
    #[serde(default)]
    pub ele: Option<f64>,
}

// --- Geocoding ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct GeocodeResponse {
    pub features: Vec<GeocodeFeature>,
}

/// Best provider match for one geocoding query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeFeature {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub place_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub geometry: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// --- Distances ---

/// Response of the distances endpoint, indexed `[source][destination]`.
///
/// Cells are `None` when the provider found no route between the pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    /// Meters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub distances: Vec<Vec<Option<f64>>>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub durations: Vec<Vec<Option<f64>>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destinations: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DistanceMatrix {
    #[must_use]
    pub fn distance(&self, source: usize, destination: usize) -> Option<f64> {
        self.distances.get(source)?.get(destination).copied().flatten()
    }

    #[must_use]
    pub fn duration(&self, source: usize, destination: usize) -> Option<f64> {
        self.durations.get(source)?.get(destination).copied().flatten()
    }
}
