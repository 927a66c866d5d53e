use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A resolved location, as returned by the geocoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One hour of yesterday's weather, renamed from the history API fields.
///
/// `humidity`, `clouds` and `wind_deg` keep the upstream number as sent,
/// integer or float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentObservation {
    pub dt: String,
    pub temp: f64,
    pub pressure: f64,
    pub humidity: Number,
    pub clouds: Number,
    pub wind_speed: f64,
    pub wind_deg: Number,
}

/// One hour of archived weather, serialized positionally:
/// `[time, temperature_2m, surface_pressure, relative_humidity_2m, cloud_cover,
/// wind_speed_10m, wind_direction_10m]`.
///
/// Values are `None` where the archive has a gap for that hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveRow(
    pub String,
    pub Option<f64>,
    pub Option<f64>,
    pub Option<f64>,
    pub Option<f64>,
    pub Option<f64>,
    pub Option<f64>,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Tagged result of the yesterday fetch. Never raised, always returned as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RecentOutcome {
    Success { data: Vec<RecentObservation> },
    Error { message: String },
}

impl RecentOutcome {
    pub fn status(&self) -> Status {
        match self {
            RecentOutcome::Success { .. } => Status::Success,
            RecentOutcome::Error { .. } => Status::Error,
        }
    }
}

impl<E: std::fmt::Display> From<Result<Vec<RecentObservation>, E>> for RecentOutcome {
    fn from(result: Result<Vec<RecentObservation>, E>) -> Self {
        match result {
            Ok(data) => RecentOutcome::Success { data },
            Err(e) => RecentOutcome::Error { message: e.to_string() },
        }
    }
}

/// Outer response body of both endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: Status,
    pub predictions: T,
}

impl<T> Envelope<T> {
    pub fn success(predictions: T) -> Self {
        Self { status: Status::Success, predictions }
    }
}
