use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{error::GeocodeError, model::Coordinates};

use super::{Geocoder, truncate_body};

/// Open-Meteo city search, asking for the single best match.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    base_url: String,
    http: Client,
}

impl OpenMeteoGeocoder {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), http }
    }
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Vec<GeoResult>,
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn resolve(&self, city: &str) -> Result<Coordinates, GeocodeError> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&[("name", city), ("count", "1")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status != StatusCode::OK {
            tracing::warn!(
                "Geocoding request for '{}' failed with status {}: {}",
                city,
                status,
                truncate_body(&body)
            );
            return Err(GeocodeError::UpstreamUnavailable { status: status.as_u16() });
        }

        let parsed: GeoResponse = serde_json::from_str(&body)?;

        let first = parsed.results.first().ok_or(GeocodeError::InvalidCity)?;
        tracing::debug!("Geocoded '{}' to ({}, {})", city, first.latitude, first.longitude);

        Ok(Coordinates { latitude: first.latitude, longitude: first.longitude })
    }
}
