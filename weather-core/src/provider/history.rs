use chrono::{Days, Local, NaiveDate};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Number;

use crate::{
    error::TransientFetchError,
    model::{RecentObservation, RecentOutcome},
};

use super::truncate_body;

/// WeatherAPI.com history client. Keyed by city name, authenticated with an API key.
#[derive(Debug, Clone)]
pub struct HistoryClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl HistoryClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: String) -> Self {
        Self { api_key, base_url: base_url.into(), http }
    }

    /// Hourly observations for the day before the server's local date.
    pub async fn fetch_last_24_hours(&self, city: &str) -> RecentOutcome {
        self.fetch_last_24_hours_from(city, Local::now().date_naive()).await
    }

    pub async fn fetch_last_24_hours_from(&self, city: &str, today: NaiveDate) -> RecentOutcome {
        let result = match today.checked_sub_days(Days::new(1)) {
            Some(yesterday) => self.fetch_day(city, yesterday).await,
            None => Ok(Vec::new()),
        };

        if let Err(e) = &result {
            tracing::warn!("Recent weather fetch for '{}' failed: {}", city, e);
        }

        result.into()
    }

    /// One day of hourly history, mapped field by field.
    pub async fn fetch_day(
        &self,
        city: &str,
        date: NaiveDate,
    ) -> Result<Vec<RecentObservation>, TransientFetchError> {
        let dt = date.format("%Y-%m-%d").to_string();

        let res = self
            .http
            .get(&self.base_url)
            .query(&[("key", self.api_key.as_str()), ("q", city), ("dt", dt.as_str())])
            .send()
            .await?;

        let status = res.status();
        if status != StatusCode::OK {
            let body = res.text().await.unwrap_or_default();
            tracing::debug!("WeatherAPI history body: {}", truncate_body(&body));
            return Err(TransientFetchError::Status(status.as_u16()));
        }

        let body = res.text().await?;
        let parsed: WaHistoryResponse = serde_json::from_str(&body)?;

        let day = parsed
            .forecast
            .forecastday
            .into_iter()
            .next()
            .ok_or(TransientFetchError::NoForecastDay)?;

        Ok(day.hour.into_iter().map(RecentObservation::from).collect())
    }
}

#[derive(Debug, Deserialize)]
struct WaHour {
    time: String,
    temp_c: f64,
    pressure_mb: f64,
    humidity: Number,
    cloud: Number,
    wind_kph: f64,
    wind_degree: Number,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    hour: Vec<WaHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaHistoryResponse {
    forecast: WaForecast,
}

impl From<WaHour> for RecentObservation {
    fn from(h: WaHour) -> Self {
        RecentObservation {
            dt: h.time,
            temp: h.temp_c,
            pressure: h.pressure_mb,
            humidity: h.humidity,
            clouds: h.cloud,
            wind_speed: h.wind_kph,
            wind_deg: h.wind_degree,
        }
    }
}
