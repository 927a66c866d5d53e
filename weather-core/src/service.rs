//! Request composition behind the two HTTP endpoints.

use chrono::{Local, NaiveDate};
use reqwest::Client;

use crate::{
    Config,
    error::ServiceError,
    model::{ArchiveRow, Envelope, RecentOutcome},
    provider::{ArchiveClient, Geocoder, HistoryClient, OpenMeteoGeocoder, Upstream},
};

#[derive(Debug)]
pub struct WeatherService {
    geocoder: Box<dyn Geocoder>,
    archive: ArchiveClient,
    history: HistoryClient,
}

impl WeatherService {
    pub fn new(geocoder: Box<dyn Geocoder>, archive: ArchiveClient, history: HistoryClient) -> Self {
        Self { geocoder, archive, history }
    }

    /// Build all three upstream clients from config, sharing one HTTP client.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.require_api_key()?.to_owned();
        let http = Client::new();

        Ok(Self::new(
            Box::new(OpenMeteoGeocoder::new(http.clone(), config.endpoint(Upstream::Geocoding))),
            ArchiveClient::new(http.clone(), config.endpoint(Upstream::Archive)),
            HistoryClient::new(http, config.endpoint(Upstream::History), api_key),
        ))
    }

    /// Geocode `city`, then pull `years` years of archive windows around today.
    pub async fn get_data(
        &self,
        city: &str,
        years: i32,
    ) -> Result<Envelope<Vec<ArchiveRow>>, ServiceError> {
        self.get_data_from(city, years, Local::now().date_naive()).await
    }

    pub async fn get_data_from(
        &self,
        city: &str,
        years: i32,
        today: NaiveDate,
    ) -> Result<Envelope<Vec<ArchiveRow>>, ServiceError> {
        let coords = self.geocoder.resolve(city).await?;
        let rows = self.archive.fetch_years_from(years, coords, today).await?;
        Ok(Envelope::success(rows))
    }

    /// Always a success envelope; upstream failures show up in the inner status.
    pub async fn yesterday_data(&self, city: &str) -> Envelope<RecentOutcome> {
        Envelope::success(self.history.fetch_last_24_hours(city).await)
    }

    pub async fn yesterday_data_from(&self, city: &str, today: NaiveDate) -> Envelope<RecentOutcome> {
        Envelope::success(self.history.fetch_last_24_hours_from(city, today).await)
    }
}
