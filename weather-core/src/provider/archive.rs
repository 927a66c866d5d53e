use chrono::{Datelike, Days, Local, NaiveDate};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    error::HistoricalError,
    model::{ArchiveRow, Coordinates},
};

use super::truncate_body;

/// Days sampled on each side of the anniversary date.
pub const WINDOW_HALF_WIDTH_DAYS: u64 = 15;

const HOURLY_VARIABLES: &str =
    "temperature_2m,surface_pressure,relative_humidity_2m,cloud_cover,wind_speed_10m,wind_direction_10m";

/// Open-Meteo historical archive client.
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    base_url: String,
    http: Client,
}

impl ArchiveClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), http }
    }

    /// Hourly rows for a ±15 day window around today's date, for each of the
    /// `years` years before the current one.
    pub async fn fetch_years(
        &self,
        years: i32,
        coords: Coordinates,
    ) -> Result<Vec<ArchiveRow>, HistoricalError> {
        self.fetch_years_from(years, coords, Local::now().date_naive()).await
    }

    /// Same as [`fetch_years`](Self::fetch_years) with an explicit "today".
    ///
    /// Requests are issued one day at a time, oldest first. A day answered with
    /// anything but 200 is skipped; any other failure aborts the whole fetch.
    pub async fn fetch_years_from(
        &self,
        years: i32,
        coords: Coordinates,
        today: NaiveDate,
    ) -> Result<Vec<ArchiveRow>, HistoricalError> {
        let mut all_rows = Vec::new();

        for year in today.year().saturating_sub(years.max(0))..today.year() {
            let (start, end) = anniversary_window(year, today)?;
            tracing::info!("Fetching data from {} to {} for year {}", start, end, year);

            for day in start.iter_days().take_while(|d| *d <= end) {
                match self.fetch_day(coords, day).await? {
                    Some(rows) => all_rows.extend(rows),
                    None => tracing::warn!("Failed to fetch data for {}", day),
                }
            }
        }

        tracing::info!("Weather data fetching complete! {} rows", all_rows.len());
        Ok(all_rows)
    }

    /// `Ok(None)` when the archive answers with anything but 200.
    async fn fetch_day(
        &self,
        coords: Coordinates,
        day: NaiveDate,
    ) -> Result<Option<Vec<ArchiveRow>>, HistoricalError> {
        let date = day.format("%Y-%m-%d").to_string();
        let latitude = coords.latitude.to_string();
        let longitude = coords.longitude.to_string();

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("start_date", date.as_str()),
                ("end_date", date.as_str()),
                ("hourly", HOURLY_VARIABLES),
                ("timezone", "auto"),
            ])
            .send()
            .await
            .map_err(|source| HistoricalError::Transport { date: date.clone(), source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| HistoricalError::Transport { date: date.clone(), source })?;

        if status != StatusCode::OK {
            tracing::debug!("Archive status {} for {}: {}", status, date, truncate_body(&body));
            return Ok(None);
        }

        let parsed: ArchiveResponse = serde_json::from_str(&body)
            .map_err(|source| HistoricalError::Decode { date: date.clone(), source })?;

        parsed.hourly.into_rows(&date).map(Some)
    }
}

/// Earliest calendar year a window may be anchored in.
pub const MIN_YEAR: i32 = 1;

/// First and last day of the sampling window for `year`, centred on today's
/// month and day. Fails when `year` is before [`MIN_YEAR`] or that month/day
/// does not exist in `year`.
pub fn anniversary_window(
    year: i32,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), HistoricalError> {
    if year < MIN_YEAR {
        return Err(HistoricalError::YearOutOfRange { year });
    }

    let invalid = || HistoricalError::InvalidDate { year, month: today.month(), day: today.day() };

    let anchor = NaiveDate::from_ymd_opt(year, today.month(), today.day()).ok_or_else(invalid)?;
    let width = Days::new(WINDOW_HALF_WIDTH_DAYS);
    let start = anchor.checked_sub_days(width).ok_or_else(invalid)?;
    let end = anchor.checked_add_days(width).ok_or_else(invalid)?;
    if start.year() < MIN_YEAR {
        return Err(HistoricalError::YearOutOfRange { year: start.year() });
    }

    Ok((start, end))
}

#[derive(Debug, Deserialize)]
struct ArchiveHourly {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    surface_pressure: Vec<Option<f64>>,
    relative_humidity_2m: Vec<Option<f64>>,
    cloud_cover: Vec<Option<f64>>,
    wind_speed_10m: Vec<Option<f64>>,
    wind_direction_10m: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    hourly: ArchiveHourly,
}

impl ArchiveHourly {
    fn into_rows(self, date: &str) -> Result<Vec<ArchiveRow>, HistoricalError> {
        let expected = self.time.len();
        let series = [
            ("temperature_2m", self.temperature_2m.len()),
            ("surface_pressure", self.surface_pressure.len()),
            ("relative_humidity_2m", self.relative_humidity_2m.len()),
            ("cloud_cover", self.cloud_cover.len()),
            ("wind_speed_10m", self.wind_speed_10m.len()),
            ("wind_direction_10m", self.wind_direction_10m.len()),
        ];
        if let Some((name, len)) = series.into_iter().find(|(_, len)| *len < expected) {
            return Err(HistoricalError::MisalignedSeries {
                date: date.to_string(),
                series: name,
                len,
                expected,
            });
        }

        let rows = self
            .time
            .into_iter()
            .enumerate()
            .map(|(i, time)| {
                ArchiveRow(
                    time,
                    self.temperature_2m[i],
                    self.surface_pressure[i],
                    self.relative_humidity_2m[i],
                    self.cloud_cover[i],
                    self.wind_speed_10m[i],
                    self.wind_direction_10m[i],
                )
            })
            .collect();

        Ok(rows)
    }
}
