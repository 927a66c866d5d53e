use thiserror::Error;

/// Failure to turn a city name into coordinates.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Invalid city name!")]
    InvalidCity,

    #[error("Failed to fetch geocoding data.")]
    UpstreamUnavailable { status: u16 },

    #[error("geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse geocoding JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure inside the yesterday fetch. Always absorbed into a tagged result.
#[derive(Debug, Error)]
pub enum TransientFetchError {
    #[error("Failed to fetch data. Status code: {0}")]
    Status(u16),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    #[error("history response contained no forecastday data")]
    NoForecastDay,
}

/// Failure inside the multi-year archive loop. Aborts the whole fetch.
#[derive(Debug, Error)]
pub enum HistoricalError {
    #[error("day is out of range for month: {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("year {year} is out of range")]
    YearOutOfRange { year: i32 },

    #[error("archive request for {date} failed: {source}")]
    Transport {
        date: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse archive JSON for {date}: {source}")]
    Decode {
        date: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("archive series '{series}' for {date} has {len} values, expected {expected}")]
    MisalignedSeries { date: String, series: &'static str, len: usize, expected: usize },
}

/// Anything escaping the geocode + archive path. Rendered as an HTTP 500.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error("Error fetching weather data: {0}")]
    Historical(#[from] HistoricalError),
}
