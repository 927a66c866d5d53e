use crate::{error::GeocodeError, model::Coordinates};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod archive;
pub mod geocoding;
pub mod history;

pub use archive::ArchiveClient;
pub use geocoding::OpenMeteoGeocoder;
pub use history::HistoryClient;

/// The three upstream services this backend composes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upstream {
    Geocoding,
    Archive,
    History,
}

impl Upstream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Upstream::Geocoding => "geocoding",
            Upstream::Archive => "archive",
            Upstream::History => "history",
        }
    }

    /// Production endpoint used when the config does not override it.
    pub fn default_url(&self) -> &'static str {
        match self {
            Upstream::Geocoding => "https://geocoding-api.open-meteo.com/v1/search",
            Upstream::Archive => "https://archive-api.open-meteo.com/v1/archive",
            Upstream::History => "https://api.weatherapi.com/v1/history.json",
        }
    }

    pub const fn all() -> &'static [Upstream] {
        &[Upstream::Geocoding, Upstream::Archive, Upstream::History]
    }
}

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Upstream {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "geocoding" => Ok(Upstream::Geocoding),
            "archive" => Ok(Upstream::Archive),
            "history" => Ok(Upstream::History),
            _ => Err(anyhow::anyhow!(
                "Unknown upstream '{value}'. Supported upstreams: geocoding, archive, history."
            )),
        }
    }
}

/// Resolves a place name to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn resolve(&self, city: &str) -> Result<Coordinates, GeocodeError>;
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
