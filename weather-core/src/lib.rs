//! Core library for the weather history backend.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Clients for the geocoding, archive and history upstreams
//! - Shared domain models (observations, envelopes) and error kinds
//! - [`WeatherService`], which composes the clients for each endpoint
//!
//! It is used by `weather-server`, but carries no HTTP server code itself.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;

pub use config::Config;
pub use error::{GeocodeError, HistoricalError, ServiceError, TransientFetchError};
pub use model::{ArchiveRow, Coordinates, Envelope, RecentObservation, RecentOutcome, Status};
pub use provider::{Geocoder, Upstream};
pub use service::WeatherService;
