//! HTTP front end for the weather history backend.

pub mod routes;

pub use routes::{ApiError, AppState, ErrorBody, create_router, run_http_server};

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
