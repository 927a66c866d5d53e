//! HTTP surface: `/get_data/{city}/{years}` and `/yesterday_data/{city}`.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::{any::Any, sync::Arc};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
};
use weather_core::{ArchiveRow, Envelope, RecentOutcome, ServiceError, WeatherService};

/// Shared state for HTTP handlers
pub type AppState = Arc<WeatherService>;

/// Body of every 500 response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Any failure that escapes a handler. Always rendered as a 500.
#[derive(Debug)]
pub struct ApiError(String);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Unexpected error: {}", self.0);
        let body = ErrorBody { detail: format!("Unexpected error: {}", self.0) };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// GET /get_data/{city}/{years}
async fn get_data(
    State(service): State<AppState>,
    Path((city, years)): Path<(String, i32)>,
) -> Result<Json<Envelope<Vec<ArchiveRow>>>, ApiError> {
    let envelope = service.get_data(&city, years).await?;
    Ok(Json(envelope))
}

/// GET /yesterday_data/{city}
async fn yesterday_data(
    State(service): State<AppState>,
    Path(city): Path<String>,
) -> Json<Envelope<RecentOutcome>> {
    Json(service.yesterday_data(&city).await)
}

/// GET /health
async fn health_check() -> &'static str {
    "ok"
}

/// Turns a handler panic into the same 500 body as a returned error.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "handler panicked".to_string()
    };

    ApiError(message).into_response()
}

/// Create the HTTP router
pub fn create_router(service: AppState) -> Router {
    // Origins and headers are mirrored so credentials stay allowed for every caller.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/health", get(health_check))
        .route("/get_data/{city}/{years}", get(get_data))
        .route("/yesterday_data/{city}", get(yesterday_data))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .with_state(service)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn run_http_server(service: WeatherService, addr: &str) -> anyhow::Result<()> {
    let app = create_router(Arc::new(service));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
