//! # Ferrocast Web
//!
//! axum service exposing the current price and a six-month forecast for
//! exchange-listed tickers.
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | GET | `/current-value/:ticker` | `{"currentPrice": number}` |
//! | GET | `/forecast/:ticker` | current price, forecast rows, history, flat forecast arrays |
//! | GET | `/health` | `{"status": "alive", "version": ...}` |
//!
//! Failures are `{"error": string}` with status 400 (no data for the
//! ticker) or 500 (model fit, forecast, or unexpected failures).

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod response;
pub mod routes;
pub mod shutdown;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::{Cli, ForecastSettings, EXCHANGE_SUFFIX};
pub use error::ApiError;
pub use logging::{LogFormat, LogHandle};
pub use pipeline::ForecastPipeline;
pub use response::{CurrentValueResponse, ErrorBody, ForecastEntry, ForecastResponse};

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: ForecastPipeline,
}

impl AppState {
    pub fn new(pipeline: ForecastPipeline) -> Self {
        Self { pipeline }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/current-value/:ticker", get(routes::current_value))
        .route("/forecast/:ticker", get(routes::forecast))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
