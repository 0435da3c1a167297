//! Route handlers.

use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::response::{CurrentValueResponse, ForecastResponse};
use crate::AppState;

pub async fn current_value(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<CurrentValueResponse>, ApiError> {
    tracing::info!(ticker = %ticker, route = "current-value", "Fetching current value for ticker: {ticker}");

    state
        .pipeline
        .current_value(&ticker)
        .await
        .map(Json)
        .map_err(|err| log_failure(&ticker, "current-value", err))
}

pub async fn forecast(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<ForecastResponse>, ApiError> {
    tracing::info!(ticker = %ticker, route = "forecast", "Generating forecast for ticker: {ticker}");

    state
        .pipeline
        .forecast(&ticker)
        .await
        .map(Json)
        .map_err(|err| log_failure(&ticker, "forecast", err))
}

/// Liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn log_failure(ticker: &str, route: &'static str, err: ApiError) -> ApiError {
    tracing::error!(
        ticker,
        route,
        code = err.code(),
        status = err.status().as_u16(),
        error = %err,
        "request failed"
    );
    err
}
