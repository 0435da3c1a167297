use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::response::ErrorBody;

/// Request failures, mapped to HTTP status codes at the handler boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Provider returned nothing or failed; also used for tickers that
    /// cannot form a provider symbol.
    #[error("Invalid ticker symbol: {ticker}")]
    DataUnavailable { ticker: String },

    #[error("Failed to fit forecasting model")]
    ModelFit,

    #[error("Failed to generate forecast")]
    Forecast,

    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn data_unavailable(ticker: impl Into<String>) -> Self {
        Self::DataUnavailable {
            ticker: ticker.into(),
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::DataUnavailable { .. } => StatusCode::BAD_REQUEST,
            Self::ModelFit | Self::Forecast | Self::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code for log events.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DataUnavailable { .. } => "api.data_unavailable",
            Self::ModelFit => "api.model_fit",
            Self::Forecast => "api.forecast",
            Self::Unexpected(_) => "api.unexpected",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
