//! History source trait and request/error types.
//!
//! A [`HistorySource`] turns a [`HistoryRequest`] (symbol + lookback period)
//! into a [`PriceSeries`] of daily closes. Implementations make at most one
//! upstream data call per request and never retry.
//!
//! ```rust,ignore
//! use ferrocast_core::{HistoryRequest, HistorySource, Period, Symbol, YahooAdapter};
//!
//! async fn latest(adapter: &YahooAdapter) -> Result<Option<f64>, ferrocast_core::SourceError> {
//!     let request = HistoryRequest::new(Symbol::parse("OGDC.KA")?, Period::FiveYears);
//!     let series = adapter.history(request).await?;
//!     Ok(series.last_close())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{Period, PriceSeries, Symbol, ValidationError};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    NotFound,
    Internal,
}

/// Structured source error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

impl From<ValidationError> for SourceError {
    fn from(error: ValidationError) -> Self {
        Self::internal(error.to_string())
    }
}

/// Request payload for daily history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub period: Period,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, period: Period) -> Self {
        Self { symbol, period }
    }
}

/// Daily history provider contract.
///
/// Implementations must be `Send + Sync`; a single instance is shared by
/// every in-flight HTTP request.
pub trait HistorySource: Send + Sync {
    /// Short provider name used in log fields.
    fn name(&self) -> &'static str;

    /// Fetches daily closes for the requested lookback window.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the provider is unreachable, does not know
    /// the symbol, or answers with a payload that cannot be parsed. An
    /// existing symbol with no rows in the window is an empty series, not an
    /// error.
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>>;
}
