//! # Ferrocast Core
//!
//! Domain types and market data plumbing for the ferrocast forecast service.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | History providers (Yahoo chart API) |
//! | [`data_source`] | History source trait and request/error types |
//! | [`domain`] | Domain models (Symbol, Period, PriceSeries, MonthlySeries) |
//! | [`error`] | Validation errors |
//! | [`fetcher`] | Market data fetcher (`Option`-returning, logs failures) |
//! | [`http_client`] | HTTP transport abstraction |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ferrocast_core::{Period, PriceFetcher, Symbol, YahooAdapter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = PriceFetcher::new(Arc::new(YahooAdapter::default()));
//!     let symbol = Symbol::ticker("OGDC")?.with_suffix(".KA")?;
//!
//!     if let Some(series) = fetcher.fetch(&symbol, Period::FiveYears).await {
//!         println!("{symbol} last close: {:?}", series.last_close());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  PriceFetcher   │  Option<PriceSeries>, logs failures
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ HistorySource   │────▶│ HTTP Client      │
//! │ (YahooAdapter)  │     │ (reqwest)        │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Domain Models   │
//! │ (PriceSeries)   │
//! └─────────────────┘
//! ```

pub mod adapters;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod http_client;

pub use adapters::{parse_chart_response, YahooAdapter, YahooAuthManager};

pub use data_source::{HistoryRequest, HistorySource, SourceError, SourceErrorKind};

pub use domain::{
    format_day_month_year, MonthlyPoint, MonthlySeries, Period, PricePoint, PriceSeries, Symbol,
    UtcDateTime,
};

pub use error::ValidationError;

pub use fetcher::PriceFetcher;

pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
