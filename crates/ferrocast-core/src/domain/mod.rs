//! # Domain Models
//!
//! Canonical domain types for ferrocast price data.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker symbol |
//! | [`Period`] | Provider lookback window (`5y`, `1y`, ...) |
//! | [`UtcDateTime`] | UTC timestamp |
//! | [`PricePoint`] / [`PriceSeries`] | Daily closes, ascending |
//! | [`MonthlyPoint`] / [`MonthlySeries`] | Month-end closes derived from a daily series |
//!
//! Series constructors reject unordered or duplicate timestamps, so every
//! consumer can rely on ascending order.

mod period;
mod series;
mod symbol;
mod timestamp;

pub use period::Period;
pub use series::{MonthlyPoint, MonthlySeries, PricePoint, PriceSeries};
pub use symbol::Symbol;
pub use timestamp::{format_day_month_year, UtcDateTime};
