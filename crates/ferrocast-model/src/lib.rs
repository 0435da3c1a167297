//! # Ferrocast Model
//!
//! Monthly resampling and seasonal ARIMA forecasting.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`calendar`] | Month-end arithmetic |
//! | [`resample`] | Daily closes to month-end closes |
//! | [`sarima`] | SARIMA estimator (CSS + Nelder–Mead) |
//! | [`optimizer`] | Nelder–Mead simplex |
//! | [`forecast`] | Fixed-order `fit` / `forecast` used by the service |

pub mod calendar;
pub mod error;
pub mod forecast;
pub mod optimizer;
pub mod resample;
pub mod sarima;

pub use calendar::{future_month_ends, month_end, next_month_end};
pub use error::ModelError;
pub use forecast::{
    fit, fit_with, forecast, label_forecast, ForecastPoint, FORECAST_STEPS, ORDER, SEASONAL_ORDER,
};
pub use optimizer::{Minimum, NelderMead};
pub use resample::{resample_monthly, resample_monthly_points};
pub use sarima::{FittedSarima, Order, Sarima, SarimaParams, SeasonalOrder};
