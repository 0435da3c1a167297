//! Command-line and environment configuration.
//!
//! | Option | Env | Default |
//! |--------|-----|---------|
//! | `--host` | `FERROCAST_HOST` | `localhost` |
//! | `--port` | `FERROCAST_PORT` | `8080` |
//! | `--upstream-timeout-ms` | `FERROCAST_UPSTREAM_TIMEOUT_MS` | `10000` |
//! | `--lookback` | `FERROCAST_LOOKBACK` | `5y` |
//! | `--log-format` | `FERROCAST_LOG_FORMAT` | `text` |

use clap::Parser;
use ferrocast_core::Period;
use ferrocast_model::{Order, SeasonalOrder, FORECAST_STEPS, ORDER, SEASONAL_ORDER};

use crate::logging::LogFormat;

/// Exchange suffix appended to every requested ticker.
pub const EXCHANGE_SUFFIX: &str = ".KA";

/// Stock price forecast service.
#[derive(Debug, Clone, Parser)]
#[command(name = "ferrocast", author, version, about = "Stock price forecast service")]
pub struct Cli {
    /// Interface to bind.
    #[arg(long, env = "FERROCAST_HOST", default_value = "localhost")]
    pub host: String,

    /// Port to bind.
    #[arg(long, env = "FERROCAST_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Timeout for each call to the market data provider, in milliseconds.
    #[arg(long, env = "FERROCAST_UPSTREAM_TIMEOUT_MS", default_value_t = 10_000)]
    pub upstream_timeout_ms: u64,

    /// History window requested from the provider (e.g. 1y, 5y, max).
    #[arg(long, env = "FERROCAST_LOOKBACK", default_value_t = Period::FiveYears)]
    pub lookback: Period,

    /// Log output format.
    #[arg(long, env = "FERROCAST_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn forecast_settings(&self) -> ForecastSettings {
        ForecastSettings {
            lookback: self.lookback,
            ..ForecastSettings::default()
        }
    }
}

/// Fixed pipeline parameters. Tests override these to run on synthetic data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastSettings {
    pub exchange_suffix: String,
    pub lookback: Period,
    pub order: Order,
    pub seasonal_order: SeasonalOrder,
    pub forecast_steps: usize,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            exchange_suffix: EXCHANGE_SUFFIX.to_owned(),
            lookback: Period::default(),
            order: ORDER,
            seasonal_order: SEASONAL_ORDER,
            forecast_steps: FORECAST_STEPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_localhost_8080() {
        let cli = Cli::try_parse_from(["ferrocast"]).expect("defaults parse");
        assert_eq!(cli.bind_address(), "localhost:8080");
        assert_eq!(cli.upstream_timeout_ms, 10_000);
        assert_eq!(cli.lookback, Period::FiveYears);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "ferrocast",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--lookback",
            "10y",
            "--log-format",
            "json",
        ])
        .expect("flags parse");

        assert_eq!(cli.bind_address(), "0.0.0.0:9000");
        assert_eq!(cli.forecast_settings().lookback, Period::TenYears);
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_unknown_lookback() {
        assert!(Cli::try_parse_from(["ferrocast", "--lookback", "7w"]).is_err());
    }

    #[test]
    fn default_settings_use_fixed_model() {
        let settings = ForecastSettings::default();
        assert_eq!(settings.exchange_suffix, ".KA");
        assert_eq!(settings.order, Order::new(1, 1, 1));
        assert_eq!(settings.seasonal_order, SeasonalOrder::new(1, 1, 1, 12));
        assert_eq!(settings.forecast_steps, 6);
    }
}
