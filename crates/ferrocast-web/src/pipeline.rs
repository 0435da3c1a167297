//! Per-request pipeline: fetch, resample, fit, forecast, shape.
//!
//! Each stage returns a typed [`ApiError`]; status codes are chosen only
//! when the error is turned into a response.

use std::sync::Arc;

use ferrocast_core::{PriceFetcher, PriceSeries, Symbol};
use ferrocast_model::{fit_with, forecast, label_forecast, resample_monthly};

use crate::config::ForecastSettings;
use crate::error::ApiError;
use crate::response::{CurrentValueResponse, ForecastResponse};

#[derive(Clone)]
pub struct ForecastPipeline {
    fetcher: PriceFetcher,
    settings: Arc<ForecastSettings>,
}

impl ForecastPipeline {
    pub fn new(fetcher: PriceFetcher, settings: ForecastSettings) -> Self {
        Self {
            fetcher,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    /// Latest daily close for `ticker`.
    pub async fn current_value(&self, ticker: &str) -> Result<CurrentValueResponse, ApiError> {
        let series = self.history(ticker).await?;
        let current_price = series
            .last_close()
            .ok_or_else(|| ApiError::data_unavailable(ticker))?;

        Ok(CurrentValueResponse { current_price })
    }

    /// Month-end history plus the configured number of forecast months.
    pub async fn forecast(&self, ticker: &str) -> Result<ForecastResponse, ApiError> {
        let series = self.history(ticker).await?;
        let current_price = series
            .last_close()
            .ok_or_else(|| ApiError::data_unavailable(ticker))?;

        let monthly = resample_monthly(&series);
        let settings = Arc::clone(&self.settings);
        let fit_input = monthly.clone();

        let values = tokio::task::spawn_blocking(move || {
            let model = fit_with(&fit_input, settings.order, settings.seasonal_order)
                .ok_or(ApiError::ModelFit)?;
            forecast(&model, settings.forecast_steps).ok_or(ApiError::Forecast)
        })
        .await
        .map_err(|err| ApiError::Unexpected(format!("forecast task failed: {err}")))??;

        let labelled = label_forecast(&monthly, &values).ok_or_else(|| {
            ApiError::Unexpected(String::from("forecast dates are outside the supported calendar"))
        })?;

        Ok(ForecastResponse::new(current_price, &monthly.points, &labelled))
    }

    async fn history(&self, ticker: &str) -> Result<PriceSeries, ApiError> {
        let symbol = self.provider_symbol(ticker)?;
        self.fetcher
            .fetch(&symbol, self.settings.lookback)
            .await
            .ok_or_else(|| ApiError::data_unavailable(ticker))
    }

    fn provider_symbol(&self, ticker: &str) -> Result<Symbol, ApiError> {
        Symbol::ticker(ticker)
            .and_then(|symbol| symbol.with_suffix(&self.settings.exchange_suffix))
            .map_err(|err| {
                tracing::error!(ticker, error = %err, "ticker cannot be sent to provider");
                ApiError::data_unavailable(ticker)
            })
    }
}
