//! JSON response bodies.

use ferrocast_core::format_day_month_year;
use ferrocast_model::ForecastPoint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentValueResponse {
    pub current_price: f64,
}

/// One forecast row, keyed the way existing consumers expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Forecast")]
    pub forecast: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    pub current_price: f64,
    pub forecast: Vec<ForecastEntry>,
    pub historical_dates: Vec<String>,
    pub historical_values: Vec<f64>,
    /// Same dates as `forecast[].Date`.
    pub forecast_dates: Vec<String>,
    /// Same values as `forecast[].Forecast`.
    pub forecast_values: Vec<f64>,
}

impl ForecastResponse {
    pub fn new(
        current_price: f64,
        historical: &[ferrocast_core::MonthlyPoint],
        forecast: &[ForecastPoint],
    ) -> Self {
        let entries: Vec<ForecastEntry> = forecast
            .iter()
            .map(|point| ForecastEntry {
                date: format_day_month_year(point.month_end),
                forecast: point.value,
            })
            .collect();

        Self {
            current_price,
            historical_dates: historical
                .iter()
                .map(|point| format_day_month_year(point.month_end))
                .collect(),
            historical_values: historical.iter().map(|point| point.close).collect(),
            forecast_dates: entries.iter().map(|entry| entry.date.clone()).collect(),
            forecast_values: entries.iter().map(|entry| entry.forecast).collect(),
            forecast: entries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
