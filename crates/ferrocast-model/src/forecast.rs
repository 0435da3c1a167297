//! Fixed-hyperparameter fit and forecast operations used by the service.

use ferrocast_core::MonthlySeries;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::calendar::future_month_ends;
use crate::error::ModelError;
use crate::sarima::{FittedSarima, Order, Sarima, SeasonalOrder};

/// Non-seasonal order `(1, 1, 1)`.
pub const ORDER: Order = Order::new(1, 1, 1);

/// Seasonal order `(1, 1, 1)` with a 12-month period.
pub const SEASONAL_ORDER: SeasonalOrder = SeasonalOrder::new(1, 1, 1, 12);

/// Forecast horizon in months.
pub const FORECAST_STEPS: usize = 6;

/// One forecast value labelled with its month end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month_end: Date,
    pub value: f64,
}

/// Fit the fixed SARIMA(1,1,1)(1,1,1,12) model to a monthly series.
pub fn fit(series: &MonthlySeries) -> Option<FittedSarima> {
    fit_with(series, ORDER, SEASONAL_ORDER)
}

/// Fit with explicit orders. Failures are logged and collapse to `None`.
pub fn fit_with(
    series: &MonthlySeries,
    order: Order,
    seasonal: SeasonalOrder,
) -> Option<FittedSarima> {
    let result = Sarima::new(order, seasonal).and_then(|model| model.fit(&series.values()));
    match result {
        Ok(fitted) => Some(fitted),
        Err(err) => {
            tracing::error!(
                ticker = %series.symbol,
                observations = series.len(),
                error = %err,
                "model fit failed"
            );
            None
        }
    }
}

/// Produce `steps` point forecasts. Failures are logged and collapse to `None`.
pub fn forecast(model: &FittedSarima, steps: usize) -> Option<Vec<f64>> {
    match model.forecast(steps) {
        Ok(values) => Some(values),
        Err(err) => {
            log_forecast_error(model, &err);
            None
        }
    }
}

/// Pair forecast values with the month ends that follow `series`.
///
/// `None` when the series is empty or the calendar runs out.
pub fn label_forecast(series: &MonthlySeries, values: &[f64]) -> Option<Vec<ForecastPoint>> {
    let last = series.last_month_end()?;
    let dates = future_month_ends(last, values.len())?;
    Some(
        dates
            .into_iter()
            .zip(values)
            .map(|(month_end, value)| ForecastPoint {
                month_end,
                value: *value,
            })
            .collect(),
    )
}

fn log_forecast_error(model: &FittedSarima, err: &ModelError) {
    tracing::error!(
        observations = model.observations(),
        error = %err,
        "forecast failed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrocast_core::{MonthlyPoint, Symbol};
    use time::Month;

    fn monthly(len: usize) -> MonthlySeries {
        let pattern = [0.0, 3.0, 5.0, 2.0, -1.0, -4.0, -6.0, -3.0, 1.0, 4.0, 2.0, -3.0];
        let mut month_end =
            Date::from_calendar_date(2019, Month::January, 31).expect("valid date");
        let mut points = Vec::with_capacity(len);
        for t in 0..len {
            points.push(MonthlyPoint {
                month_end,
                close: 200.0 + 1.5 * t as f64 + pattern[t % 12],
            });
            month_end = crate::calendar::next_month_end(month_end).expect("in range");
        }
        MonthlySeries::new(Symbol::parse("MCB.KA").expect("symbol"), points).expect("series")
    }

    #[test]
    fn fixed_orders_fit_and_forecast_six_months() {
        let series = monthly(60);
        let model = fit(&series).expect("fit");
        let values = forecast(&model, FORECAST_STEPS).expect("forecast");

        assert_eq!(values.len(), FORECAST_STEPS);
        let labelled = label_forecast(&series, &values).expect("labels");
        assert_eq!(
            labelled[0].month_end,
            Date::from_calendar_date(2024, Month::January, 31).expect("valid date")
        );
        assert_eq!(
            labelled[5].month_end,
            Date::from_calendar_date(2024, Month::June, 30).expect("valid date")
        );
    }

    #[test]
    fn short_series_fit_is_none() {
        assert!(fit(&monthly(12)).is_none());
        assert!(fit(&monthly(0)).is_none());
    }

    #[test]
    fn labels_are_empty_for_empty_series() {
        assert!(label_forecast(&monthly(0), &[1.0]).is_none());
    }
}
