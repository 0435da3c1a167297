//! Behavior tests for resampling and the forecast model.

use ferrocast_model::{
    fit, fit_with, forecast, label_forecast, resample_monthly, resample_monthly_points,
    ModelError, Order, Sarima, SeasonalOrder, FORECAST_STEPS,
};
use ferrocast_tests::*;
use time::Month;

// =============================================================================
// Resampler
// =============================================================================

#[test]
fn when_one_month_of_closes_is_resampled_last_close_wins() {
    // Given: [100, 102, 101, 105] inside March 2024
    let series = price_series(
        "OGDC.KA",
        &[
            (date(2024, Month::March, 4), 100.0),
            (date(2024, Month::March, 5), 102.0),
            (date(2024, Month::March, 6), 101.0),
            (date(2024, Month::March, 7), 105.0),
        ],
    );

    // When
    let monthly = resample_monthly(&series);

    // Then
    assert_eq!(monthly.values(), vec![105.0]);
    assert_eq!(monthly.month_ends(), vec![date(2024, Month::March, 31)]);
}

#[test]
fn when_monthly_series_is_resampled_again_nothing_changes() {
    // Given: several years of daily rows
    let rows = daily_rows_ending_on(
        date(2020, Month::June, 30),
        &trend_with_season(80.0, 0.5, 30),
    );
    let once = resample_monthly(&price_series("HBL.KA", &rows));

    // When
    let twice = resample_monthly_points(&once);

    // Then
    assert_eq!(once, twice);
    assert_eq!(once.len(), 30);
}

#[test]
fn when_daily_rows_span_months_each_month_keeps_its_last_close() {
    // Given: three rows per month, the last row of each month carries the close
    let closes = [10.0, 20.0, 30.0];
    let rows = daily_rows_ending_on(date(2023, Month::November, 30), &closes);

    // When
    let monthly = resample_monthly(&price_series("PSO.KA", &rows));

    // Then
    assert_eq!(monthly.values(), closes.to_vec());
    assert_eq!(
        monthly.month_ends(),
        vec![
            date(2023, Month::November, 30),
            date(2023, Month::December, 31),
            date(2024, Month::January, 31),
        ]
    );
}

// =============================================================================
// Model
// =============================================================================

fn monthly(closes: &[f64]) -> MonthlySeries {
    resample_monthly(&price_series(
        "ENGRO.KA",
        &month_end_rows(date(2018, Month::January, 31), closes),
    ))
}

#[test]
fn when_fit_and_forecast_succeed_there_are_exactly_six_values() {
    // Given
    let series = monthly(&trend_with_season(120.0, 3.0, 48));

    // When
    let model = fit(&series).expect("fit");
    let values = forecast(&model, FORECAST_STEPS).expect("forecast");

    // Then
    assert_eq!(values.len(), 6);
    assert_eq!(model.observations(), 48);
}

#[test]
fn forecast_dates_follow_last_month_end_consecutively() {
    // Given
    let series = monthly(&trend_with_season(120.0, 3.0, 48));
    let model = fit(&series).expect("fit");
    let values = forecast(&model, FORECAST_STEPS).expect("forecast");

    // When
    let labelled = label_forecast(&series, &values).expect("labels");

    // Then: strictly increasing month ends starting right after the history
    let mut previous = series.last_month_end().expect("history");
    for point in &labelled {
        assert_eq!(Some(point.month_end), ferrocast_model::next_month_end(previous));
        previous = point.month_end;
    }
}

#[test]
fn when_history_is_shorter_than_model_span_fit_is_absent() {
    // Given: one seasonal cycle plus five months
    let series = monthly(&trend_with_season(120.0, 3.0, 17));

    // When / Then
    assert!(fit(&series).is_none());

    let model = Sarima::new(Order::new(1, 1, 1), SeasonalOrder::new(1, 1, 1, 12)).expect("orders");
    assert_eq!(
        model.fit(&series.values()).expect_err("too short"),
        ModelError::InsufficientData {
            required: 18,
            actual: 17
        }
    );
}

#[test]
fn non_seasonal_orders_are_accepted() {
    // Given: a plain trend and a model with nothing to estimate
    let closes: Vec<f64> = (0..40).map(|t| 50.0 + 2.0 * t as f64).collect();
    let series = monthly(&closes);

    // When
    let model = fit_with(&series, Order::new(0, 2, 0), SeasonalOrder::none()).expect("fit");
    let values = forecast(&model, 3).expect("forecast");

    // Then: the line is extended
    for (step, value) in values.iter().enumerate() {
        let want = 50.0 + 2.0 * (40 + step) as f64;
        assert!((value - want).abs() < 1e-6, "step {step}: {value} vs {want}");
    }
}
