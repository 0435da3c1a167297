//! Behavior tests for the HTTP surface.
//!
//! These drive the full router (pipeline, model, error mapping) against a
//! stub history source; no network access.

use ferrocast_core::{Period, SourceError};
use ferrocast_tests::*;
use ferrocast_web::ForecastSettings;
use time::Month;

fn sixty_months() -> Vec<f64> {
    trend_with_season(150.0, 1.0, 60)
}

fn router_for(symbol: &str, closes: &[f64]) -> (axum::Router, Arc<StubSource>) {
    let rows = daily_rows_ending_on(date(2019, Month::January, 31), closes);
    let source = Arc::new(StubSource::new().with_rows(symbol, rows));
    (router(source.clone(), ForecastSettings::default()), source)
}

fn as_f64s(value: &serde_json::Value) -> Vec<f64> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_f64().expect("number"))
        .collect()
}

fn as_strings(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_str().expect("string").to_owned())
        .collect()
}

// =============================================================================
// Current value
// =============================================================================

#[tokio::test]
async fn when_history_exists_current_value_is_last_daily_close() {
    // Given: daily history for OGDC on the exchange
    let closes = sixty_months();
    let (router, source) = router_for("OGDC.KA", &closes);

    // When: the client asks for the current value with a lower-case ticker
    let (status, body) = get_json(router, "/current-value/ogdc").await;

    // Then: the last daily close is returned and the exchange suffix was applied
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(body, serde_json::json!({"currentPrice": closes[59]}));
    let requests = source.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].symbol.as_str(), "OGDC.KA");
    assert_eq!(requests[0].period, Period::FiveYears);
}

#[tokio::test]
async fn when_ticker_is_unknown_both_endpoints_return_invalid_ticker() {
    // Given: a provider that knows nothing about XYZ
    let (router, _) = router_for("OGDC.KA", &sixty_months());

    // When / Then: both endpoints answer 400 with the invalid-ticker message
    for uri in ["/current-value/XYZ", "/forecast/XYZ"] {
        let (status, body) = get_json(router.clone(), uri).await;
        assert_eq!(status, axum::http::StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, serde_json::json!({"error": "Invalid ticker symbol: XYZ"}));
    }
}

#[tokio::test]
async fn when_provider_is_unavailable_request_is_rejected_as_invalid_ticker() {
    // Given: a provider outage for HBL
    let source = Arc::new(
        StubSource::new().with_failure("HBL.KA", SourceError::unavailable("upstream timeout")),
    );
    let router = router(source, ForecastSettings::default());

    // When
    let (status, body) = get_json(router, "/current-value/HBL").await;

    // Then
    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid ticker symbol: HBL");
}

#[tokio::test]
async fn when_provider_returns_no_rows_request_is_rejected_as_invalid_ticker() {
    // Given: the provider answers with an empty window
    let source = Arc::new(StubSource::new().with_rows("PSO.KA", Vec::new()));
    let router = router(source, ForecastSettings::default());

    // When
    let (status, body) = get_json(router, "/forecast/PSO").await;

    // Then
    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid ticker symbol: PSO");
}

// =============================================================================
// Forecast
// =============================================================================

#[tokio::test]
async fn when_history_is_too_short_forecast_reports_fit_failure() {
    // Given: fifteen months of history
    let (router, _) = router_for("LUCK.KA", &trend_with_season(300.0, 2.0, 15));

    // When
    let (status, body) = get_json(router, "/forecast/LUCK").await;

    // Then
    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, serde_json::json!({"error": "Failed to fit forecasting model"}));
}

#[tokio::test]
async fn when_ticker_has_two_years_of_history_forecast_succeeds() {
    // Given: a newly listed ticker with 24 months of history
    let closes = trend_with_season(90.0, 1.5, 24);
    let (router, _) = router_for("SYS.KA", &closes);

    // When
    let (status, body) = get_json(router, "/forecast/SYS").await;

    // Then: six month-end rows continue the pattern
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(as_strings(&body["historicalDates"]).len(), 24);
    assert_eq!(as_strings(&body["forecastDates"])[0], "31-01-2021");
    let expected = trend_with_season(90.0, 1.5, 30);
    let forecast = as_f64s(&body["forecastValues"]);
    assert_eq!(forecast.len(), 6);
    for (step, value) in forecast.iter().enumerate() {
        let want = expected[24 + step];
        assert!((value - want).abs() < 1e-6, "step {step}: {value} vs {want}");
    }
}

#[tokio::test]
async fn when_history_is_sufficient_forecast_has_six_month_end_rows() {
    // Given: five years of daily history
    let closes = sixty_months();
    let (router, _) = router_for("OGDC.KA", &closes);

    // When
    let (status, body) = get_json(router, "/forecast/OGDC").await;

    // Then: the payload has the documented shape
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(body["currentPrice"].as_f64(), Some(closes[59]));

    let historical_dates = as_strings(&body["historicalDates"]);
    assert_eq!(historical_dates.len(), 60);
    assert_eq!(historical_dates[0], "31-01-2019");
    assert_eq!(historical_dates[1], "28-02-2019");
    assert_eq!(historical_dates[59], "31-12-2023");
    assert_eq!(as_f64s(&body["historicalValues"]), closes);

    assert_eq!(
        as_strings(&body["forecastDates"]),
        vec!["31-01-2024", "29-02-2024", "31-03-2024", "30-04-2024", "31-05-2024", "30-06-2024"]
    );
    assert_eq!(as_f64s(&body["forecastValues"]).len(), 6);
}

#[tokio::test]
async fn forecast_rows_and_flat_arrays_agree() {
    // Given
    let (router, _) = router_for("OGDC.KA", &sixty_months());

    // When
    let (_, body) = get_json(router, "/forecast/OGDC").await;

    // Then: forecastDates / forecastValues mirror forecast[].Date / forecast[].Forecast
    let rows = body["forecast"].as_array().expect("forecast rows");
    let dates: Vec<String> = rows
        .iter()
        .map(|row| row["Date"].as_str().expect("Date").to_owned())
        .collect();
    let values: Vec<f64> = rows
        .iter()
        .map(|row| row["Forecast"].as_f64().expect("Forecast"))
        .collect();

    assert_eq!(dates, as_strings(&body["forecastDates"]));
    assert_eq!(values, as_f64s(&body["forecastValues"]));
}

#[tokio::test]
async fn noise_free_history_is_continued_exactly() {
    // Given: a trend plus a fixed twelve-month pattern, no noise
    let closes = sixty_months();
    let (router, _) = router_for("OGDC.KA", &closes);

    // When
    let (_, body) = get_json(router, "/forecast/OGDC").await;

    // Then: the forecast is the pattern's continuation
    let expected = trend_with_season(150.0, 1.0, 66);
    let forecast = as_f64s(&body["forecastValues"]);
    for (step, value) in forecast.iter().enumerate() {
        let want = expected[60 + step];
        assert!((value - want).abs() < 1e-6, "step {step}: {value} vs {want}");
    }
}

#[tokio::test]
async fn configured_lookback_is_sent_to_provider() {
    // Given: a service configured for a ten-year window
    let rows = daily_rows_ending_on(date(2019, Month::January, 31), &sixty_months());
    let source = Arc::new(StubSource::new().with_rows("MCB.KA", rows));
    let settings = ForecastSettings {
        lookback: Period::TenYears,
        ..ForecastSettings::default()
    };
    let router = router(source.clone(), settings);

    // When
    let (status, _) = get_json(router, "/current-value/MCB").await;

    // Then
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(source.requests()[0].period, Period::TenYears);
}

#[tokio::test]
async fn health_probe_answers_without_touching_provider() {
    // Given
    let (router, source) = router_for("OGDC.KA", &sixty_months());

    // When
    let (status, body) = get_json(router, "/health").await;

    // Then
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(body["status"], "alive");
    assert!(source.requests().is_empty());
}
