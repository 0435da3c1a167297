use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::data_source::{HistoryRequest, HistorySource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::{PricePoint, PriceSeries, Symbol, UtcDateTime};

const CHART_ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const COOKIE_ENDPOINT: &str = "https://fc.yahoo.com";
const CRUMB_ENDPOINTS: [&str; 2] = [
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];
const REFERER: &str = "https://finance.yahoo.com/";

// ============================================================================
// Yahoo Auth Manager - cookie/crumb session
// ============================================================================

/// Manages the Yahoo Finance cookie/crumb session.
///
/// The chart API wants:
/// 1. Session cookie from fc.yahoo.com (kept by the client's cookie jar)
/// 2. Crumb token from query1.finance.yahoo.com/v1/test/getcrumb
#[derive(Debug)]
pub struct YahooAuthManager {
    crumb: Mutex<Option<(String, Instant)>>,
    ttl: Duration,
    pinned: bool,
}

impl Default for YahooAuthManager {
    fn default() -> Self {
        match std::env::var("YAHOO_CRUMB") {
            Ok(crumb) if !crumb.trim().is_empty() => Self::with_static_crumb(crumb.trim()),
            _ => Self::with_ttl(Duration::from_secs(3600)),
        }
    }
}

impl YahooAuthManager {
    /// Start without a crumb; fetch one on first use and again after `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            crumb: Mutex::new(None),
            ttl,
            pinned: false,
        }
    }

    /// Use a fixed crumb and never contact the auth endpoints.
    pub fn with_static_crumb(crumb: impl Into<String>) -> Self {
        Self {
            crumb: Mutex::new(Some((crumb.into(), Instant::now()))),
            ttl: Duration::MAX,
            pinned: true,
        }
    }

    /// Current crumb, refreshed when missing or older than the TTL.
    ///
    /// Holding the lock across the refresh keeps concurrent requests from
    /// fetching a crumb each.
    pub async fn crumb(
        &self,
        http_client: &Arc<dyn HttpClient>,
        timeout_ms: u64,
    ) -> Result<String, SourceError> {
        let mut cached = self.crumb.lock().await;
        if let Some((crumb, fetched_at)) = cached.as_ref() {
            if self.pinned || fetched_at.elapsed() < self.ttl {
                return Ok(crumb.clone());
            }
        }

        let crumb = Self::fetch_crumb(http_client, timeout_ms).await?;
        *cached = Some((crumb.clone(), Instant::now()));
        Ok(crumb)
    }

    /// Drop the cached crumb so the next call refreshes it.
    pub async fn invalidate(&self) {
        if !self.pinned {
            *self.crumb.lock().await = None;
        }
    }

    async fn fetch_crumb(
        http_client: &Arc<dyn HttpClient>,
        timeout_ms: u64,
    ) -> Result<String, SourceError> {
        // fc.yahoo.com answers 404 but still sets the session cookie
        let cookie_request = HttpRequest::get(COOKIE_ENDPOINT)
            .with_header("referer", REFERER)
            .with_timeout_ms(timeout_ms);
        http_client.execute(cookie_request).await.map_err(|e| {
            SourceError::unavailable(format!("failed to fetch yahoo cookie: {}", e.message()))
        })?;

        for endpoint in CRUMB_ENDPOINTS {
            let crumb_request = HttpRequest::get(endpoint)
                .with_header("referer", REFERER)
                .with_timeout_ms(timeout_ms);

            let Ok(response) = http_client.execute(crumb_request).await else {
                continue;
            };
            if !response.is_success() {
                continue;
            }

            let body = response.body.trim();
            if body.contains("<html") || body.contains("<!DOCTYPE") {
                continue;
            }
            if body.to_ascii_lowercase().contains("too many requests") {
                return Err(SourceError::unavailable(
                    "yahoo rate limited while fetching crumb",
                ));
            }
            if !body.is_empty() && body.len() < 100 && !body.contains(' ') {
                return Ok(body.to_owned());
            }
        }

        Err(SourceError::unavailable(
            "failed to fetch yahoo crumb from all endpoints",
        ))
    }
}

// ============================================================================
// Yahoo Adapter
// ============================================================================

/// Daily history from the Yahoo Finance chart API.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    auth_manager: Arc<YahooAuthManager>,
    timeout_ms: u64,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()))
    }
}

impl YahooAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            auth_manager: Arc::new(YahooAuthManager::default()),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_auth_manager(mut self, auth_manager: YahooAuthManager) -> Self {
        self.auth_manager = Arc::new(auth_manager);
        self
    }

    /// Upstream timeout for every call this adapter makes.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    fn chart_endpoint(req: &HistoryRequest, crumb: &str) -> String {
        format!(
            "{}/{}?range={}&interval=1d&events=div%2Csplit&crumb={}",
            CHART_ENDPOINT,
            urlencoding::encode(req.symbol.as_str()),
            req.period,
            urlencoding::encode(crumb)
        )
    }

    async fn fetch_history(&self, req: HistoryRequest) -> Result<PriceSeries, SourceError> {
        let crumb = self
            .auth_manager
            .crumb(&self.http_client, self.timeout_ms)
            .await?;

        let request = HttpRequest::get(Self::chart_endpoint(&req, &crumb))
            .with_header("referer", REFERER)
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            if e.timed_out() {
                SourceError::unavailable(format!(
                    "yahoo request timed out after {}ms: {}",
                    self.timeout_ms,
                    e.message()
                ))
            } else {
                SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
            }
        })?;

        match response.status {
            401 | 403 => {
                // stale session; the next request fetches a fresh crumb
                self.auth_manager.invalidate().await;
                return Err(SourceError::unavailable(format!(
                    "yahoo rejected session with status {}",
                    response.status
                )));
            }
            404 => {
                return Err(SourceError::not_found(format!(
                    "yahoo has no chart for {}",
                    req.symbol
                )));
            }
            status if !response.is_success() => {
                return Err(SourceError::unavailable(format!(
                    "yahoo returned status {status}"
                )));
            }
            _ => {}
        }

        parse_chart_response(&req.symbol, &response.body)
    }
}

impl HistorySource for YahooAdapter {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_history(req))
    }
}

/// Normalize a chart payload into daily closes keyed by exchange-local trading day.
///
/// Adjusted closes are preferred over raw closes when the payload carries
/// them. Rows with a null close are skipped; when two rows land on the same
/// trading day the later one wins.
pub fn parse_chart_response(symbol: &Symbol, body: &str) -> Result<PriceSeries, SourceError> {
    let chart_response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {}", e)))?;

    if let Some(error) = &chart_response.chart.error {
        let detail = error.description.as_deref().unwrap_or(error.code.as_str());
        if error.code.eq_ignore_ascii_case("not found") {
            return Err(SourceError::not_found(format!("yahoo: {detail}")));
        }
        return Err(SourceError::unavailable(format!(
            "yahoo chart API error: {detail}"
        )));
    }

    let result = chart_response
        .chart
        .result
        .as_ref()
        .and_then(|results| results.first())
        .ok_or_else(|| SourceError::not_found(format!("no chart data for {symbol}")))?;

    let Some(timestamps) = result.timestamp.as_ref() else {
        return PriceSeries::new(symbol.clone(), Vec::new()).map_err(SourceError::from);
    };

    let closes = result
        .indicators
        .adjclose
        .as_ref()
        .and_then(|adj| adj.first())
        .map(|adj| adj.adjclose.as_slice())
        .or_else(|| {
            result
                .indicators
                .quote
                .first()
                .map(|quote| quote.close.as_slice())
        })
        .ok_or_else(|| SourceError::internal("no close data in yahoo chart"))?;

    let gmt_offset = result.meta.as_ref().map(|meta| meta.gmtoffset).unwrap_or(0);

    let mut points: Vec<PricePoint> = Vec::with_capacity(timestamps.len());
    for (&ts_value, close) in timestamps.iter().zip(closes) {
        let Some(close) = *close else {
            continue;
        };

        let local = OffsetDateTime::from_unix_timestamp(ts_value + gmt_offset)
            .map_err(|e| SourceError::internal(format!("invalid timestamp: {}", e)))?;
        let point = PricePoint::new(UtcDateTime::from_date(local.date()), close)?;

        match points.last_mut() {
            Some(last) if last.ts == point.ts => *last = point,
            _ => points.push(point),
        }
    }

    PriceSeries::new(symbol.clone(), points).map_err(SourceError::from)
}

// Yahoo Finance chart response structures

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: Option<YahooChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
    #[serde(default)]
    adjclose: Option<Vec<YahooChartAdjClose>>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}
