//! Market data fetcher.
//!
//! Wraps a [`HistorySource`] and collapses every failure mode (provider
//! error, unknown symbol, empty window) into `None` after logging it with
//! the ticker and provider.

use std::sync::Arc;

use crate::data_source::{HistoryRequest, HistorySource};
use crate::{Period, PriceSeries, Symbol};

/// Fetches daily closes for a symbol and lookback window.
#[derive(Clone)]
pub struct PriceFetcher {
    source: Arc<dyn HistorySource>,
}

impl PriceFetcher {
    pub fn new(source: Arc<dyn HistorySource>) -> Self {
        Self { source }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Daily closes for `symbol` over `period`, or `None` if the provider
    /// failed or returned no rows.
    pub async fn fetch(&self, symbol: &Symbol, period: Period) -> Option<PriceSeries> {
        let request = HistoryRequest::new(symbol.clone(), period);
        match self.source.history(request).await {
            Ok(series) if series.is_empty() => {
                tracing::error!(
                    ticker = %symbol,
                    provider = self.source.name(),
                    %period,
                    "Error fetching stock data: provider returned no rows"
                );
                None
            }
            Ok(series) => {
                tracing::debug!(
                    ticker = %symbol,
                    provider = self.source.name(),
                    rows = series.len(),
                    "fetched daily history"
                );
                Some(series)
            }
            Err(error) => {
                tracing::error!(
                    ticker = %symbol,
                    provider = self.source.name(),
                    code = error.code(),
                    error = %error.message(),
                    "Error fetching stock data"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceError;
    use crate::{PricePoint, UtcDateTime};
    use std::future::Future;
    use std::pin::Pin;

    struct FixedSource(Result<Vec<f64>, SourceError>);

    impl HistorySource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn history<'a>(
            &'a self,
            req: HistoryRequest,
        ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
            let result = self.0.clone().map(|closes| {
                let points = closes
                    .into_iter()
                    .enumerate()
                    .map(|(day, close)| {
                        let ts = UtcDateTime::parse(&format!("2024-01-{:02}T00:00:00Z", day + 1))
                            .expect("timestamp");
                        PricePoint::new(ts, close).expect("point")
                    })
                    .collect();
                PriceSeries::new(req.symbol, points).expect("series")
            });
            Box::pin(async move { result })
        }
    }

    fn symbol() -> Symbol {
        Symbol::parse("MCB.KA").expect("symbol")
    }

    #[tokio::test]
    async fn returns_series_when_provider_has_rows() {
        let fetcher = PriceFetcher::new(Arc::new(FixedSource(Ok(vec![100.0, 102.0]))));
        let series = fetcher
            .fetch(&symbol(), Period::FiveYears)
            .await
            .expect("rows present");
        assert_eq!(series.last_close(), Some(102.0));
    }

    #[tokio::test]
    async fn empty_series_is_absent() {
        let fetcher = PriceFetcher::new(Arc::new(FixedSource(Ok(Vec::new()))));
        assert!(fetcher.fetch(&symbol(), Period::FiveYears).await.is_none());
    }

    #[tokio::test]
    async fn provider_error_is_absent() {
        let fetcher = PriceFetcher::new(Arc::new(FixedSource(Err(SourceError::not_found(
            "unknown symbol",
        )))));
        assert!(fetcher.fetch(&symbol(), Period::FiveYears).await.is_none());
        assert_eq!(fetcher.source_name(), "fixed");
    }
}
