//! Application Services
//!
//! `PredictionService` orchestrates the query flow: fetch data through
//! the market-data port, run the trend estimator, and keep the latest
//! prediction.
//!
//! # Overlapping queries
//!
//! Queries are tagged with monotonically increasing tickets. The stored
//! prediction is cleared the moment a new attempt begins, and a
//! resolution is stored only while its ticket is still the latest issued.
//! An older query finishing after a newer one was issued is discarded
//! rather than overwriting the newer result, so overlapping queries can
//! never leave a stale prediction behind. The stale caller still receives
//! its own result.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::application::ports::{MarketDataError, MarketDataPort};
use crate::domain::market::{StockData, Symbol};
use crate::domain::prediction::Prediction;

/// Orchestrates quote fetching and prediction assembly.
pub struct PredictionService {
    provider: Arc<dyn MarketDataPort>,
    issued: AtomicU64,
    latest: RwLock<Option<Prediction>>,
}

impl PredictionService {
    /// Create a service over the given provider.
    #[must_use]
    pub fn new(provider: Arc<dyn MarketDataPort>) -> Self {
        Self {
            provider,
            issued: AtomicU64::new(0),
            latest: RwLock::new(None),
        }
    }

    /// Fetch raw stock data without touching the stored prediction.
    ///
    /// # Errors
    ///
    /// Propagates the provider's `MarketDataError` unchanged.
    pub async fn stock_data(&self, symbol: &Symbol) -> Result<StockData, MarketDataError> {
        self.provider.stock_data(symbol).await
    }

    /// Run one prediction query.
    ///
    /// The stored prediction is cleared as soon as the attempt begins, so
    /// a failure leaves a blank state rather than stale data. The result
    /// becomes the stored prediction only if no newer query was issued
    /// while this one was in flight.
    ///
    /// # Errors
    ///
    /// Propagates the provider's `MarketDataError`; the stored prediction
    /// stays empty in that case.
    pub async fn predict(&self, symbol: &Symbol) -> Result<Prediction, MarketDataError> {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest.write().take();

        tracing::debug!(symbol = %symbol, ticket, "prediction query issued");

        let data = self.provider.stock_data(symbol).await?;
        let prediction = Prediction::from_stock_data(&data);

        if self.issued.load(Ordering::SeqCst) == ticket {
            *self.latest.write() = Some(prediction.clone());
        } else {
            tracing::debug!(symbol = %symbol, ticket, "stale resolution discarded");
        }

        Ok(prediction)
    }

    /// The most recent successfully stored prediction, if any.
    #[must_use]
    pub fn latest(&self) -> Option<Prediction> {
        self.latest.read().clone()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tokio::sync::oneshot;
    use tokio_test::{assert_pending, assert_ready};

    use super::*;
    use crate::application::ports::MockMarketDataPort;
    use crate::domain::market::{PricePoint, Quote};

    fn stock_data(symbol: &str, closes: &[f64]) -> StockData {
        let historical_data = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .checked_add_days(chrono::Days::new(i as u64))
                    .unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000,
            })
            .collect();

        StockData {
            quote: Quote {
                symbol: Symbol::new(symbol),
                current_price: closes.last().copied().unwrap_or(100.0),
                previous_close: 100.0,
                change: 1.0,
                change_percent: 1.0,
                volume: 1_000_000,
                high: 105.0,
                low: 95.0,
            },
            historical_data,
        }
    }

    /// Provider whose responses resolve only when the test releases them.
    struct GatedProvider {
        gates: Mutex<HashMap<String, oneshot::Receiver<Result<StockData, MarketDataError>>>>,
    }

    impl GatedProvider {
        fn new(
            gates: impl IntoIterator<
                Item = (String, oneshot::Receiver<Result<StockData, MarketDataError>>),
            >,
        ) -> Self {
            Self {
                gates: Mutex::new(gates.into_iter().collect()),
            }
        }
    }

    #[async_trait]
    impl MarketDataPort for GatedProvider {
        async fn stock_data(&self, symbol: &Symbol) -> Result<StockData, MarketDataError> {
            let gate = self
                .gates
                .lock()
                .remove(symbol.as_str())
                .expect("gate registered for symbol");
            gate.await.expect("gate sender kept alive")
        }
    }

    #[tokio::test]
    async fn successful_query_stores_latest() {
        let mut provider = MockMarketDataPort::new();
        provider
            .expect_stock_data()
            .returning(|symbol| Ok(stock_data(symbol.as_str(), &[100.0, 101.0, 102.0])));

        let service = PredictionService::new(Arc::new(provider));
        let prediction = service.predict(&Symbol::new("AAPL")).await.unwrap();

        assert_eq!(prediction.symbol.as_str(), "AAPL");
        assert_eq!(service.latest(), Some(prediction));
    }

    #[tokio::test]
    async fn failed_query_leaves_blank_state() {
        let mut provider = MockMarketDataPort::new();
        provider
            .expect_stock_data()
            .returning(|symbol| {
                if symbol.as_str() == "GOOD" {
                    Ok(stock_data("GOOD", &[10.0, 11.0]))
                } else {
                    Err(MarketDataError::InvalidSymbol)
                }
            });

        let service = PredictionService::new(Arc::new(provider));

        service.predict(&Symbol::new("GOOD")).await.unwrap();
        assert!(service.latest().is_some());

        let error = service.predict(&Symbol::new("ZZZZ")).await.unwrap_err();
        assert_eq!(error, MarketDataError::InvalidSymbol);

        // The previous result was cleared when the failing attempt began.
        assert!(service.latest().is_none());
    }

    #[tokio::test]
    async fn stale_resolution_never_becomes_latest() {
        let (older_tx, older_rx) = oneshot::channel();
        let (newer_tx, newer_rx) = oneshot::channel();
        let provider = GatedProvider::new([
            ("OLDER".to_string(), older_rx),
            ("NEWER".to_string(), newer_rx),
        ]);

        let service = PredictionService::new(Arc::new(provider));
        let older_symbol = Symbol::new("OLDER");
        let newer_symbol = Symbol::new("NEWER");

        let mut older = tokio_test::task::spawn(service.predict(&older_symbol));
        assert_pending!(older.poll());

        let mut newer = tokio_test::task::spawn(service.predict(&newer_symbol));
        assert_pending!(newer.poll());

        // The newer query resolves first and becomes the latest.
        newer_tx
            .send(Ok(stock_data("NEWER", &[50.0, 51.0])))
            .unwrap();
        assert_ready!(newer.poll()).unwrap();
        assert_eq!(service.latest().unwrap().symbol.as_str(), "NEWER");

        // The older query resolves late: its caller still gets a result,
        // but the stored prediction is untouched.
        older_tx
            .send(Ok(stock_data("OLDER", &[40.0, 41.0])))
            .unwrap();
        let stale = assert_ready!(older.poll()).unwrap();
        assert_eq!(stale.symbol.as_str(), "OLDER");
        assert_eq!(service.latest().unwrap().symbol.as_str(), "NEWER");
    }

    #[tokio::test]
    async fn newer_issue_clears_slot_even_before_resolution() {
        let (first_tx, first_rx) = oneshot::channel();
        let provider = GatedProvider::new([("FIRST".to_string(), first_rx)]);

        let service = PredictionService::new(Arc::new(provider));
        let symbol = Symbol::new("FIRST");

        let mut first = tokio_test::task::spawn(service.predict(&symbol));
        assert_pending!(first.poll());
        assert!(service.latest().is_none());

        first_tx.send(Ok(stock_data("FIRST", &[10.0, 10.5]))).unwrap();
        assert_ready!(first.poll()).unwrap();
        assert!(service.latest().is_some());
    }

    #[tokio::test]
    async fn stock_data_passthrough_does_not_touch_latest() {
        let mut provider = MockMarketDataPort::new();
        provider
            .expect_stock_data()
            .returning(|symbol| Ok(stock_data(symbol.as_str(), &[100.0, 101.0])));

        let service = PredictionService::new(Arc::new(provider));
        service.predict(&Symbol::new("AAPL")).await.unwrap();

        let data = service.stock_data(&Symbol::new("MSFT")).await.unwrap();
        assert_eq!(data.quote.symbol.as_str(), "MSFT");
        assert_eq!(service.latest().unwrap().symbol.as_str(), "AAPL");
    }
}
