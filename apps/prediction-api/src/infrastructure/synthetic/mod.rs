//! Synthetic Market Data
//!
//! The demo-mode implementation of the market-data port: fabricates a
//! 30-day random-walk history and a consistent quote entirely
//! in-process. Daily moves are bounded at ±2%, which keeps the trend
//! estimator's volatility penalty small enough that confidence over
//! synthetic data stays inside the 70–95 band the demo surface
//! advertises.
//!
//! An optional artificial latency models the network round-trip of the
//! live provider. Output is seedable for deterministic tests.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::application::ports::{MarketDataError, MarketDataPort};
use crate::domain::market::{PricePoint, Quote, StockData, Symbol};

/// Days of fabricated history per query.
pub const HISTORY_DAYS: usize = 30;

/// Bound on fabricated day-over-day moves, as a fraction.
const MAX_DAILY_MOVE: f64 = 0.02;

/// Price band fabricated quotes start from.
const BASE_PRICE_RANGE: std::ops::Range<f64> = 40.0..480.0;

/// Intraday wick size relative to the day's open/close span.
const WICK_RATIO: f64 = 0.005;

/// In-process market-data provider for demo and test configurations.
pub struct SyntheticMarketData {
    rng: Mutex<StdRng>,
    latency: Duration,
}

impl SyntheticMarketData {
    /// Create a provider with OS-seeded randomness and no latency.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
            latency: Duration::ZERO,
        }
    }

    /// Create a provider with deterministic output for a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            latency: Duration::ZERO,
        }
    }

    /// Add an artificial delay before each response.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn fabricate(&self, symbol: &Symbol) -> StockData {
        let mut rng = self.rng.lock();

        let today = Utc::now().date_naive();
        let mut close = rng.random_range(BASE_PRICE_RANGE);
        let mut historical_data = Vec::with_capacity(HISTORY_DAYS);

        for offset in (1..=HISTORY_DAYS).rev() {
            let date = today - Days::new(offset as u64);
            let open = close;
            close = open * (1.0 + rng.random_range(-MAX_DAILY_MOVE..MAX_DAILY_MOVE));
            let high = open.max(close) * (1.0 + rng.random_range(0.0..WICK_RATIO));
            let low = open.min(close) * (1.0 - rng.random_range(0.0..WICK_RATIO));
            historical_data.push(PricePoint {
                date,
                open,
                high,
                low,
                close,
                volume: rng.random_range(1_000_000..50_000_000u64),
            });
        }

        let previous_close = close;
        let current_price =
            previous_close * (1.0 + rng.random_range(-MAX_DAILY_MOVE..MAX_DAILY_MOVE));
        let change = current_price - previous_close;
        let change_percent = change / previous_close * 100.0;

        StockData {
            quote: Quote {
                symbol: symbol.clone(),
                current_price,
                previous_close,
                change,
                change_percent,
                volume: rng.random_range(1_000_000..50_000_000u64),
                high: current_price.max(previous_close) * (1.0 + WICK_RATIO),
                low: current_price.min(previous_close) * (1.0 - WICK_RATIO),
            },
            historical_data,
        }
    }
}

impl Default for SyntheticMarketData {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataPort for SyntheticMarketData {
    async fn stock_data(&self, symbol: &Symbol) -> Result<StockData, MarketDataError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        Ok(self.fabricate(symbol))
    }
}

// =============================================================================
// Tests
// =============================================================================
