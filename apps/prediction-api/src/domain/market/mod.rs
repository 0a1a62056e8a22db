//! Market Data Types
//!
//! Canonical internal representation of quotes and daily price history,
//! independent of any provider wire format.
//!
//! # Invariants
//!
//! - `historical_data` is chronologically ascending with no duplicate
//!   dates. The live adapter guarantees this by collecting bars into a
//!   date-keyed ordered map; the synthetic adapter fabricates dates in
//!   order.
//! - Prices are positive finite values; callers validate before feeding
//!   them into the estimator.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// Symbol
// =============================================================================

/// A stock ticker symbol.
///
/// Normalized on construction: surrounding whitespace is trimmed and the
/// ticker is uppercased, so `" aapl "` and `"AAPL"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Maximum accepted ticker length ("BRK.B"-style class shares fit).
    pub const MAX_LEN: usize = 10;

    /// Create a new symbol, trimming whitespace and uppercasing.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_uppercase())
    }

    /// Get the symbol string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Validate the symbol before it is sent to a provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol is empty, too long, or contains
    /// characters outside `[A-Z0-9.-]`.
    pub fn validate(&self) -> Result<(), SymbolError> {
        if self.0.is_empty() {
            return Err(SymbolError::Empty);
        }

        if self.0.len() > Self::MAX_LEN {
            return Err(SymbolError::TooLong);
        }

        if !self
            .0
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return Err(SymbolError::InvalidCharacters);
        }

        Ok(())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Symbol validation failure.
///
/// Display strings are the messages the boundary shows the user; keep
/// them stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    /// The symbol was absent or blank.
    #[error("Stock symbol is required")]
    Empty,
    /// The symbol exceeds the maximum ticker length.
    #[error("Invalid stock symbol or API error")]
    TooLong,
    /// The symbol contains characters no ticker uses.
    #[error("Invalid stock symbol or API error")]
    InvalidCharacters,
}

// =============================================================================
// Price History
// =============================================================================

/// One daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    /// Trading day.
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Daily high.
    pub high: f64,
    /// Daily low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Shares traded.
    pub volume: u64,
}

// =============================================================================
// Quote
// =============================================================================

/// A snapshot of a security's current trading price and daily range.
///
/// Produced once per query; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Ticker the quote answers for.
    pub symbol: Symbol,
    /// Latest trading price.
    pub current_price: f64,
    /// Previous session's close.
    pub previous_close: f64,
    /// Absolute change since the previous close.
    pub change: f64,
    /// Percent change since the previous close.
    pub change_percent: f64,
    /// Session volume.
    pub volume: u64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
}

// =============================================================================
// Stock Data
// =============================================================================

/// The boundary payload: a quote plus its daily history.
///
/// Serializes with the camelCase field names the front end consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockData {
    /// Current quote.
    #[serde(flatten)]
    pub quote: Quote,
    /// Daily bars, oldest to newest, at most 30 entries.
    pub historical_data: Vec<PricePoint>,
}

impl StockData {
    /// Closing prices in chronological order.
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.historical_data.iter().map(|p| p.close).collect()
    }

    /// Whether the history is strictly ascending by date (no duplicates).
    #[must_use]
    pub fn is_chronological(&self) -> bool {
        self.historical_data
            .windows(2)
            .all(|w| w[0].date < w[1].date)
    }
}

// =============================================================================
// Tests
// =============================================================================
