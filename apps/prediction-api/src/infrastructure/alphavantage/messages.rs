//! Alpha Vantage Wire Types
//!
//! Deserialization types for the provider's JSON payloads. Field names on
//! the wire are numbered (`"05. price"`), and every numeric value arrives
//! as a string; parsing happens after deserialization in the client.
//!
//! # Payloads
//!
//! ## `GLOBAL_QUOTE`
//! ```json
//! {
//!   "Global Quote": {
//!     "01. symbol": "AAPL",
//!     "03. high": "191.05",
//!     "04. low": "187.45",
//!     "05. price": "189.95",
//!     "06. volume": "54162983",
//!     "08. previous close": "188.01",
//!     "09. change": "1.94",
//!     "10. change percent": "1.0319%"
//!   }
//! }
//! ```
//!
//! ## `TIME_SERIES_DAILY` (compact)
//! ```json
//! {
//!   "Time Series (Daily)": {
//!     "2024-01-03": {
//!       "1. open": "184.22",
//!       "2. high": "185.88",
//!       "3. low": "183.43",
//!       "4. close": "184.25",
//!       "5. volume": "58414460"
//!     }
//!   }
//! }
//! ```
//!
//! # Error envelopes
//!
//! Errors are signaled in-band alongside a 200 response: an
//! `"Error Message"` field for unknown symbols, a `"Note"` field when the
//! credential is throttled, and an absent or empty `"Global Quote"`
//! object when the provider has no data.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;

/// Envelope for the `GLOBAL_QUOTE` function.
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalQuoteEnvelope {
    /// Quote payload; absent or empty when the provider has no data.
    #[serde(rename = "Global Quote")]
    pub global_quote: Option<RawGlobalQuote>,

    /// In-band error (invalid symbol).
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,

    /// In-band throttle notice.
    #[serde(rename = "Note")]
    pub note: Option<String>,
}

/// Raw quote fields, all strings on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGlobalQuote {
    /// Ticker echoed by the provider.
    #[serde(rename = "01. symbol")]
    pub symbol: Option<String>,

    /// Session open.
    #[serde(rename = "02. open")]
    pub open: Option<String>,

    /// Session high.
    #[serde(rename = "03. high")]
    pub high: Option<String>,

    /// Session low.
    #[serde(rename = "04. low")]
    pub low: Option<String>,

    /// Latest trading price.
    #[serde(rename = "05. price")]
    pub price: Option<String>,

    /// Session volume.
    #[serde(rename = "06. volume")]
    pub volume: Option<String>,

    /// Latest trading day.
    #[serde(rename = "07. latest trading day")]
    pub latest_trading_day: Option<String>,

    /// Previous session's close.
    #[serde(rename = "08. previous close")]
    pub previous_close: Option<String>,

    /// Absolute change since the previous close.
    #[serde(rename = "09. change")]
    pub change: Option<String>,

    /// Percent change since the previous close, with a trailing `%`.
    #[serde(rename = "10. change percent")]
    pub change_percent: Option<String>,
}

impl RawGlobalQuote {
    /// Whether the provider answered with an empty quote object.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.price.is_none()
    }
}

/// Envelope for the `TIME_SERIES_DAILY` function.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeSeriesEnvelope {
    /// Date-keyed daily bars. The ordered map deduplicates dates and
    /// yields them chronologically ascending regardless of wire order.
    #[serde(rename = "Time Series (Daily)")]
    pub series: Option<BTreeMap<NaiveDate, RawDailyBar>>,

    /// In-band error (invalid symbol).
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,

    /// In-band throttle notice.
    #[serde(rename = "Note")]
    pub note: Option<String>,
}

/// One raw daily OHLCV bar.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDailyBar {
    /// Opening price.
    #[serde(rename = "1. open")]
    pub open: String,

    /// Daily high.
    #[serde(rename = "2. high")]
    pub high: String,

    /// Daily low.
    #[serde(rename = "3. low")]
    pub low: String,

    /// Closing price.
    #[serde(rename = "4. close")]
    pub close: String,

    /// Shares traded.
    #[serde(rename = "5. volume")]
    pub volume: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_quote_deserializes_numbered_fields() {
        let json = r#"{
            "Global Quote": {
                "01. symbol": "AAPL",
                "02. open": "188.50",
                "03. high": "191.05",
                "04. low": "187.45",
                "05. price": "189.95",
                "06. volume": "54162983",
                "07. latest trading day": "2024-01-05",
                "08. previous close": "188.01",
                "09. change": "1.94",
                "10. change percent": "1.0319%"
            }
        }"#;

        let envelope: GlobalQuoteEnvelope = serde_json::from_str(json).unwrap();
        let quote = envelope.global_quote.unwrap();
        assert_eq!(quote.symbol.as_deref(), Some("AAPL"));
        assert_eq!(quote.price.as_deref(), Some("189.95"));
        assert_eq!(quote.change_percent.as_deref(), Some("1.0319%"));
        assert!(!quote.is_empty());
    }

    #[test]
    fn empty_quote_object_is_detected() {
        let envelope: GlobalQuoteEnvelope =
            serde_json::from_str(r#"{"Global Quote": {}}"#).unwrap();
        assert!(envelope.global_quote.unwrap().is_empty());
    }

    #[test]
    fn error_and_note_envelopes_deserialize() {
        let error: GlobalQuoteEnvelope =
            serde_json::from_str(r#"{"Error Message": "Invalid API call."}"#).unwrap();
        assert!(error.error_message.is_some());
        assert!(error.global_quote.is_none());

        let note: TimeSeriesEnvelope =
            serde_json::from_str(r#"{"Note": "Thank you for using Alpha Vantage!"}"#).unwrap();
        assert!(note.note.is_some());
        assert!(note.series.is_none());
    }

    #[test]
    fn time_series_orders_bars_by_date() {
        // Wire order is newest-first; the ordered map flips it.
        let json = r#"{
            "Time Series (Daily)": {
                "2024-01-05": {"1. open": "3", "2. high": "3", "3. low": "3", "4. close": "3", "5. volume": "30"},
                "2024-01-03": {"1. open": "1", "2. high": "1", "3. low": "1", "4. close": "1", "5. volume": "10"},
                "2024-01-04": {"1. open": "2", "2. high": "2", "3. low": "2", "4. close": "2", "5. volume": "20"}
            }
        }"#;

        let envelope: TimeSeriesEnvelope = serde_json::from_str(json).unwrap();
        let dates: Vec<NaiveDate> = envelope.series.unwrap().into_keys().collect();
        assert_eq!(
            dates,
            vec![
                "2024-01-03".parse().unwrap(),
                "2024-01-04".parse().unwrap(),
                "2024-01-05".parse().unwrap(),
            ]
        );
    }
}
