//! Alpha Vantage HTTP client.

use async_trait::async_trait;
use reqwest::Client as HttpClient;

use super::messages::{GlobalQuoteEnvelope, RawDailyBar, TimeSeriesEnvelope};
use crate::application::ports::{MarketDataError, MarketDataPort};
use crate::domain::market::{PricePoint, Quote, StockData, Symbol};
use crate::infrastructure::config::Credentials;

/// Most recent calendar days of history kept from the compact series.
pub const HISTORY_DAYS: usize = 30;

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

/// Market-data adapter for the Alpha Vantage HTTP API.
///
/// No retries and no request timeout: every failure is translated once
/// and surfaced to the caller.
pub struct AlphaVantageClient {
    http: HttpClient,
    credentials: Credentials,
    base_url: String,
}

impl AlphaVantageClient {
    /// Create a client against the production endpoint.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self::with_base_url(credentials, DEFAULT_BASE_URL.to_string())
    }

    /// Create a client with a custom base URL (for testing).
    #[must_use]
    pub fn with_base_url(credentials: Credentials, base_url: String) -> Self {
        Self {
            http: HttpClient::new(),
            credentials,
            base_url,
        }
    }

    async fn query<T: serde::de::DeserializeOwned>(
        &self,
        function: &str,
        symbol: &Symbol,
        extra: &[(&str, &str)],
    ) -> Result<T, MarketDataError> {
        let url = format!("{}/query", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("function", function),
                ("symbol", symbol.as_str()),
                ("apikey", self.credentials.api_key()),
            ])
            .query(extra)
            .send()
            .await
            .map_err(|e| MarketDataError::Transport(e.to_string()))?;

        response
            .json::<T>()
            .await
            .map_err(|e| MarketDataError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl MarketDataPort for AlphaVantageClient {
    async fn stock_data(&self, symbol: &Symbol) -> Result<StockData, MarketDataError> {
        let quote: GlobalQuoteEnvelope = self.query("GLOBAL_QUOTE", symbol, &[]).await?;
        let series: TimeSeriesEnvelope = self
            .query("TIME_SERIES_DAILY", symbol, &[("outputsize", "compact")])
            .await?;

        translate(symbol, quote, series)
    }
}

// =============================================================================
// Payload Translation
// =============================================================================

/// Translate raw provider payloads into the canonical boundary payload.
///
/// Kept pure so the translation rules stay testable without a live
/// endpoint.
fn translate(
    symbol: &Symbol,
    quote: GlobalQuoteEnvelope,
    series: TimeSeriesEnvelope,
) -> Result<StockData, MarketDataError> {
    if quote.error_message.is_some() || series.error_message.is_some() {
        return Err(MarketDataError::InvalidSymbol);
    }

    if quote.note.is_some() || series.note.is_some() {
        return Err(MarketDataError::RateLimited);
    }

    let raw = quote
        .global_quote
        .filter(|q| !q.is_empty())
        .ok_or(MarketDataError::NoData)?;

    // The ordered map is already chronological; keep the most recent bars.
    let bars: Vec<(chrono::NaiveDate, RawDailyBar)> =
        series.series.unwrap_or_default().into_iter().collect();
    let start = bars.len().saturating_sub(HISTORY_DAYS);
    let historical_data = bars[start..]
        .iter()
        .map(|(date, bar)| daily_bar(*date, bar))
        .collect::<Result<Vec<PricePoint>, MarketDataError>>()?;

    Ok(StockData {
        quote: Quote {
            symbol: symbol.clone(),
            current_price: parse_number("05. price", raw.price.as_deref())?,
            previous_close: parse_number("08. previous close", raw.previous_close.as_deref())?,
            change: parse_number("09. change", raw.change.as_deref())?,
            change_percent: parse_percent(raw.change_percent.as_deref()),
            volume: parse_volume("06. volume", raw.volume.as_deref())?,
            high: parse_number("03. high", raw.high.as_deref())?,
            low: parse_number("04. low", raw.low.as_deref())?,
        },
        historical_data,
    })
}

fn daily_bar(date: chrono::NaiveDate, bar: &RawDailyBar) -> Result<PricePoint, MarketDataError> {
    Ok(PricePoint {
        date,
        open: parse_number("1. open", Some(&bar.open))?,
        high: parse_number("2. high", Some(&bar.high))?,
        low: parse_number("3. low", Some(&bar.low))?,
        close: parse_number("4. close", Some(&bar.close))?,
        volume: parse_volume("5. volume", Some(&bar.volume))?,
    })
}

fn parse_number(field: &str, value: Option<&str>) -> Result<f64, MarketDataError> {
    let raw = value.ok_or_else(|| MarketDataError::Malformed(format!("missing field {field}")))?;
    raw.parse()
        .map_err(|_| MarketDataError::Malformed(format!("unparseable field {field}: {raw}")))
}

fn parse_volume(field: &str, value: Option<&str>) -> Result<u64, MarketDataError> {
    let raw = value.ok_or_else(|| MarketDataError::Malformed(format!("missing field {field}")))?;
    raw.parse()
        .map_err(|_| MarketDataError::Malformed(format!("unparseable field {field}: {raw}")))
}

/// Percent strings carry a trailing `%`; a missing or unparseable value
/// falls back to zero rather than failing the whole quote.
fn parse_percent(value: Option<&str>) -> f64 {
    value
        .map(|v| v.trim_end_matches('%'))
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0)
}

// =============================================================================
// Tests
// =============================================================================
