//! Port Interfaces
//!
//! Contracts that infrastructure adapters implement, following the
//! Hexagonal Architecture pattern. The application core depends on these,
//! never on a concrete provider.
//!
//! ## Driven Ports (Outbound)
//!
//! - `MarketDataPort`: quote and daily-history lookup for one symbol.
//!   One implementation talks to the external quote provider; the
//!   synthetic implementation fabricates plausible data in-process. Both
//!   are selected at startup via configuration, never compiled in as
//!   parallel code paths.

use async_trait::async_trait;

use crate::domain::market::{StockData, Symbol};

/// Failures surfaced by a market-data provider.
///
/// The user-facing Display strings mirror the messages the front end
/// shows verbatim; keep them stable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketDataError {
    /// The provider rejected the symbol via its in-band error envelope.
    #[error("Invalid stock symbol or API error")]
    InvalidSymbol,

    /// The provider throttled the credential.
    #[error("API rate limit reached. Please try again in a minute.")]
    RateLimited,

    /// The provider answered, but without a quote for the symbol.
    #[error("No data found for this symbol")]
    NoData,

    /// The request could not be completed (connect, TLS, I/O).
    #[error("request failed: {0}")]
    Transport(String),

    /// The payload arrived but could not be interpreted.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl MarketDataError {
    /// Whether the message is safe to show the user verbatim.
    ///
    /// Transport and parse details are logged and replaced with a generic
    /// message at the boundary.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InvalidSymbol | Self::RateLimited | Self::NoData
        )
    }
}

/// Market-data lookup port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Fetch the current quote and daily history for `symbol`.
    ///
    /// # Errors
    ///
    /// Returns a `MarketDataError` when the provider rejects the symbol,
    /// throttles the credential, has no data, or cannot be reached.
    async fn stock_data(&self, symbol: &Symbol) -> Result<StockData, MarketDataError>;
}
