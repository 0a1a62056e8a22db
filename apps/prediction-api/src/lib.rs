#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Prediction API - Stock Quote & Trend Service
//!
//! An HTTP service that resolves a stock ticker to a quote and a 30-day
//! daily history, projects a naive linear-trend prediction over the next
//! seven days, and generates the chart path the front end renders.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Core market and prediction logic
//!   - `market`: Symbols, quotes, and daily price history
//!   - `prediction`: Trend estimation and confidence scoring
//!   - `chart`: Chart path generation with caller-supplied randomness
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: Interface a market-data provider must implement
//!   - `services`: Query orchestration and latest-result bookkeeping
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `alphavantage`: HTTP client for the external quote provider
//!   - `synthetic`: In-process fabricated quotes (demo configuration)
//!   - `http`: JSON boundary and health endpoints
//!   - `config`: Configuration loaded from environment variables
//!   - `telemetry`: Tracing setup
//!
//! # Data Flow
//!
//! ```text
//! POST /stock-data ──┐
//!                    │     ┌──────────────┐     ┌──────────────────┐
//!                    ├────►│  Prediction  │────►│  MarketDataPort  │──► Alpha Vantage
//! POST /predict   ──┘      │   Service    │     │  (live │ synth)  │──► Synthetic RNG
//!                          └──────────────┘     └──────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Core market and prediction types with no provider
/// dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::chart::{ChartPoint, PointKind};
pub use domain::market::{PricePoint, Quote, StockData, Symbol, SymbolError};
pub use domain::prediction::{Prediction, TrendEstimate};

// Application ports and services
pub use application::ports::{MarketDataError, MarketDataPort};
pub use application::services::PredictionService;

// Infrastructure config
pub use infrastructure::config::{
    AppConfig, ConfigError, Credentials, DataSource, ServerSettings, SyntheticSettings,
};

// Provider adapters
pub use infrastructure::alphavantage::AlphaVantageClient;
pub use infrastructure::synthetic::SyntheticMarketData;

// HTTP boundary (for integration tests)
pub use infrastructure::http::{ApiServer, ApiServerError, ApiState};
