//! HTTP Boundary
//!
//! The JSON surface consumed by the web front end, plus liveness and
//! health endpoints.
//!
//! # Endpoints
//!
//! - `POST /stock-data` - Quote and 30-day history for a symbol
//! - `POST /predict` - Trend prediction with a fresh chart path
//! - `GET /health` - Returns JSON health status
//! - `GET /healthz` - Liveness probe (simple OK)
//!
//! Every boundary failure surfaces as `400 {"error": "<message>"}`.
//! Invalid-symbol, rate-limit, and no-data messages pass through
//! verbatim; transport and parse details are logged and replaced with a
//! generic message.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::application::ports::MarketDataError;
use crate::application::services::PredictionService;
use crate::domain::chart::{self, ChartPoint};
use crate::domain::market::{StockData, Symbol};
use crate::domain::prediction::Prediction;
use crate::infrastructure::config::DataSource;

/// Message used for transport and parse failures.
const GENERIC_FAILURE: &str = "Failed to fetch stock data";

// =============================================================================
// Request / Response Types
// =============================================================================

/// Boundary request body.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolRequest {
    /// Free-text ticker; trimmed and uppercased before use.
    #[serde(default)]
    pub symbol: String,
}

/// Boundary error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Message shown to the user.
    pub error: String,
}

/// Prediction response: the prediction plus a disposable chart path.
#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    /// The computed prediction.
    #[serde(flatten)]
    pub prediction: Prediction,
    /// Chart points, regenerated with fresh randomness per request.
    pub chart: Vec<ChartPoint>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall status; this service is healthy whenever it can answer.
    pub status: &'static str,
    /// Service version.
    pub version: String,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
    /// Active data-sourcing strategy.
    pub data_source: &'static str,
}

// =============================================================================
// Server State
// =============================================================================

/// Shared state for the API server.
pub struct ApiState {
    service: PredictionService,
    data_source: DataSource,
    version: String,
    started_at: Instant,
}

impl ApiState {
    /// Create new API server state.
    #[must_use]
    pub fn new(service: PredictionService, data_source: DataSource, version: String) -> Self {
        Self {
            service,
            data_source,
            version,
            started_at: Instant::now(),
        }
    }
}

/// Build the boundary router over the given state.
#[must_use]
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/stock-data", post(stock_data_handler))
        .route("/predict", post(predict_handler))
        .route("/health", get(health_handler))
        .route("/healthz", get(liveness_handler))
        .with_state(state)
}

// =============================================================================
// API Server
// =============================================================================

/// Boundary HTTP server.
pub struct ApiServer {
    port: u16,
    state: Arc<ApiState>,
    cancel: CancellationToken,
}

impl ApiServer {
    /// Create a new API server.
    #[must_use]
    pub const fn new(port: u16, state: Arc<ApiState>, cancel: CancellationToken) -> Self {
        Self {
            port,
            state,
            cancel,
        }
    }

    /// Run the API server until cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ApiServerError` if binding fails or the HTTP server
    /// encounters a fatal error while running.
    pub async fn run(self) -> Result<(), ApiServerError> {
        let app = router(self.state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ApiServerError::BindFailed(self.port, e.to_string()))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(self.cancel.cancelled_owned())
            .await
            .map_err(|e| ApiServerError::ServerFailed(e.to_string()))?;

        tracing::info!("API server stopped");
        Ok(())
    }
}

// =============================================================================
// HTTP Handlers
// =============================================================================

async fn stock_data_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SymbolRequest>,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("stock_data", %request_id, symbol = %request.symbol);

    async move {
        match fetch_stock_data(&state, &request.symbol).await {
            Ok(data) => (StatusCode::OK, Json(data)).into_response(),
            Err(body) => (StatusCode::BAD_REQUEST, Json(body)).into_response(),
        }
    }
    .instrument(span)
    .await
}

async fn predict_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SymbolRequest>,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("predict", %request_id, symbol = %request.symbol);

    async move {
        match run_prediction(&state, &request.symbol).await {
            Ok(response) => (StatusCode::OK, Json(response)).into_response(),
            Err(body) => (StatusCode::BAD_REQUEST, Json(body)).into_response(),
        }
    }
    .instrument(span)
    .await
}

async fn health_handler(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy",
        version: state.version.clone(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        data_source: state.data_source.as_str(),
    };

    (StatusCode::OK, Json(response))
}

async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

// =============================================================================
// Handler Internals
// =============================================================================

async fn fetch_stock_data(state: &ApiState, raw_symbol: &str) -> Result<StockData, ErrorBody> {
    let symbol = parse_symbol(raw_symbol)?;
    state
        .service
        .stock_data(&symbol)
        .await
        .map_err(market_error_body)
}

async fn run_prediction(state: &ApiState, raw_symbol: &str) -> Result<PredictResponse, ErrorBody> {
    let symbol = parse_symbol(raw_symbol)?;
    let prediction = state
        .service
        .predict(&symbol)
        .await
        .map_err(market_error_body)?;

    let mut rng = rand::rng();
    let chart = chart::generate(
        prediction.current_price,
        prediction.predicted_price,
        &prediction.historical_data,
        &mut rng,
    );

    Ok(PredictResponse { prediction, chart })
}

fn parse_symbol(raw: &str) -> Result<Symbol, ErrorBody> {
    let symbol = Symbol::new(raw);
    symbol.validate().map_err(|e| ErrorBody {
        error: e.to_string(),
    })?;
    Ok(symbol)
}

fn market_error_body(error: MarketDataError) -> ErrorBody {
    if error.is_user_facing() {
        ErrorBody {
            error: error.to_string(),
        }
    } else {
        tracing::error!(error = %error, "provider failure");
        ErrorBody {
            error: GENERIC_FAILURE.to_string(),
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// API server errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiServerError {
    /// Failed to bind to port.
    #[error("failed to bind to port {0}: {1}")]
    BindFailed(u16, String),

    /// Server error.
    #[error("server error: {0}")]
    ServerFailed(String),
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_symbol_maps_to_required_message() {
        let body = parse_symbol("   ").unwrap_err();
        assert_eq!(body.error, "Stock symbol is required");
    }

    #[test]
    fn invalid_symbol_maps_to_provider_message() {
        let body = parse_symbol("AA PL").unwrap_err();
        assert_eq!(body.error, "Invalid stock symbol or API error");
    }

    #[test]
    fn user_facing_errors_pass_through_verbatim() {
        let body = market_error_body(MarketDataError::RateLimited);
        assert_eq!(
            body.error,
            "API rate limit reached. Please try again in a minute."
        );
    }

    #[test]
    fn transport_errors_map_to_generic_message() {
        let body = market_error_body(MarketDataError::Transport("connection refused".into()));
        assert_eq!(body.error, GENERIC_FAILURE);

        let body = market_error_body(MarketDataError::Malformed("unexpected token".into()));
        assert_eq!(body.error, GENERIC_FAILURE);
    }
}
