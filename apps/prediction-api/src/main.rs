//! Prediction API Binary
//!
//! Starts the stock quote and trend-prediction service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin prediction-api
//! ```
//!
//! # Environment Variables
//!
//! ## Required (live data source)
//! - `ALPHA_VANTAGE_API_KEY`: quote provider API key
//!
//! ## Optional
//! - `STOCKAI_DATA_SOURCE`: "live" | "synthetic" (default: live)
//! - `STOCKAI_API_PORT`: boundary HTTP port (default: 8080)
//! - `STOCKAI_SYNTHETIC_LATENCY_MS`: artificial delay for synthetic
//!   responses (default: 600)
//! - `RUST_LOG`: log level (default: info)

use std::sync::Arc;

use prediction_api::infrastructure::telemetry;
use prediction_api::{
    AlphaVantageClient, ApiServer, ApiState, AppConfig, ConfigError, DataSource, MarketDataPort,
    PredictionService, SyntheticMarketData,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    telemetry::init();

    tracing::info!("Starting Prediction API");

    let config = AppConfig::from_env()?;
    log_config(&config);

    let shutdown_token = CancellationToken::new();

    let provider: Arc<dyn MarketDataPort> = match config.data_source {
        DataSource::Live => {
            let Some(credentials) = config.credentials.clone() else {
                return Err(
                    ConfigError::MissingEnvVar("ALPHA_VANTAGE_API_KEY".to_string()).into(),
                );
            };
            Arc::new(AlphaVantageClient::new(credentials))
        }
        DataSource::Synthetic => {
            Arc::new(SyntheticMarketData::new().with_latency(config.synthetic.latency))
        }
    };

    let service = PredictionService::new(provider);
    let state = Arc::new(ApiState::new(
        service,
        config.data_source,
        env!("CARGO_PKG_VERSION").to_string(),
    ));

    let server = ApiServer::new(config.server.api_port, state, shutdown_token.clone());
    let server_handle = tokio::spawn(server.run());

    await_shutdown(shutdown_token.clone()).await;
    shutdown_token.cancel();

    server_handle.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Log the parsed configuration.
fn log_config(config: &AppConfig) {
    tracing::info!(
        data_source = config.data_source.as_str(),
        api_port = config.server.api_port,
        "Configuration loaded"
    );
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("signal handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C"),
        () = terminate => tracing::info!("Received SIGTERM"),
        () = shutdown_token.cancelled() => {}
    }
}
