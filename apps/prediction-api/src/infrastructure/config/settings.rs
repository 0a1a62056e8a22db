//! Service Configuration Settings
//!
//! Configuration types for the prediction API, loaded from environment
//! variables.

use std::time::Duration;

/// Where quote and history data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSource {
    /// Live quotes from the external provider (requires a credential).
    #[default]
    Live,
    /// In-process fabricated quotes (demo mode, no credential needed).
    Synthetic,
}

impl DataSource {
    /// Parse data source from string.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "synthetic" => Self::Synthetic,
            _ => Self::Live,
        }
    }

    /// Get the data source name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Synthetic => "synthetic",
        }
    }
}

/// Quote provider API credential.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Create new credentials.
    #[must_use]
    pub const fn new(api_key: String) -> Self {
        Self { api_key }
    }

    /// Get the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Server port settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Boundary HTTP port.
    pub api_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { api_port: 8080 }
    }
}

/// Synthetic provider settings.
#[derive(Debug, Clone)]
pub struct SyntheticSettings {
    /// Artificial delay before each fabricated response, modeling the
    /// network round-trip the live provider has.
    pub latency: Duration,
}

impl Default for SyntheticSettings {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(600),
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Data-sourcing strategy.
    pub data_source: DataSource,
    /// Provider credentials; present in the live configuration only.
    pub credentials: Option<Credentials>,
    /// Server port settings.
    pub server: ServerSettings,
    /// Synthetic provider settings.
    pub synthetic: SyntheticSettings,
}

impl AppConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the live data source is selected and the
    /// provider credential is missing or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_source = std::env::var("STOCKAI_DATA_SOURCE")
            .map(|s| DataSource::from_str_case_insensitive(&s))
            .unwrap_or_default();

        let credentials = match data_source {
            DataSource::Live => {
                let api_key = std::env::var("ALPHA_VANTAGE_API_KEY").map_err(|_| {
                    ConfigError::MissingEnvVar("ALPHA_VANTAGE_API_KEY".to_string())
                })?;

                if api_key.is_empty() {
                    return Err(ConfigError::EmptyValue("ALPHA_VANTAGE_API_KEY".to_string()));
                }

                Some(Credentials::new(api_key))
            }
            DataSource::Synthetic => None,
        };

        let server = ServerSettings {
            api_port: parse_env_u16("STOCKAI_API_PORT", ServerSettings::default().api_port),
        };

        let synthetic = SyntheticSettings {
            latency: parse_env_duration_millis(
                "STOCKAI_SYNTHETIC_LATENCY_MS",
                SyntheticSettings::default().latency,
            ),
        };

        Ok(Self {
            data_source,
            credentials,
            server,
            synthetic,
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
}

fn parse_env_u16(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_duration_millis(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_millis)
}
