//! Configuration Module
//!
//! Configuration loading for the prediction API.

mod settings;

pub use settings::{
    AppConfig, ConfigError, Credentials, DataSource, ServerSettings, SyntheticSettings,
};
