//! Infrastructure layer.
//!
//! Adapters and external integrations: the provider clients, the HTTP
//! boundary, configuration, and tracing setup.

pub mod alphavantage;
pub mod config;
pub mod http;
pub mod synthetic;
pub mod telemetry;
