//! Alpha Vantage Adapter
//!
//! The live implementation of the market-data port. Two read-only HTTP
//! lookups per query (`GLOBAL_QUOTE` and the compact
//! `TIME_SERIES_DAILY`), keyed by an API credential from the
//! environment. Provider errors are signaled in-band and translated into
//! the port's error taxonomy.

mod client;
pub mod messages;

pub use client::{AlphaVantageClient, HISTORY_DAYS};
