//! # alphaess - AlphaESS Open API client
//!
//! An async client for the AlphaESS cloud API covering battery storage
//! telemetry and charge/discharge control.
//!
//! ## Features
//!
//! - **Signed requests**: SHA-512 signature headers rebuilt for every call
//! - **Two-tier failures**: transport problems are errors, unsuccessful API
//!   envelopes are absent values
//! - **Aggregation**: one composite record per system, fetched strictly in
//!   sequence with a configurable pause between calls
//! - **Schedule control**: charge and discharge window updates
//! - **Configuration**: YAML-based configuration with validation
//!
//! ## Architecture
//!
//! - `signer`: per-request authentication headers
//! - `envelope`: `{msg, data}` response interpretation
//! - `transport`: HTTP exchange and session ownership
//! - `client`: signed GET/POST, endpoint reads and the credential probe
//! - `aggregator`: the per-system enrichment pipeline
//! - `settings`: charge/discharge configuration writes
//! - `config`: configuration management and validation
//! - `logging`: structured logging and tracing

pub mod aggregator;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod settings;
pub mod signer;
pub mod transport;

// Re-export commonly used types
pub use aggregator::{AggregationStep, Device};
pub use client::AlphaEssClient;
pub use config::Config;
pub use error::{AlphaEssError, Result};
pub use settings::{ChargeSettings, DischargeSettings, TimeWindow};
pub use signer::Credentials;
