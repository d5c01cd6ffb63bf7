//! geolookup - IP geolocation lookup service
//!
//! Resolves an IP address to city / region / country through a rate-limited
//! upstream provider, with a TTL cache in front of it and an audit trail of
//! every upstream lookup.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line interface
//!
//! # Architecture
//! - `services`: lookup model, upstream fetcher with retry, cache-aside service
//! - `cache`: lookup cache backends (memory / moka / none)
//! - `storage`: lookup recorders (sea-orm / no-op)
//! - `api`: HTTP handlers
//! - `interfaces` + `client`: CLI commands and the HTTP client they use
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: logging setup

pub mod api;
pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
