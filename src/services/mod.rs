//! Service layer
//!
//! `LookupService` composes the cache, the upstream fetcher and the recorder.
//! HTTP handlers and the CLI only talk to this layer.

pub mod geoip;
mod lookup_service;

pub use lookup_service::{LookupOutcome, LookupService, Provenance};
