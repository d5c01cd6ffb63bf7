//! HTTP client for the `lookup` subcommand
//!
//! Talks to a running server's `/api/lookup/{ip}` endpoint over ureq.

mod lookup_client;

pub use lookup_client::{ClientError, LookupClient, RemoteLookup};
