use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use ureq::Agent;

use crate::services::geoip::GeoRecord;

/// Errors from the client layer
#[derive(Debug)]
pub enum ClientError {
    /// Server not reachable or body unreadable
    Transport(String),
    /// Server answered with an error envelope
    Server {
        status: u16,
        code: i32,
        message: String,
    },
    /// Response body did not match the expected shape
    Decode(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ClientError::Server {
                status,
                code,
                message,
            } => write!(f, "Server error {} ({}): {}", status, code, message),
            ClientError::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

#[derive(Deserialize)]
struct ErrorEnvelope {
    code: i32,
    message: String,
}

/// Lookup result as reported by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLookup {
    pub record: GeoRecord,
    /// `X-Cache` header (`HIT` / `MISS`)
    pub cache_status: Option<String>,
    /// `X-Upstream-Retries` header, present on MISS
    pub upstream_retries: Option<u32>,
}

pub struct LookupClient {
    agent: Agent,
    base_url: String,
}

impl LookupClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn lookup_url(&self, ip: &str) -> String {
        format!("{}/api/lookup/{}", self.base_url, ip)
    }

    /// Blocking call; run inside `spawn_blocking` from async code
    pub fn lookup(&self, ip: &str) -> Result<RemoteLookup, ClientError> {
        let url = self.lookup_url(ip);
        let resp = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| ClientError::Transport(format!("request to {} failed: {}", url, e)))?;

        let status = resp.status().as_u16();
        let header = |name: &str| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let cache_status = header("X-Cache");
        let upstream_retries = header("X-Upstream-Retries").and_then(|v| v.parse().ok());

        let body = resp
            .into_body()
            .read_to_string()
            .map_err(|e| ClientError::Transport(format!("failed to read body: {}", e)))?;

        if status != 200 {
            return Err(match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(env) => ClientError::Server {
                    status,
                    code: env.code,
                    message: env.message,
                },
                Err(_) => ClientError::Server {
                    status,
                    code: -1,
                    message: body,
                },
            });
        }

        let record = serde_json::from_str::<GeoRecord>(&body)
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        Ok(RemoteLookup {
            record,
            cache_status,
            upstream_retries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_url_trims_trailing_slash() {
        let client = LookupClient::new("http://127.0.0.1:3000/", Duration::from_secs(1));
        assert_eq!(
            client.lookup_url("8.8.8.8"),
            "http://127.0.0.1:3000/api/lookup/8.8.8.8"
        );
    }

    #[test]
    fn test_unreachable_server_is_transport_error() {
        let client = LookupClient::new("http://127.0.0.1:9", Duration::from_millis(500));
        assert!(matches!(
            client.lookup("8.8.8.8"),
            Err(ClientError::Transport(_))
        ));
    }
}
