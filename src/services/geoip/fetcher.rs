//! 上游查询 + 重试
//!
//! 上游服务限流（3 次/秒），失败后的等待时间随尝试次数线性增长：
//! `base_interval * (attempt + 1) * retry_factor`

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, trace, warn};

use super::model::{GeoData, LookupKey, decode_envelope};
use super::transport::{GeoTransport, UreqTransport};
use crate::config::{MIN_UPSTREAM_ATTEMPTS, UpstreamConfig};
use crate::errors::{GeoLookupError, Result};

const DEFAULT_RETRY_FACTOR: f64 = 2.0;

/// Bounded attempts with linearly scaled backoff
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_interval: Duration,
    retry_factor: f64,
}

impl RetryPolicy {
    /// `max_attempts` below 3 is raised to 3; a non-positive factor falls back to 2.0
    pub fn new(max_attempts: u32, base_interval: Duration, retry_factor: f64) -> Self {
        let retry_factor = if retry_factor.is_finite() && retry_factor > 0.0 {
            retry_factor
        } else {
            DEFAULT_RETRY_FACTOR
        };

        Self {
            max_attempts: max_attempts.max(MIN_UPSTREAM_ATTEMPTS),
            base_interval,
            retry_factor,
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self::new(
            config.max_retries,
            config.base_interval(),
            config.retry_factor,
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after attempt `attempt` (0-indexed) fails
    pub fn delay_after(&self, attempt: u32) -> Duration {
        // float -> int 转换自动饱和
        let nanos = self.base_interval.as_nanos() as f64 * f64::from(attempt + 1) * self.retry_factor;
        Duration::from_nanos(nanos.round() as u64)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            MIN_UPSTREAM_ATTEMPTS,
            Duration::from_millis(500),
            DEFAULT_RETRY_FACTOR,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    Failed(String),
}

/// One upstream call, kept only for logging and diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchAttempt {
    pub index: u32,
    pub outcome: AttemptOutcome,
    /// Sleep scheduled after this attempt; `None` on success or the last attempt
    pub backoff: Option<Duration>,
}

/// Successful fetch result
#[derive(Debug, Clone)]
pub struct Fetched {
    pub data: GeoData,
    /// Failed attempts consumed before the successful one
    pub retry_count: u32,
    pub attempts: Vec<FetchAttempt>,
}

pub struct Fetcher {
    transport: Arc<dyn GeoTransport>,
    policy: RetryPolicy,
    request_timeout: Duration,
}

impl Fetcher {
    pub fn new(
        transport: Arc<dyn GeoTransport>,
        policy: RetryPolicy,
        request_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            policy,
            request_timeout,
        }
    }

    /// Build a fetcher that talks to the configured upstream over HTTP
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self::new(
            Arc::new(UreqTransport::new(config)),
            RetryPolicy::from_config(config),
            config.request_timeout(),
        )
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Resolve `key` upstream
    ///
    /// An attempt succeeds only on a completed call with status 200. After
    /// `max_attempts` failures this returns `UpstreamUnavailable` carrying the
    /// last error. A 200 response whose body does not decode returns `Decode`
    /// without further attempts.
    pub async fn fetch(&self, key: &LookupKey) -> Result<Fetched> {
        let max_attempts = self.policy.max_attempts();
        let mut attempts = Vec::new();
        let mut last_error = String::new();

        for index in 0..max_attempts {
            trace!(
                "Upstream attempt {}/{} for {} via {}",
                index + 1,
                max_attempts,
                key,
                self.transport.name()
            );

            let failure =
                match tokio::time::timeout(self.request_timeout, self.transport.send(key)).await {
                    Ok(Ok(resp)) if resp.is_success() => {
                        attempts.push(FetchAttempt {
                            index,
                            outcome: AttemptOutcome::Success,
                            backoff: None,
                        });

                        let envelope = decode_envelope(&resp.body).inspect_err(|e| {
                            error!("Upstream returned 200 for {} but body is unusable: {}", key, e);
                        })?;

                        info!(
                            "Upstream lookup for {} succeeded after {} retries",
                            key, index
                        );
                        return Ok(Fetched {
                            data: envelope.data.geo,
                            retry_count: index,
                            attempts,
                        });
                    }
                    Ok(Ok(resp)) => format!("upstream returned status {}", resp.status),
                    Ok(Err(e)) => e.to_string(),
                    Err(_) => format!("request timed out after {:?}", self.request_timeout),
                };

            let is_last = index + 1 == max_attempts;
            let backoff = (!is_last).then(|| self.policy.delay_after(index));

            attempts.push(FetchAttempt {
                index,
                outcome: AttemptOutcome::Failed(failure.clone()),
                backoff,
            });

            if let Some(delay) = backoff {
                warn!(
                    "Upstream attempt {}/{} for {} failed: {}; retrying in {:?}",
                    index + 1,
                    max_attempts,
                    key,
                    failure,
                    delay
                );
                tokio::time::sleep(delay).await;
            }

            last_error = failure;
        }

        error!(
            "Upstream lookup for {} failed after {} attempts: {}",
            key, max_attempts, last_error
        );
        Err(GeoLookupError::upstream_unavailable(format!(
            "{} attempts failed, last error: {}",
            max_attempts, last_error
        )))
    }
}
