//! 上游 HTTP 传输层
//!
//! `GeoTransport` 只负责发出一次请求并返回状态码 + 原始 body，
//! 重试、退避和解码由 `Fetcher` 处理。

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;
use ureq::Agent;

use super::model::LookupKey;
use crate::config::UpstreamConfig;

/// Raw upstream response: status code and body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Connection-level failure (DNS, refused, TLS, timeout, unreadable body)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for TransportError {}

/// 单次上游调用
#[async_trait]
pub trait GeoTransport: Send + Sync {
    async fn send(&self, key: &LookupKey) -> Result<TransportResponse, TransportError>;

    /// transport 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// `GET <endpoint>?host=<ip>` via ureq
///
/// ureq 是同步客户端，请求在 `spawn_blocking` 中执行，
/// 只占用当前请求的任务，不会阻塞 runtime。
pub struct UreqTransport {
    agent: Agent,
    endpoint: String,
    user_agent: String,
}

impl UreqTransport {
    pub fn new(config: &UpstreamConfig) -> Self {
        Self::with_timeout(
            &config.endpoint,
            &config.user_agent,
            config.request_timeout(),
        )
    }

    pub fn with_timeout(endpoint: &str, user_agent: &str, timeout: Duration) -> Self {
        // 非 2xx 不当作 Err，状态码交给 Fetcher 判断
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            endpoint: endpoint.to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    fn send_sync(
        agent: &Agent,
        endpoint: &str,
        user_agent: &str,
        host: &str,
    ) -> Result<TransportResponse, TransportError> {
        let resp = agent
            .get(endpoint)
            .query("host", host)
            .header("User-Agent", user_agent)
            .call()
            .map_err(|e| TransportError(format!("request to {} failed: {}", endpoint, e)))?;

        let status = resp.status().as_u16();
        let body = resp
            .into_body()
            .read_to_string()
            .map_err(|e| TransportError(format!("failed to read body: {}", e)))?;

        trace!("Upstream responded {} ({} bytes)", status, body.len());
        Ok(TransportResponse { status, body })
    }
}

#[async_trait]
impl GeoTransport for UreqTransport {
    async fn send(&self, key: &LookupKey) -> Result<TransportResponse, TransportError> {
        let agent = self.agent.clone();
        let endpoint = self.endpoint.clone();
        let user_agent = self.user_agent.clone();
        let host = key.as_str().to_string();

        tokio::task::spawn_blocking(move || {
            Self::send_sync(&agent, &endpoint, &user_agent, &host)
        })
        .await
        .unwrap_or_else(|e| Err(TransportError(format!("spawn_blocking failed: {}", e))))
    }

    fn name(&self) -> &'static str {
        "ureq"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_response_success_is_exactly_200() {
        assert!(TransportResponse::new(200, "{}").is_success());
        assert!(!TransportResponse::new(201, "{}").is_success());
        assert!(!TransportResponse::new(429, "").is_success());
    }

    /// 依赖外部网络服务，CI 环境可能失败
    #[tokio::test]
    #[ignore]
    async fn test_ureq_transport_real_request() {
        let transport = UreqTransport::new(&UpstreamConfig::default());
        let key = LookupKey::parse("8.8.8.8").unwrap();

        let resp = transport.send(&key).await.expect("request should complete");
        assert!(resp.status > 0);
    }

    #[tokio::test]
    async fn test_ureq_transport_unreachable_host() {
        // 端口 9 (discard) 通常无人监听，连接会被拒绝或超时
        let transport = UreqTransport::with_timeout(
            "http://127.0.0.1:9/geo.json",
            "test-agent",
            Duration::from_millis(500),
        );
        let key = LookupKey::parse("8.8.8.8").unwrap();

        assert!(transport.send(&key).await.is_err());
    }
}
