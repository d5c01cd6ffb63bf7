//! GeoIP 数据模型
//!
//! - `LookupKey`: 校验过的 IP 字符串，同时作为缓存 key 和上游查询参数
//! - `GeoData`: 上游返回的完整地理信息
//! - `GeoRecord`: 对外暴露的精简结果（city / region / country）

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{GeoLookupError, Result};

/// A validated IP address in its original textual form
///
/// The text is kept verbatim: `::1` and `0:0:0:0:0:0:0:1` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey(String);

impl LookupKey {
    /// Validate `raw` as an IPv4 (dotted quad) or IPv6 address
    pub fn parse(raw: &str) -> Result<Self> {
        let valid = if raw.contains(':') {
            raw.parse::<Ipv6Addr>().is_ok()
        } else if raw.contains('.') {
            raw.parse::<Ipv4Addr>().is_ok()
        } else {
            false
        };

        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(GeoLookupError::invalid_key(format!(
                "'{}' is not a valid IPv4 or IPv6 address",
                raw
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LookupKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Upstream geolocation payload (`data.geo`)
///
/// 字段类型漂移（如 `metro_code` 返回数字）不会让整个响应解析失败
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoData {
    #[serde(deserialize_with = "lenient_string")]
    pub host: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub ip: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub rdns: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub isp: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub country_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub country_code: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub region_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub region_code: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub postal_code: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub continent_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub continent_code: Option<String>,
    /// 上游可能返回数字或字符串
    pub latitude: Option<serde_json::Value>,
    pub longitude: Option<serde_json::Value>,
    #[serde(deserialize_with = "lenient_string")]
    pub metro_code: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub timezone: Option<String>,
    pub datetime: Option<serde_json::Value>,
}

/// Strings pass through, numbers and booleans are stringified, anything else is `None`
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// `{status, description, data: {geo: {...}}}`
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamEnvelope {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub description: String,
    pub data: EnvelopeData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeData {
    pub geo: GeoData,
}

/// Decode an upstream response body; any shape mismatch is a `Decode` error
pub fn decode_envelope(body: &str) -> Result<UpstreamEnvelope> {
    serde_json::from_str::<UpstreamEnvelope>(body).map_err(|e| {
        GeoLookupError::decode(format!("malformed upstream response body: {}", e))
    })
}

/// Coarse geolocation handed back to callers and stored in the cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoRecord {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

/// Project the upstream payload onto city / region / country
///
/// Everything else in `GeoData` is dropped; missing fields stay `None`.
impl From<GeoData> for GeoRecord {
    fn from(geo: GeoData) -> Self {
        Self {
            city: geo.city,
            region: geo.region_name,
            country: geo.country_name,
        }
    }
}
