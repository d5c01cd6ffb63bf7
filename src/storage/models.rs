use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::geoip::LookupKey;

/// 一次上游查询的审计记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRecord {
    pub ip_address: String,
    pub lookup_time: DateTime<Utc>,
    pub success: bool,
}

impl LookupRecord {
    pub fn new(key: &LookupKey, success: bool) -> Self {
        Self {
            ip_address: key.as_str().to_string(),
            lookup_time: Utc::now(),
            success,
        }
    }

    pub fn succeeded(key: &LookupKey) -> Self {
        Self::new(key, true)
    }

    pub fn failed(key: &LookupKey) -> Self {
        Self::new(key, false)
    }
}
