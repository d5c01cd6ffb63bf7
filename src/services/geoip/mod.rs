//! GeoIP 服务模块
//!
//! 提供 IP 地址地理位置查询的上游部分：
//! - 数据模型（LookupKey / GeoData / GeoRecord）
//! - 上游传输（ureq）
//! - 带退避重试的 Fetcher

mod fetcher;
mod model;
mod transport;

pub use fetcher::{AttemptOutcome, FetchAttempt, Fetched, Fetcher, RetryPolicy};
pub use model::{EnvelopeData, GeoData, GeoRecord, LookupKey, UpstreamEnvelope, decode_envelope};
pub use transport::{GeoTransport, TransportError, TransportResponse, UreqTransport};
