//! 查询结果缓存
//!
//! - `memory`: DashMap + 惰性过期 + 后台清理（默认）
//! - `moka`: moka future cache
//! - `none`: 禁用缓存

pub mod memory;
pub mod moka;
pub mod null;
pub mod register;
pub mod traits;

pub use memory::MemoryLookupCache;
pub use self::moka::MokaLookupCache;
pub use null::NullLookupCache;
pub use register::{CACHE_BACKENDS, CacheHandle, create_lookup_cache};
pub use traits::{CacheResult, InsertOutcome, LookupCache};
