pub mod cache;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod lookup;
pub mod types;

pub use cache::{CacheService, cache_routes};
pub use error_code::ErrorCode;
pub use health::{AppStartTime, HealthService, health_routes};
pub use lookup::{LookupHandler, lookup_routes};
pub use types::ApiResponse;
