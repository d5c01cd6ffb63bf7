use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Initializes from `config.toml` + environment on first use, so callers
/// never observe an uninitialized config.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::load(None)))
        .load_full()
}

/// Initialize the global configuration from an explicit TOML path
///
/// Only the first call loads; later calls are no-ops.
pub fn init_config_from(path: Option<&str>) {
    CONFIG.get_or_init(|| ArcSwap::from_pointee(StaticConfig::load(path)));
}

/// Load `.env` from the working directory, falling back to the executable's directory
///
/// Returns the file that was loaded, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    if let Ok(path) = dotenvy::dotenv() {
        return Some(path);
    }

    let exe_env = std::env::current_exe()
        .ok()?
        .parent()
        .map(|dir| dir.join(".env"))?;

    dotenvy::from_path(&exe_env).ok().map(|_| exe_env)
}
