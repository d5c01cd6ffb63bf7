//! Lookup command

use std::time::Duration;

use colored::Colorize;

use crate::client::{ClientError, LookupClient};
use crate::config::get_config;
use crate::interfaces::cli::CliError;
use crate::services::geoip::LookupKey;

/// 客户端总超时：覆盖服务端最坏情况下的重试等待
const CLIENT_TIMEOUT: Duration = Duration::from_secs(60);

/// Query a running server for `ip` and print region / city / country
pub async fn lookup_ip(ip: String, server: Option<String>) -> Result<(), CliError> {
    // 本地先校验，避免无效请求打到服务端
    let key = LookupKey::parse(&ip)?;

    let base_url = server.unwrap_or_else(|| {
        let config = get_config();
        format!("http://{}:{}", config.server.host, config.server.port)
    });

    let client = LookupClient::new(&base_url, CLIENT_TIMEOUT);
    let result = tokio::task::spawn_blocking(move || client.lookup(key.as_str()))
        .await
        .map_err(|e| CliError::CommandError(format!("lookup task failed: {}", e)))?;

    match result {
        Ok(found) => {
            let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
            println!("{} {}", "IP:".bold(), ip.cyan());
            println!("  {} {}", "Region: ".green(), show(&found.record.region));
            println!("  {} {}", "City:   ".green(), show(&found.record.city));
            println!("  {} {}", "Country:".green(), show(&found.record.country));
            if let Some(cache) = found.cache_status {
                let retries = found
                    .upstream_retries
                    .map(|n| format!(", {} upstream retries", n))
                    .unwrap_or_default();
                println!("  {}", format!("(cache {}{})", cache, retries).dimmed());
            }
            Ok(())
        }
        Err(ClientError::Transport(msg)) => Err(CliError::CommandError(format!(
            "{} (is the server running at {}?)",
            msg, base_url
        ))),
        Err(e) => Err(CliError::CommandError(e.to_string())),
    }
}
