use clap::Parser;

use geolookup::cli::{Cli, Commands};
use geolookup::config::{get_config, init_config_from, load_dotenv};
use geolookup::runtime::modes;
use geolookup::system::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 先于配置加载，使其中的 GEO__* 变量生效
    let dotenv_path = load_dotenv();

    let cli = Cli::parse();
    init_config_from(cli.config.as_deref());

    match cli.command {
        None | Some(Commands::Serve) => {
            let config = get_config();
            let _guard = init_logging(&config.logging);
            if let Some(path) = dotenv_path {
                tracing::debug!("Loaded environment from {}", path.display());
            }

            if let Err(e) = modes::run_server().await {
                tracing::error!("Server exited with error: {:#}", e);
                return Err(e);
            }
        }
        Some(cmd) => {
            if let Err(e) = modes::run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
