//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// geolookup - IP geolocation lookup service
#[derive(Parser)]
#[command(name = "geolookup")]
#[command(version)]
#[command(about = "IP geolocation lookup service with a TTL cache", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default when no command is given)
    Serve,

    /// Look up an IP address via a running server
    Lookup {
        /// IPv4 or IPv6 address
        ip: String,

        /// Server base URL (default: http://<server.host>:<server.port>)
        #[arg(long)]
        server: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lookup_with_server() {
        let cli = Cli::parse_from([
            "geolookup",
            "-c",
            "custom.toml",
            "lookup",
            "8.8.8.8",
            "--server",
            "http://localhost:9000",
        ]);

        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
        match cli.command {
            Some(Commands::Lookup { ip, server }) => {
                assert_eq!(ip, "8.8.8.8");
                assert_eq!(server.as_deref(), Some("http://localhost:9000"));
            }
            _ => panic!("expected lookup command"),
        }
    }

    #[test]
    fn test_no_command_means_server() {
        let cli = Cli::parse_from(["geolookup"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_config_generate_force() {
        let cli = Cli::parse_from(["geolookup", "config", "generate", "out.toml", "--force"]);
        match cli.command {
            Some(Commands::Config {
                action: ConfigCommands::Generate { output_path, force },
            }) => {
                assert_eq!(output_path.as_deref(), Some("out.toml"));
                assert!(force);
            }
            _ => panic!("expected config generate"),
        }
    }
}
