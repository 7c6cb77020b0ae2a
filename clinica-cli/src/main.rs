//! clinica CLI - run the dual-backend records service
//!
//! This is the entry point for the `clinica` binary:
//! - `serve` starts the HTTP server against the configured backends
//! - `config init` / `config path` manage the configuration file

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use clinica_core::config::ClinicaConfig;
use clinica_server::{run_server, ServerConfig};

/// Starter configuration written by `clinica config init`.
const STARTER_CONFIG: &str = r#"[server]
bind_addr = "127.0.0.1:3400"

# Two relational backends; exactly one must be the default. URLs can be
# overridden per deployment with CLINICA_BACKEND_<IDENTIFIER>_URL.

[[backends]]
identifier = "records-a"
url = "postgres://clinica@localhost/doctors"
max_connections = 5
default = true
records = ["doctor"]

[[backends]]
identifier = "records-b"
url = "postgres://clinica@localhost/patients"
max_connections = 5
records = ["patient"]
"#;

#[derive(Parser, Debug)]
#[command(
    name = "clinica",
    author,
    version,
    about = "Medical records service with per-record-type database routing"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Config file path (defaults to $CLINICA_CONFIG or ~/.clinica/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the bind address from the config file
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Allow any CORS origin (development only)
        #[arg(long)]
        cors_permissive: bool,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write a starter config file
    Init,
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            bind,
            cors_permissive,
        } => serve(config, bind, cors_permissive).await,
        Commands::Config { command } => match command {
            ConfigCommands::Init => config_init(),
            ConfigCommands::Path => {
                println!("{}", ClinicaConfig::config_path().display());
                Ok(())
            }
        },
    }
}

async fn serve(
    config_path: Option<PathBuf>,
    bind: Option<SocketAddr>,
    cors_permissive: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => ClinicaConfig::load_from(&path)?,
        None => ClinicaConfig::load()?,
    };

    let server = ServerConfig {
        bind_addr: bind.unwrap_or(config.server.bind_addr),
        cors_permissive,
    };

    info!(backends = config.backends.len(), "starting clinica");
    run_server(config, server).await?;
    Ok(())
}

fn config_init() -> Result<()> {
    let path = ClinicaConfig::config_path();

    if path.exists() {
        anyhow::bail!("Config already exists at {:?}", path);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .context(format!("Failed to create config directory: {:?}", parent))?;
    }

    fs::write(&path, STARTER_CONFIG)
        .context(format!("Failed to write config file: {:?}", path))?;

    println!("Wrote starter config to {}", path.display());
    println!("Edit the backend URLs, then run: clinica serve");
    Ok(())
}
