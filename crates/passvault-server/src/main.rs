//! Passvault server
//!
//! Serves the vault API over HTTP. The shared secret comes from the
//! environment (`PASSVAULT_SECRET`, then `SECRET`), optionally via `.env`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use passvault_core::application::Vault;
use passvault_core::config::Config;
use passvault_core::storage::Database;
use passvault_server::build_router;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "passvault-server", about = "Personal vault HTTP server", version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Listen address override
        #[arg(short, long)]
        listen: Option<String>,

        /// Database path override
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run health check
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("passvault=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => cmd_serve(cli.config, None, None).await,
        Some(Commands::Serve { listen, database }) => cmd_serve(cli.config, listen, database).await,
        Some(Commands::Config { action }) => cmd_config(cli.config, action, cli.quiet),
        Some(Commands::Doctor) => cmd_doctor(cli.config, cli.quiet).await,
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn cmd_serve(
    config_path: Option<PathBuf>,
    listen: Option<String>,
    database: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = load_config(config_path.as_ref())?;

    if let Some(listen) = listen {
        config.server.listen_addr = listen;
    }
    if let Some(database) = database {
        config.database.path = database;
    }
    config.validate()?;

    let db = Database::new(config.database_config()).await?;
    let vault = Vault::open(&config, &db)?;
    let app = build_router(vault);

    info!(
        listen = %config.server.listen_addr,
        database = %config.database.path.display(),
        "Starting passvault server"
    );

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cmd_config(config_path: Option<PathBuf>, action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    let custom_path = config_path.is_some();
    let path = match config_path {
        Some(path) => path,
        None => Config::config_path()?,
    };

    match action {
        ConfigAction::Get { key } => {
            let config = Config::load_from(&path)?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_from(&path)?;
            config.set(&key, &value)?;
            config.validate()?;
            config.save_to(&path)?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load_from(&path)?;
            for (key, value) in config.list()? {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            if !custom_path {
                Config::reset()?;
            } else if path.exists() {
                std::fs::remove_file(&path)?;
            }
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn cmd_doctor(config_path: Option<PathBuf>, quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("Passvault Health Check");
        println!("======================");
        println!();
    }

    let mut all_ok = true;

    let config = match load_config(config_path.as_ref()).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => {
            if !quiet {
                println!("[OK] Configuration: Valid");
            }
            config
        }
        Err(e) => {
            if !quiet {
                println!("[!!] Configuration: Error - {}", e);
            }
            anyhow::bail!("health check failed");
        }
    };

    match config.auth.resolved_secret() {
        Ok(_) => {
            if !quiet {
                println!("[OK] Secret: Configured");
            }
        }
        Err(e) => {
            all_ok = false;
            warn!("Secret not configured");
            if !quiet {
                println!("[!!] Secret: {}", e);
                println!("     Set PASSVAULT_SECRET or SECRET environment variable");
            }
        }
    }

    match Database::new(config.database_config()).await {
        Ok(db) => {
            let status = db.migration_status().await?;
            db.health_check().await?;
            if !quiet {
                println!(
                    "[OK] Database: {} (schema v{}/{})",
                    db.path().display(),
                    status.current_version,
                    status.target_version
                );
            }
            db.close().await;
        }
        Err(e) => {
            all_ok = false;
            if !quiet {
                println!("[!!] Database: Error - {}", e);
            }
        }
    }

    if !quiet {
        println!();
    }

    if all_ok {
        if !quiet {
            println!("All checks passed.");
        }
        Ok(())
    } else {
        anyhow::bail!("health check failed")
    }
}
