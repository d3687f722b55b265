//! Diary API server
//!
//! ```sh
//! # Environment from .env.<APP_ENV> (APP_ENV defaults to "local")
//! diary-api
//!
//! # Explicit env file and port
//! diary-api --env-file /etc/diary/.env.production --port 8080
//!
//! # Validate configuration without starting
//! diary-api --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn};

use diary_api::config::{default_env_file, load_env_file, AppConfig};
use diary_api::server::{init_tracing, run, ServerOptions};

/// Personal diary REST API with JWT authentication.
#[derive(Parser, Debug)]
#[command(name = "diary-api", version, about = "Personal diary REST API")]
struct Cli {
    /// Env file to load before reading the environment.
    #[arg(short, long, env = "DIARY_ENV_FILE")]
    env_file: Option<PathBuf>,

    /// Override the listen port (default 8000).
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    // An explicit env file must exist; the default one is optional.
    let (env_path, explicit) = match cli.env_file {
        Some(path) => (path, true),
        None => (default_env_file(), false),
    };
    let env_result = load_env_file(&env_path);

    let mut config = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            if let Err(env_err) = &env_result {
                warn!("{}", env_err);
            }
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    init_tracing(&config.logging);

    match env_result {
        Ok(()) => info!("Environment loaded from {}", env_path.display()),
        Err(e) if explicit => {
            error!("{}", e);
            std::process::exit(1);
        }
        Err(e) => info!("No env file loaded ({})", e),
    }

    if cli.check {
        println!("Configuration is valid");
        println!("   Address   : {}", config.server.address());
        println!("   Database  : {} max connections", config.database.max_connections);
        println!("   Token TTL : {:?}", config.security.token_ttl_seconds);
        println!("   Log level : {}", config.logging.level);
        return Ok(());
    }

    let options = ServerOptions {
        auto_migrate: !cli.no_migrate,
        ..ServerOptions::new(config)
    };

    if let Err(e) = run(options).await {
        error!("Server error: {}", e);
        return Err(e);
    }
    Ok(())
}
