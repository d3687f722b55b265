//! Server runtime: tracing setup, database bootstrap, HTTP serving and
//! graceful shutdown.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::application::{CredentialStore, EntryStore};
use crate::config::{AppConfig, LogFormat, LoggingSettings};
use crate::infrastructure::crypto::TokenService;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::repositories::{EntryRepository, UserRepository};
use crate::infrastructure::init_database;
use crate::interfaces::http::{create_api_router, AppState};
use crate::support::shutdown::shutdown_signal;

pub type ServerResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Options for starting the diary API.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup.
    pub auto_migrate: bool,
}

impl ServerOptions {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            auto_migrate: true,
        }
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// configured level.
pub fn init_tracing(logging: &LoggingSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

/// Connect to the database and bring the schema up to date.
pub async fn prepare_database(options: &ServerOptions) -> ServerResult<DatabaseConnection> {
    let db_config = options.config.database.database_config();
    let db = init_database(&db_config).await.map_err(|e| {
        error!("Failed to connect to database: {}", e);
        e
    })?;

    if options.auto_migrate {
        info!("Running database migrations...");
        Migrator::up(&db, None).await.map_err(|e| {
            error!("Failed to run migrations: {}", e);
            e
        })?;
        info!("Migrations completed");
    }

    Ok(db)
}

/// Wire the stores and token service around an open connection.
pub fn build_state(config: &AppConfig, db: DatabaseConnection) -> AppState {
    let users = Arc::new(UserRepository::new(db.clone()));
    let entries = Arc::new(EntryRepository::new(db.clone()));

    let tokens = TokenService::new(config.security.jwt_config());
    match tokens.ttl_seconds() {
        Some(ttl) if ttl > 0 => info!("JWT configured with {}s token lifetime", ttl),
        _ => warn!("TOKEN_TTL is unset or not positive; logins will fail until it is fixed"),
    }

    AppState::new(
        db,
        CredentialStore::new(users, config.security.bcrypt_cost),
        EntryStore::new(entries),
        tokens,
    )
}

/// Run the API until SIGTERM/SIGINT, then drain requests and close the pool.
pub async fn run(options: ServerOptions) -> ServerResult<()> {
    info!("Starting diary API...");

    let db = prepare_database(&options).await?;
    let state = build_state(&options.config, db.clone());
    let app = create_api_router(state);

    let addr = options.config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("REST API server received shutdown signal");
        })
        .await?;

    if let Err(e) = db.close().await {
        warn!("Failed to close database connection: {}", e);
    }
    info!("Server stopped");
    Ok(())
}
