//! Configuration module
//!
//! Settings come from the process environment, optionally seeded from an
//! env file (`.env.<APP_ENV>`, `APP_ENV` defaulting to `local`). They are
//! resolved once at startup and treated as read-only afterwards.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::infrastructure::crypto::password::{DEFAULT_COST, MAX_COST, MIN_COST};
use crate::infrastructure::crypto::JwtConfig;
use crate::infrastructure::DatabaseConfig;

/// Port the API listens on unless overridden from the command line.
pub const DEFAULT_PORT: u16 = 8000;

const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to load env file {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub security: SecuritySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// Fully resolved connection URL
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseSettings {
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
        }
    }
}

#[derive(Clone)]
pub struct SecuritySettings {
    pub jwt_secret: String,
    /// `None` when `TOKEN_TTL` is unset; token issuance refuses to run then.
    pub token_ttl_seconds: Option<i64>,
    pub bcrypt_cost: u32,
}

impl std::fmt::Debug for SecuritySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecuritySettings")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl SecuritySettings {
    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt_secret.clone(),
            ttl_seconds: self.token_ttl_seconds,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

impl AppConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server = ServerSettings {
            host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: DEFAULT_PORT,
        };

        let url = match get("DATABASE_URL") {
            Some(url) => url,
            None => {
                let host = get("DB_HOST").ok_or(ConfigError::Missing("DB_HOST"))?;
                let user = get("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?;
                let name = get("DB_NAME").ok_or(ConfigError::Missing("DB_NAME"))?;
                let port: u16 = parse_var("DB_PORT", get("DB_PORT"))?.unwrap_or(DEFAULT_DB_PORT);
                match get("DB_PASSWORD") {
                    Some(password) => {
                        format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, name)
                    }
                    None => format!("postgres://{}@{}:{}/{}", user, host, port, name),
                }
            }
        };
        let database = DatabaseSettings {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"))?
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
        };

        let bcrypt_cost: u32 = parse_var("BCRYPT_COST", get("BCRYPT_COST"))?.unwrap_or(DEFAULT_COST);
        if !(MIN_COST..=MAX_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                var: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
                reason: format!("must be between {} and {}", MIN_COST, MAX_COST),
            });
        }
        let security = SecuritySettings {
            jwt_secret: lookup("JWT_PRIVATE_KEY").unwrap_or_default(),
            token_ttl_seconds: parse_var("TOKEN_TTL", get("TOKEN_TTL"))?,
            bcrypt_cost,
        };

        let format = match get("LOG_FORMAT").map(|f| f.to_lowercase()).as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "LOG_FORMAT",
                    value: other.to_string(),
                    reason: "expected \"text\" or \"json\"".into(),
                })
            }
        };
        let logging = LoggingSettings {
            level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            format,
        };

        Ok(Self {
            server,
            database,
            security,
            logging,
        })
    }
}

fn parse_var<T>(var: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                var,
                value: raw.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

/// `.env.<APP_ENV>` in the working directory, `APP_ENV` defaulting to `local`.
pub fn default_env_file() -> PathBuf {
    let env = std::env::var("APP_ENV")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "local".to_string());
    PathBuf::from(format!(".env.{}", env))
}

/// Load variables from `path` into the process environment. Variables that
/// are already set win over the file.
pub fn load_env_file(path: &Path) -> Result<(), ConfigError> {
    dotenvy::from_path(path).map_err(|source| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    })
}
