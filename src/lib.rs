//! # Diary API
//!
//! A small multi-user diary service: accounts with bcrypt-hashed passwords,
//! stateless JWT authentication and per-user diary entries.
//!
//! ## Architecture
//!
//! - **domain**: models, DTOs and repository ports
//! - **application**: credential store and entry store
//! - **infrastructure**: database (SeaORM), password hashing and JWT
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime bootstrap and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod support;

pub use config::AppConfig;
pub use infrastructure::{init_database, DatabaseConfig};
pub use interfaces::http::{create_api_router, AppState};
