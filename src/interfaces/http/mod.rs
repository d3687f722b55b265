//! HTTP REST API interfaces
//!
//! - `common`: error body, JSON extractor with validation
//! - `middleware`: JWT authentication gate
//! - `modules`: handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, AppState};
