//! Identity module: registration & credential checks

pub mod service;

pub use service::{normalize_username, CredentialStore};
