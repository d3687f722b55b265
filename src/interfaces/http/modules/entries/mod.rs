//! Diary entries module: create, list and fetch

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
