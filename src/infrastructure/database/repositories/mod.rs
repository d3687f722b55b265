//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories.

pub mod entry_repository;
pub mod user_repository;

pub use entry_repository::EntryRepository;
pub use user_repository::UserRepository;
