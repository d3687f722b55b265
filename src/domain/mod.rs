//! Domain layer: models, DTOs and repository ports.

pub mod entry;
pub mod user;

pub use entry::{CreateEntryDto, Entry, EntryRepositoryInterface};
pub use user::{CreateUserDto, User, UserId, UserRepositoryInterface};

pub use crate::support::errors::{DomainError, DomainResult};
