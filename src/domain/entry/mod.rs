//! Diary entry aggregate

pub mod model;
pub mod repository;

mod dto_create;

pub use model::Entry;

pub use dto_create::CreateEntryDto;

pub use repository::EntryRepositoryInterface;
