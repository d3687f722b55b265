//! Database entities module

pub mod entry;
pub mod user;

pub use entry::Entity as Entry;
pub use user::Entity as User;
