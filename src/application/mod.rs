//! Application layer: the credential and entry stores.

pub mod diary;
pub mod identity;

pub use diary::EntryStore;
pub use identity::CredentialStore;
