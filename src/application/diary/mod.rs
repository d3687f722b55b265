pub mod service;

pub use service::EntryStore;
