use chrono::{DateTime, Utc};

use crate::domain::entry::Entry;

/// Surrogate key of an identity record.
pub type UserId = i32;

/// Registered diary owner.
///
/// `password_hash` only ever holds a bcrypt hash; nothing in the HTTP layer
/// serializes this struct directly.
#[derive(Clone, Debug)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Empty unless the user was loaded with its entries.
    pub entries: Vec<Entry>,
}

impl User {
    /// Looks an entry up in the loaded collection only.
    pub fn entry(&self, entry_id: i32) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }
}
