use chrono::{DateTime, Utc};

use crate::domain::UserId;

/// A single diary entry, always owned by exactly one user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub id: i32,
    pub content: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
