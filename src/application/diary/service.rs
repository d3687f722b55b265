//! Entry store: diary entries scoped to their owner

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    CreateEntryDto, DomainError, DomainResult, Entry, EntryRepositoryInterface, User, UserId,
};

pub struct EntryStore {
    repo: Arc<dyn EntryRepositoryInterface>,
}

impl EntryStore {
    pub fn new(repo: Arc<dyn EntryRepositoryInterface>) -> Self {
        Self { repo }
    }

    /// Persist a new entry owned by `owner_id`.
    pub async fn save(&self, content: String, owner_id: UserId) -> DomainResult<Entry> {
        let entry = self
            .repo
            .create_entry(CreateEntryDto {
                content,
                user_id: owner_id,
            })
            .await?;

        info!(entry_id = entry.id, user_id = owner_id, "Entry created");
        Ok(entry)
    }

    /// Find an entry in the owner's loaded collection. Entries of other users
    /// are never visible, so they are reported as not found.
    pub fn find_by_id<'a>(&self, owner: &'a User, entry_id: i32) -> DomainResult<&'a Entry> {
        owner
            .entry(entry_id)
            .ok_or_else(|| DomainError::not_found("entry", "id", entry_id))
    }
}
