use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing::debug;

use crate::domain::{CreateEntryDto, DomainResult, Entry, EntryRepositoryInterface};
use crate::infrastructure::database::entities::entry;

pub struct EntryRepository {
    db: DatabaseConnection,
}

impl EntryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn entry_model_to_domain(model: entry::Model) -> Entry {
    Entry {
        id: model.id,
        content: model.content,
        user_id: model.user_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[async_trait]
impl EntryRepositoryInterface for EntryRepository {
    async fn create_entry(&self, dto: CreateEntryDto) -> DomainResult<Entry> {
        let now = Utc::now();

        let new_entry = entry::ActiveModel {
            content: Set(dto.content),
            user_id: Set(dto.user_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = new_entry.insert(&self.db).await?;
        debug!(entry_id = model.id, user_id = model.user_id, "Entry inserted");

        Ok(entry_model_to_domain(model))
    }
}
