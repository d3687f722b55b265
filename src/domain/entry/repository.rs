use async_trait::async_trait;

use super::{CreateEntryDto, Entry};
use crate::domain::DomainResult;

#[async_trait]
pub trait EntryRepositoryInterface: Send + Sync {
    async fn create_entry(&self, dto: CreateEntryDto) -> DomainResult<Entry>;
}
