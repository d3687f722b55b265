use async_trait::async_trait;

use super::{CreateUserDto, User, UserId};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Fails with `DomainError::DuplicateUsername` when the unique constraint rejects the row.
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_id(&self, id: UserId, include_entries: bool) -> DomainResult<Option<User>>;
}
