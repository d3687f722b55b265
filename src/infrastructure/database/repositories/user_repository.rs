use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::debug;

use super::entry_repository::entry_model_to_domain;
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, Entry, User, UserId, UserRepositoryInterface,
};
use crate::infrastructure::database::entities::{entry, user};

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model, entries: Vec<Entry>) -> User {
    User {
        id: model.id,
        username: model.username,
        password_hash: model.password_hash,
        created_at: model.created_at,
        updated_at: model.updated_at,
        entries,
    }
}

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();
        let username = dto.username.clone();

        let new_user = user::ActiveModel {
            username: Set(dto.username),
            password_hash: Set(dto.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = new_user.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::DuplicateUsername(username)
            } else {
                DomainError::from(e)
            }
        })?;
        debug!(user_id = model.id, "User inserted");

        Ok(user_model_to_domain(model, Vec::new()))
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(model.map(|m| user_model_to_domain(m, Vec::new())))
    }

    async fn get_user_by_id(&self, id: UserId, include_entries: bool) -> DomainResult<Option<User>> {
        let Some(model) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let entries = if include_entries {
            model
                .find_related(entry::Entity)
                .order_by_asc(entry::Column::Id)
                .all(&self.db)
                .await?
                .into_iter()
                .map(entry_model_to_domain)
                .collect()
        } else {
            Vec::new()
        };

        Ok(Some(user_model_to_domain(model, entries)))
    }
}
