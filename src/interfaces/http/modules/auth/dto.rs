//! Authentication DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::User;
use crate::interfaces::http::modules::entries::EntryDto;

/// Credentials for registration and login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AuthenticationInput {
    #[serde(default)]
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    #[serde(rename = "ID")]
    pub id: i32,
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
    pub username: String,
    #[serde(rename = "Entries")]
    pub entries: Vec<EntryDto>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            username: user.username.clone(),
            entries: user.entries.iter().map(EntryDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub user: UserDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub jwt: String,
}
