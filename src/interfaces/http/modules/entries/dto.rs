//! Diary entry DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Entry;

/// Entry creation payload. Any owner field a client sends is ignored.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EntryInput {
    #[serde(default)]
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EntryDto {
    #[serde(rename = "ID")]
    pub id: i32,
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
    pub content: String,
    #[serde(rename = "UserID")]
    pub user_id: i32,
}

impl From<&Entry> for EntryDto {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
            content: entry.content.clone(),
            user_id: entry.user_id,
        }
    }
}

/// `{"data": Entry}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EntryDataResponse {
    pub data: EntryDto,
}

/// `{"data": [Entry, ...]}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EntryListResponse {
    pub data: Vec<EntryDto>,
}

/// `{"entry": Entry}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EntryResponse {
    pub entry: EntryDto,
}
