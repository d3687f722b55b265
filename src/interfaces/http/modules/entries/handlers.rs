//! Diary entry handlers. All routes sit behind the auth middleware.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{EntryDataResponse, EntryDto, EntryInput, EntryListResponse, EntryResponse};
use crate::domain::{DomainError, DomainResult};
use crate::interfaces::http::common::{ApiError, ErrorBody, ValidatedJson};
use crate::interfaces::http::middleware::CurrentUser;
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    post,
    path = "/api/entry",
    tag = "Entries",
    security(("bearer_auth" = [])),
    request_body = EntryInput,
    responses(
        (status = 201, description = "Entry created", body = EntryDataResponse),
        (status = 400, description = "Validation or storage failure", body = ErrorBody),
        (status = 401, description = "Authentication required", body = ErrorBody)
    )
)]
pub async fn add_entry(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidatedJson(input): ValidatedJson<EntryInput>,
) -> Result<(StatusCode, Json<EntryDataResponse>), ApiError> {
    let entry = state
        .entries
        .save(input.content, user.id)
        .await
        .map_err(ApiError::bad_request)?;

    Ok((
        StatusCode::CREATED,
        Json(EntryDataResponse {
            data: EntryDto::from(&entry),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/entry",
    tag = "Entries",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's entries", body = EntryListResponse),
        (status = 401, description = "Authentication required", body = ErrorBody)
    )
)]
pub async fn get_all_entries(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<EntryListResponse> {
    Json(EntryListResponse {
        data: user.entries.iter().map(EntryDto::from).collect(),
    })
}

#[utoipa::path(
    get,
    path = "/api/entry/{id}",
    tag = "Entries",
    security(("bearer_auth" = [])),
    params(("id" = u32, Path, description = "Entry ID")),
    responses(
        (status = 200, description = "The entry", body = EntryResponse),
        (status = 400, description = "Malformed entry id", body = ErrorBody),
        (status = 401, description = "Authentication required", body = ErrorBody),
        (status = 404, description = "No such entry among the caller's entries", body = ErrorBody)
    )
)]
pub async fn get_entry(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<EntryResponse>, ApiError> {
    let entry_id = parse_entry_id(&id)?;
    let entry = state.entries.find_by_id(&user, entry_id)?;

    Ok(Json(EntryResponse {
        entry: EntryDto::from(entry),
    }))
}

/// Entry ids are plain decimal digits; signs are malformed. Values beyond
/// the id column's range cannot match any entry.
fn parse_entry_id(raw: &str) -> DomainResult<i32> {
    let malformed = || DomainError::Validation(format!("invalid entry id: {:?}", raw));
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let id: u32 = raw.parse().map_err(|_| malformed())?;
    i32::try_from(id).map_err(|_| DomainError::not_found("entry", "id", id))
}
