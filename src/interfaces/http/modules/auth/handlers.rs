//! Authentication API handlers

use axum::{extract::State, http::StatusCode, Json};
use tracing::{debug, info};

use super::dto::{AuthenticationInput, LoginResponse, RegisterResponse, UserDto};
use crate::interfaces::http::common::{ApiError, ErrorBody, ValidatedJson};
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = AuthenticationInput,
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "Validation error, duplicate username or storage failure", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<AuthenticationInput>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let user = state
        .credentials
        .register(&input.username, &input.password)
        .await
        .map_err(ApiError::bad_request)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserDto::from(&user),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = AuthenticationInput,
    responses(
        (status = 200, description = "Signed token", body = LoginResponse),
        (status = 400, description = "Validation error, unknown user or wrong password", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<AuthenticationInput>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .credentials
        .authenticate(&input.username, &input.password)
        .await
        .map_err(|e| {
            debug!(error = %e, "Login failed");
            ApiError::bad_request(e)
        })?;

    let jwt = state.tokens.issue(&user).map_err(ApiError::bad_request)?;
    info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse { jwt }))
}
