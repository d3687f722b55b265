//! Authentication middleware for Axum
//!
//! Turns `Authorization: <scheme> <token>` into a [`CurrentUser`] request
//! extension, or answers 401 before any handler runs.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use super::common::ApiError;
use crate::application::CredentialStore;
use crate::domain::{DomainResult, User};
use crate::infrastructure::crypto::TokenService;

/// Authentication state: token verification plus identity lookup
#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
    pub credentials: Arc<CredentialStore>,
}

/// The authenticated caller, loaded together with its entries.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Arc<User>);

/// The token part of an `Authorization` value. Anything but exactly two
/// space-separated parts yields an empty string.
pub fn token_from_header(value: &str) -> &str {
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_scheme), Some(token), None) => token,
        _ => "",
    }
}

async fn resolve_user(auth: &AuthState, token: &str) -> DomainResult<User> {
    let claims = auth.tokens.verify(token)?;
    let user_id = TokenService::extract_subject(&claims)?;
    auth.credentials.find_by_id(user_id, true).await
}

/// JWT authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(token_from_header)
        .unwrap_or_default()
        .to_owned();

    match resolve_user(&auth_state, &token).await {
        Ok(user) => {
            debug!(user_id = user.id, "Request authenticated");
            request.extensions_mut().insert(CurrentUser(Arc::new(user)));
            next.run(request).await
        }
        Err(e) => {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                reason = %e,
                "Rejected unauthenticated request"
            );
            ApiError::unauthorized().into_response()
        }
    }
}
