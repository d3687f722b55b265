//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{CredentialStore, EntryStore};
use crate::infrastructure::crypto::TokenService;
use crate::interfaces::http::common::ErrorBody;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};

use super::modules::{auth, entries, health};

/// Shared state for every route. Handlers and middleware pick their own
/// slice through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<CredentialStore>,
    pub entries: Arc<EntryStore>,
    pub tokens: Arc<TokenService>,
    pub db: DatabaseConnection,
    pub started_at: Arc<Instant>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        credentials: CredentialStore,
        entries: EntryStore,
        tokens: TokenService,
    ) -> Self {
        Self {
            credentials: Arc::new(credentials),
            entries: Arc::new(entries),
            tokens: Arc::new(tokens),
            db,
            started_at: Arc::new(Instant::now()),
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(s: &AppState) -> Self {
        AuthState {
            tokens: Arc::clone(&s.tokens),
            credentials: Arc::clone(&s.credentials),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        entries::add_entry,
        entries::get_all_entries,
        entries::get_entry,
    ),
    components(
        schemas(
            ErrorBody,
            auth::AuthenticationInput,
            auth::UserDto,
            auth::RegisterResponse,
            auth::LoginResponse,
            entries::EntryInput,
            entries::EntryDto,
            entries::EntryDataResponse,
            entries::EntryListResponse,
            entries::EntryResponse,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "Account registration and JWT login"),
        (name = "Entries", description = "Diary entries of the authenticated user"),
    ),
    info(
        title = "Diary API",
        version = "1.0.0",
        description = "Personal diary REST API with JWT authentication"
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Protected
    let entry_routes = Router::new()
        .route(
            "/entry",
            get(entries::get_all_entries).post(entries::add_entry),
        )
        .route("/entry/{id}", get(entries::get_entry))
        .route_layer(middleware::from_fn_with_state(
            AuthState::from_ref(&state),
            auth_middleware,
        ));

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .nest("/auth", auth_routes)
        .nest("/api", entry_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
