pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod users;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{AuthService, TokenService};
use config::{Settings, API_V1_STR};
use users::{handlers, UserRepository, UserService};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_logado,
        handlers::signup,
        handlers::list_users,
        handlers::get_user,
        handlers::update_user,
        handlers::delete_user,
        handlers::login,
    ),
    components(
        schemas(
            users::models::UserResponse,
            users::models::UserWithArticles,
            users::models::Article,
            users::models::UserCreate,
            users::models::UserUpdate,
            users::models::LoginForm,
            users::models::TokenResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "usuarios", description = "User accounts and authentication")
    ),
    info(
        title = "Usuarios API",
        version = "1.0.0",
        description = "User management and bearer-token authentication"
    )
)]
pub struct ApiDoc;

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
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
}

impl AppState {
    /// Wire the services over a repository using the given settings
    pub fn new(repository: Arc<dyn UserRepository>, settings: &Settings) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(
                repository.clone(),
                TokenService::from_settings(settings),
            )),
            user_service: Arc::new(UserService::new(repository)),
        }
    }
}

/// Routes of the users resource, relative to its mount point
fn users_router() -> Router<AppState> {
    Router::new()
        .route("/logado", get(handlers::get_logado))
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route("/", get(handlers::list_users))
        .route(
            "/:id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
}

/// Creates and configures the application router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest(&format!("{}/usuarios", API_V1_STR), users_router())
        .route(&format!("{}/usuarios/", API_V1_STR), get(handlers::list_users))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
