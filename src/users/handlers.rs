// HTTP handlers for the /usuarios endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::extract::{FormBody, JsonBody};
use crate::users::models::{
    LoginForm, TokenResponse, UserCreate, UserResponse, UserUpdate, UserWithArticles,
};
use crate::AppState;

/// Profile of the logged-in user
/// GET /logado
#[utoipa::path(
    get,
    path = "/api/v1/usuarios/logado",
    responses(
        (status = 200, description = "Logged-in user", body = UserResponse),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    security(("bearer_auth" = [])),
    tag = "usuarios"
)]
pub async fn get_logado(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

/// Register a new user
/// POST /signup
#[utoipa::path(
    post,
    path = "/api/v1/usuarios/signup",
    request_body = UserCreate,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 406, description = "Email already registered"),
        (status = 422, description = "Invalid request body")
    ),
    tag = "usuarios"
)]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UserCreate>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    tracing::debug!("Signup request for {}", request.email);

    let user = state.user_service.signup(request).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// List every user
/// GET /
#[utoipa::path(
    get,
    path = "/api/v1/usuarios",
    responses(
        (status = 200, description = "All users", body = Vec<UserResponse>)
    ),
    tag = "usuarios"
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.user_service.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get a user with their articles
/// GET /{id}
#[utoipa::path(
    get,
    path = "/api/v1/usuarios/{id}",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserWithArticles),
        (status = 404, description = "User not found")
    ),
    tag = "usuarios"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserWithArticles>, ApiError> {
    tracing::debug!("Fetching user with id: {}", id);

    let profile = state.user_service.get(id).await?;
    Ok(Json(profile))
}

/// Partially update a user
/// PUT /{id}
#[utoipa::path(
    put,
    path = "/api/v1/usuarios/{id}",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UserUpdate,
    responses(
        (status = 202, description = "User updated", body = UserResponse),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 403, description = "Changing another user's password"),
        (status = 404, description = "User not found or not visible to the caller"),
        (status = 406, description = "Email already registered")
    ),
    security(("bearer_auth" = [])),
    tag = "usuarios"
)]
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i32>,
    JsonBody(patch): JsonBody<UserUpdate>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.user_service.update(&caller, id, patch).await?;
    Ok((StatusCode::ACCEPTED, Json(user.into())))
}

/// Delete a user (administrators only)
/// DELETE /{id}
#[utoipa::path(
    delete,
    path = "/api/v1/usuarios/{id}",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "usuarios"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.user_service.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Exchange email and password for a bearer token
/// POST /login
#[utoipa::path(
    post,
    path = "/api/v1/usuarios/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access token", body = TokenResponse),
        (status = 400, description = "Incorrect credentials")
    ),
    tag = "usuarios"
)]
pub async fn login(
    State(state): State<AppState>,
    FormBody(form): FormBody<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .auth_service
        .login(&form.username, &form.password)
        .await?;

    Ok(Json(token))
}
