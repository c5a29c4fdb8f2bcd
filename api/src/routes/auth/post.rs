use super::TokenResponse;
use crate::auth::{AuthUser, Role, generate_jwt};
use crate::response::{ApiResponse, ApiResult};
use crate::routes::common::{service_failure, validation_failure};
use crate::auth::guards::Empty;
use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::Deserialize;
use services::user_service::{RegisterUser, UserService};
use std::borrow::Cow;
use util::state::AppState;
use validator::{Validate, ValidationError};

/// Letters, digits, `.`, `_` and `-` only.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        Ok(())
    } else {
        Err(ValidationError::new("username").with_message(Cow::Borrowed(
            "Username may only contain letters, digits, '.', '_' and '-'",
        )))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 50, message = "Username must be 3-50 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username or email.
    #[validate(length(min = 1, message = "Username or email is required"))]
    pub identifier: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

fn issue_token(
    id: i64,
    username: String,
    email: String,
    admin: bool,
) -> Result<TokenResponse, ApiResult<TokenResponse>> {
    let (token, expires_at) = generate_jwt(id, admin, Role::Staff).map_err(|e| {
        tracing::error!(error = %e, user_id = id, "failed to sign token");
        ApiResponse::fail(StatusCode::INTERNAL_SERVER_ERROR, "Could not issue token")
    })?;
    Ok(TokenResponse {
        id,
        username,
        email,
        admin,
        token,
        expires_at,
    })
}

/// POST /auth/register
///
/// Creates a staff account and signs it in. The first account ever registered
/// becomes an admin.
///
/// ### Request Body
/// ```json
/// { "username": "proctor1", "email": "proctor1@school.edu", "password": "longenough" }
/// ```
///
/// ### Responses
/// - `201 Created` with `{ id, username, email, admin, token, expires_at }`
/// - `400 Bad Request` on validation failure
/// - `409 Conflict` when the username or email is taken
pub async fn register(
    State(app_state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<TokenResponse> {
    if let Err(errors) = req.validate() {
        return validation_failure(&errors);
    }

    let params = RegisterUser {
        username: req.username,
        email: req.email,
        password: req.password,
    };
    let user = match UserService::register(app_state.db(), params).await {
        Ok(u) => u,
        Err(e) => return service_failure(e),
    };

    match issue_token(user.id, user.username, user.email, user.admin) {
        Ok(body) => ApiResponse::created(body, "User registered successfully"),
        Err(failure) => failure,
    }
}

/// POST /auth/login
///
/// ### Request Body
/// ```json
/// { "identifier": "proctor1", "password": "longenough" }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ id, username, email, admin, token, expires_at }`
/// - `401 Unauthorized` on bad credentials
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<TokenResponse> {
    if let Err(errors) = req.validate() {
        return validation_failure(&errors);
    }

    let user = match UserService::authenticate(app_state.db(), &req.identifier, &req.password).await {
        Ok(u) => u,
        Err(e) => return service_failure(e),
    };

    tracing::info!(user_id = user.id, "staff login");
    match issue_token(user.id, user.username, user.email, user.admin) {
        Ok(body) => ApiResponse::ok(body, "Login successful"),
        Err(failure) => failure,
    }
}

/// POST /auth/logout
///
/// Revokes the presented token until it would have expired anyway.
pub async fn logout(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> ApiResult<Empty> {
    app_state.revoked().revoke(claims.jti, claims.exp as i64);
    tracing::info!(user_id = claims.sub, "staff logout");
    ApiResponse::ok(Empty, "Logged out")
}
