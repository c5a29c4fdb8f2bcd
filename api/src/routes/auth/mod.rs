//! `/auth` route group: staff registration, login, logout and profile.
//!
//! - `post.rs`: register, login, logout
//! - `get.rs`: current user

pub mod get;
pub mod post;

use crate::auth::guards::allow_staff;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use crate::routes::common::rfc3339;
use db::models::user;
use serde::Serialize;
use util::state::AppState;

use get::get_me;
use post::{login, logout, register};

/// - `POST /auth/register` → `register` (public)
/// - `POST /auth/login` → `login` (public)
/// - `POST /auth/logout` → `logout` (staff)
/// - `GET /auth/me` → `get_me` (staff)
pub fn auth_routes(app_state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", post(logout))
        .route("/me", get(get_me))
        .route_layer(from_fn_with_state(app_state, allow_staff));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}

#[derive(Debug, Serialize, Default)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub admin: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            admin: u.admin,
            created_at: rfc3339(u.created_at),
            updated_at: rfc3339(u.updated_at),
        }
    }
}

/// A user plus a freshly issued token.
#[derive(Debug, Serialize, Default)]
pub struct TokenResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub admin: bool,
    pub token: String,
    pub expires_at: String,
}
