//! `/client` route group: the endpoints the exam client on a student's machine
//! talks to. Login is public. Everything else needs a student token.

pub mod get;
pub mod post;

use crate::auth::guards::{allow_student_client, validate_known_ids};
use crate::routes::students::common::StudentResponse;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

use get::{my_announcements, my_exams, next_command, pending_commands};
use post::{client_login, client_logout, heartbeat, record_activity, report_executed};

/// - `POST /client/login` (public)
/// - `POST /client/logout`
/// - `POST /client/heartbeat`
/// - `GET /client/commands`
/// - `GET /client/commands/next`
/// - `POST /client/commands/{command_id}/executed`
/// - `POST /client/activity`
/// - `GET /client/announcements`
/// - `GET /client/exams`
pub fn client_routes(app_state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", post(client_logout))
        .route("/heartbeat", post(heartbeat))
        .route("/commands", get(pending_commands))
        .route("/commands/next", get(next_command))
        .route("/commands/{command_id}/executed", post(report_executed))
        .route("/activity", post(record_activity))
        .route("/announcements", get(my_announcements))
        .route("/exams", get(my_exams))
        .route_layer(from_fn_with_state(app_state.clone(), validate_known_ids))
        .route_layer(from_fn_with_state(app_state, allow_student_client));

    Router::new()
        .route("/login", post(client_login))
        .merge(protected)
}

#[derive(Debug, Deserialize, Validate)]
pub struct ClientLoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(max = 100, message = "Device name must be at most 100 characters"))]
    pub device_name: Option<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct ClientTokenResponse {
    pub student: StudentResponse,
    pub token: String,
    pub expires_at: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct HeartbeatRequest {
    /// Falls back to the connection's peer address when omitted.
    pub ip_address: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Device name must be 1-100 characters"))]
    pub device_name: String,
    /// RFC 3339 or unix seconds. Omitted means "now".
    pub timestamp: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExecutedRequest {
    /// RFC 3339 or unix seconds. Omitted means "now".
    pub executed_at: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ActivityRequest {
    pub activity_type: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}
