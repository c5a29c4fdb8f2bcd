//! `/students` route group (staff only): roster management plus the
//! per-student monitoring views (sessions, commands, activity).

pub mod common;
pub mod get;
pub mod post;
pub mod put;

use crate::auth::guards::{allow_staff, validate_known_ids};
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, put},
};
use util::state::AppState;

use get::{get_activity, get_student, list_commands, list_sessions, list_students};
use post::{create_student, issue_command};
use put::update_status;

/// - `GET /students` → `list_students`
/// - `POST /students` → `create_student`
/// - `GET /students/{student_id}` → `get_student`
/// - `PUT /students/{student_id}/status` → `update_status`
/// - `GET /students/{student_id}/sessions` → `list_sessions`
/// - `GET /students/{student_id}/commands` → `list_commands`
/// - `POST /students/{student_id}/commands` → `issue_command`
/// - `GET /students/{student_id}/activity` → `get_activity`
pub fn students_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route("/{student_id}", get(get_student))
        .route("/{student_id}/status", put(update_status))
        .route("/{student_id}/sessions", get(list_sessions))
        .route("/{student_id}/commands", get(list_commands).post(issue_command))
        .route("/{student_id}/activity", get(get_activity))
        .route_layer(from_fn_with_state(app_state.clone(), validate_known_ids))
        .route_layer(from_fn_with_state(app_state, allow_staff))
}
