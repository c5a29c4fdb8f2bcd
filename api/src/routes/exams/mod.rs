//! `/exams` route group (staff only): exam scheduling and the exam-session
//! state machine (`pending -> active -> ended`).

pub mod common;
pub mod get;
pub mod post;

use crate::auth::guards::{allow_staff, validate_known_ids};
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use util::state::AppState;

use get::{get_exam, get_exam_students, list_exams, list_sessions};
use post::{create_exam, create_session, end_session, start_session};

/// - `GET|POST /exams`
/// - `GET /exams/{exam_id}`
/// - `GET /exams/{exam_id}/students`
/// - `GET|POST /exams/{exam_id}/sessions`
/// - `POST /exams/{exam_id}/sessions/{session_id}/start`
/// - `POST /exams/{exam_id}/sessions/{session_id}/end`
pub fn exams_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_exams).post(create_exam))
        .route("/{exam_id}", get(get_exam))
        .route("/{exam_id}/students", get(get_exam_students))
        .route("/{exam_id}/sessions", get(list_sessions).post(create_session))
        .route("/{exam_id}/sessions/{session_id}/start", post(start_session))
        .route("/{exam_id}/sessions/{session_id}/end", post(end_session))
        .route_layer(from_fn_with_state(app_state.clone(), validate_known_ids))
        .route_layer(from_fn_with_state(app_state, allow_staff))
}
