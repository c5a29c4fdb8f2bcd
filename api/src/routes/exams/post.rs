use super::common::{CreateExamRequest, EndSessionResponse, ExamResponse, ExamSessionResponse};
use crate::auth::AuthUser;
use crate::response::{ApiResponse, ApiResult};
use crate::routes::common::{service_failure, validation_failure};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use services::exam_service::{ExamService, NewExam};
use util::state::AppState;
use validator::Validate;

/// POST /exams
///
/// ### Request Body
/// ```json
/// {
///   "room": "Lab 3",
///   "title": "Data Structures Midterm",
///   "duration": 90,
///   "exam_date": "2026-03-14",
///   "requirement": "Calculator allowed",
///   "target_course": 1,
///   "target_year_level": 2
/// }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` on validation failure or a malformed `exam_date`
/// - `404 Not Found` when `target_course` does not exist
pub async fn create_exam(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateExamRequest>,
) -> ApiResult<ExamResponse> {
    if let Err(errors) = req.validate() {
        return validation_failure(&errors);
    }

    let exam_date = match req.exam_date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(d) => Some(d),
            Err(_) => {
                return ApiResponse::fail(
                    StatusCode::BAD_REQUEST,
                    "exam_date must be formatted as YYYY-MM-DD",
                );
            }
        },
        None => None,
    };

    let params = NewExam {
        room: req.room,
        title: req.title,
        duration: req.duration,
        exam_date,
        requirement: req.requirement,
        target_course: req.target_course,
        target_year_level: req.target_year_level,
    };

    match ExamService::create(app_state.db(), claims.sub, params).await {
        Ok(e) => ApiResponse::created(e.into(), "Exam created"),
        Err(e) => service_failure(e),
    }
}

/// POST /exams/{exam_id}/sessions
///
/// Opens a new `pending` sitting of the exam.
pub async fn create_session(
    State(app_state): State<AppState>,
    Path(exam_id): Path<i64>,
) -> ApiResult<ExamSessionResponse> {
    match ExamService::create_session(app_state.db(), exam_id).await {
        Ok(s) => ApiResponse::created(s.into(), "Exam session created"),
        Err(e) => service_failure(e),
    }
}

/// POST /exams/{exam_id}/sessions/{session_id}/start
///
/// Moves a sitting from `pending` to `active`, stamps `started_at` and logs
/// an `exam_start` activity for every student in the exam's cohort.
///
/// # Arguments
/// - `exam_id`: the exam the sitting belongs to.
/// - `session_id`: the sitting to start.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": { "id": 3, "exam_id": 1, "status": "active",
///             "started_at": "2026-03-14T09:00:00+00:00", "ended_at": null },
///   "message": "Exam session started"
/// }
/// ```
/// - `404 Not Found` when the session does not belong to the exam
/// - `409 Conflict` when the session is not pending or the exam date has not
///   arrived
pub async fn start_session(
    State(app_state): State<AppState>,
    Path((exam_id, session_id)): Path<(i64, i64)>,
) -> ApiResult<ExamSessionResponse> {
    match ExamService::start_session(app_state.db(), exam_id, session_id, Utc::now()).await {
        Ok(s) => ApiResponse::ok(s.into(), "Exam session started"),
        Err(e) => service_failure(e),
    }
}

/// POST /exams/{exam_id}/sessions/{session_id}/end
///
/// `active -> ended`. Ending an already ended session succeeds with
/// `changed: false` and the original `ended_at`.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": { "id": 3, "exam_id": 1, "status": "ended",
///             "started_at": "2026-03-14T09:00:00+00:00",
///             "ended_at": "2026-03-14T10:30:00+00:00", "changed": true },
///   "message": "Exam session ended"
/// }
/// ```
/// - `409 Conflict` when the session is still pending
pub async fn end_session(
    State(app_state): State<AppState>,
    Path((exam_id, session_id)): Path<(i64, i64)>,
) -> ApiResult<EndSessionResponse> {
    match ExamService::end_session(app_state.db(), exam_id, session_id, Utc::now()).await {
        Ok(t) => {
            let message = if t.changed {
                "Exam session ended"
            } else {
                "Exam session was already ended"
            };
            ApiResponse::ok(
                EndSessionResponse {
                    session: t.session.into(),
                    changed: t.changed,
                },
                message,
            )
        }
        Err(e) => service_failure(e),
    }
}
