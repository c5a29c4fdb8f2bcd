use super::common::{
    ActivityQuery, ActivityResponse, CommandListQuery, CommandResponse, SessionResponse,
    StudentListQuery, StudentResponse,
};
use crate::response::{ApiResponse, ApiResult};
use crate::routes::common::{ListResponse, resolve_page, service_failure};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use db::models::student::StudentStatus;
use services::{
    activity_service::{ActivityService, parse_activity_type},
    command_service::CommandService,
    heartbeat_service::HeartbeatService,
    student_service::{StudentFilter, StudentService},
};
use std::str::FromStr;
use util::state::AppState;

/// GET /students
///
/// Paginated roster.
///
/// **Query**:
/// - `course_id`, `year_level`, `status` (`active` | `inactive`) *(optional filters)*
/// - `q` *(optional)*: partial match on username or email
/// - `sort` *(optional)*: comma separated `username`, `email`, `year_level`,
///   `status`, `created_at`; prefix `-` for descending
/// - `page` *(default 1)*, `per_page` *(default 20, max 100)*
///
/// ### Response
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "items": [
///       { "id": 4, "username": "jdoe", "email": "jdoe@school.edu", "course_id": 1,
///         "year_level": 2, "status": "active", "created_by": 1, "created_at": "2026-03-01T08:00:00+00:00" }
///     ],
///     "page": 1,
///     "per_page": 20,
///     "total": 1
///   },
///   "message": "Students retrieved"
/// }
/// ```
/// - `400 Bad Request` when `status` is not a known student status
pub async fn list_students(
    State(app_state): State<AppState>,
    Query(q): Query<StudentListQuery>,
) -> ApiResult<ListResponse<StudentResponse>> {
    let status = match q.status.as_deref().map(StudentStatus::from_str).transpose() {
        Ok(s) => s,
        Err(_) => {
            return ApiResponse::fail(
                StatusCode::BAD_REQUEST,
                "Status must be 'active' or 'inactive'",
            );
        }
    };
    let (page, per_page) = resolve_page(q.page, q.per_page);

    let filter = StudentFilter {
        course_id: q.course_id,
        year_level: q.year_level,
        status,
        query: q.q,
        sort: q.sort,
        page,
        per_page,
    };

    match StudentService::list(app_state.db(), &filter).await {
        Ok((rows, total)) => ApiResponse::ok(
            ListResponse::new(rows, page, per_page, total),
            "Students retrieved",
        ),
        Err(e) => service_failure(e),
    }
}

/// GET /students/{student_id}
///
/// ### Responses
/// - `200 OK` with the student
/// - `404 Not Found` when the id is unknown (rejected by the path guard)
pub async fn get_student(
    State(app_state): State<AppState>,
    Path(student_id): Path<i64>,
) -> ApiResult<StudentResponse> {
    match StudentService::get(app_state.db(), student_id).await {
        Ok(s) => ApiResponse::ok(s.into(), "Student retrieved"),
        Err(e) => service_failure(e),
    }
}

/// GET /students/{student_id}/sessions
///
/// Every device session the student has opened, most recent heartbeat first.
pub async fn list_sessions(
    State(app_state): State<AppState>,
    Path(student_id): Path<i64>,
) -> ApiResult<Vec<SessionResponse>> {
    match HeartbeatService::sessions_for_student(app_state.db(), student_id).await {
        Ok(rows) => ApiResponse::ok(
            rows.into_iter().map(SessionResponse::from).collect(),
            "Sessions retrieved",
        ),
        Err(e) => service_failure(e),
    }
}

/// GET /students/{student_id}/commands
///
/// Full command history, newest first. With `?pending=true` returns only the
/// unexecuted queue in delivery order.
pub async fn list_commands(
    State(app_state): State<AppState>,
    Path(student_id): Path<i64>,
    Query(q): Query<CommandListQuery>,
) -> ApiResult<Vec<CommandResponse>> {
    let db = app_state.db();
    let result = if q.pending {
        CommandService::pending(db, student_id).await
    } else {
        CommandService::history(db, student_id).await
    };

    match result {
        Ok(rows) => ApiResponse::ok(
            rows.into_iter().map(CommandResponse::from).collect(),
            "Commands retrieved",
        ),
        Err(e) => service_failure(e),
    }
}

/// GET /students/{student_id}/activity
///
/// **Query**: `type` *(optional, e.g. `tab_switch`)*, `page`, `per_page`.
/// Newest entries first. An unknown `type` is `400 Bad Request`.
pub async fn get_activity(
    State(app_state): State<AppState>,
    Path(student_id): Path<i64>,
    Query(q): Query<ActivityQuery>,
) -> ApiResult<ListResponse<ActivityResponse>> {
    let kind = match q.activity_type.as_deref().map(parse_activity_type).transpose() {
        Ok(k) => k,
        Err(e) => return service_failure(e),
    };
    let (page, per_page) = resolve_page(q.page, q.per_page);

    match ActivityService::for_student(app_state.db(), student_id, kind, page, per_page).await {
        Ok((rows, total)) => ApiResponse::ok(
            ListResponse::new(rows, page, per_page, total),
            "Activity retrieved",
        ),
        Err(e) => service_failure(e),
    }
}
