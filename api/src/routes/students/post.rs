use super::common::{CommandRequest, CommandResponse, CreateStudentRequest, StudentResponse};
use crate::auth::AuthUser;
use crate::response::{ApiResponse, ApiResult};
use crate::routes::common::{service_failure, validation_failure};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use services::{
    command_service::CommandService,
    student_service::{NewStudent, StudentService},
};
use util::state::AppState;
use validator::Validate;

/// POST /students
///
/// Enrols a student. The signed-in staff user is recorded as the creator.
///
/// ### Request Body
/// ```json
/// {
///   "username": "jdoe",
///   "email": "jdoe@school.edu",
///   "password": "initial-pass",
///   "course_id": 1,
///   "year_level": 2
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the student (status `inactive`)
/// - `400 Bad Request` on validation failure
/// - `404 Not Found` when the course does not exist
/// - `409 Conflict` when the email is already enrolled
pub async fn create_student(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateStudentRequest>,
) -> ApiResult<StudentResponse> {
    if let Err(errors) = req.validate() {
        return validation_failure(&errors);
    }

    let params = NewStudent {
        username: req.username,
        email: req.email,
        password: req.password,
        course_id: req.course_id,
        year_level: req.year_level,
    };

    match StudentService::create(app_state.db(), claims.sub, params).await {
        Ok(s) => ApiResponse::created(s.into(), "Student created"),
        Err(e) => service_failure(e),
    }
}

/// POST /students/{student_id}/commands
///
/// Queues a command for the student's client and logs a `command` activity.
///
/// ```json
/// { "command": "lock_screen" }
/// ```
pub async fn issue_command(
    State(app_state): State<AppState>,
    Path(student_id): Path<i64>,
    Json(req): Json<CommandRequest>,
) -> ApiResult<CommandResponse> {
    if let Err(errors) = req.validate() {
        return validation_failure(&errors);
    }

    match CommandService::issue(app_state.db(), student_id, &req.command).await {
        Ok(c) => ApiResponse::created(c.into(), "Command queued"),
        Err(e) => service_failure(e),
    }
}
