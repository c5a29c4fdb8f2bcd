use crate::auth::AuthUser;
use crate::response::{ApiResponse, ApiResult};
use crate::routes::announcements::AnnouncementResponse;
use crate::routes::common::service_failure;
use crate::routes::exams::common::ExamResponse;
use crate::routes::students::common::CommandResponse;
use axum::{Extension, extract::State};
use services::{
    announcement_service::AnnouncementService, command_service::CommandService,
    exam_service::ExamService, student_service::StudentService,
};
use util::state::AppState;

/// GET /client/commands
///
/// The student's unexecuted commands in the order they must be run.
pub async fn pending_commands(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> ApiResult<Vec<CommandResponse>> {
    match CommandService::pending(app_state.db(), claims.sub).await {
        Ok(rows) => ApiResponse::ok(
            rows.into_iter().map(CommandResponse::from).collect(),
            "Pending commands retrieved",
        ),
        Err(e) => service_failure(e),
    }
}

/// GET /client/commands/next
///
/// Head of the queue, or `null` when there is nothing to run.
pub async fn next_command(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> ApiResult<Option<CommandResponse>> {
    match CommandService::next(app_state.db(), claims.sub).await {
        Ok(next) => ApiResponse::ok(next.map(CommandResponse::from), "Next command retrieved"),
        Err(e) => service_failure(e),
    }
}

/// GET /client/announcements
pub async fn my_announcements(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> ApiResult<Vec<AnnouncementResponse>> {
    let db = app_state.db();
    let student = match StudentService::get(db, claims.sub).await {
        Ok(s) => s,
        Err(e) => return service_failure(e),
    };
    match AnnouncementService::for_student(db, &student).await {
        Ok(rows) => ApiResponse::ok(
            rows.into_iter().map(AnnouncementResponse::from).collect(),
            "Announcements retrieved",
        ),
        Err(e) => service_failure(e),
    }
}

/// GET /client/exams
pub async fn my_exams(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> ApiResult<Vec<ExamResponse>> {
    let db = app_state.db();
    let student = match StudentService::get(db, claims.sub).await {
        Ok(s) => s,
        Err(e) => return service_failure(e),
    };
    match ExamService::for_student(db, &student).await {
        Ok(rows) => ApiResponse::ok(
            rows.into_iter().map(ExamResponse::from).collect(),
            "Exams retrieved",
        ),
        Err(e) => service_failure(e),
    }
}
