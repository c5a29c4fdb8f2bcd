use super::common::{StatusRequest, StudentResponse};
use crate::response::{ApiResponse, ApiResult};
use crate::routes::common::service_failure;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::student::StudentStatus;
use services::student_service::StudentService;
use std::str::FromStr;
use util::state::AppState;

/// PUT /students/{student_id}/status
///
/// ```json
/// { "status": "active" }
/// ```
///
/// Activates or deactivates the student. Unknown statuses are `400`.
pub async fn update_status(
    State(app_state): State<AppState>,
    Path(student_id): Path<i64>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<StudentResponse> {
    let Ok(status) = StudentStatus::from_str(req.status.trim()) else {
        return ApiResponse::fail(
            StatusCode::BAD_REQUEST,
            "Status must be 'active' or 'inactive'",
        );
    };

    match StudentService::set_status(app_state.db(), student_id, status).await {
        Ok(s) => ApiResponse::ok(s.into(), "Student status updated"),
        Err(e) => service_failure(e),
    }
}
