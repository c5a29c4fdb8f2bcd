use super::common::{ExamListQuery, ExamResponse, ExamSessionResponse};
use crate::response::{ApiResponse, ApiResult};
use crate::routes::common::{ListResponse, resolve_page, service_failure};
use crate::routes::students::common::StudentResponse;
use axum::extract::{Path, Query, State};
use services::exam_service::{ExamFilter, ExamService};
use util::state::AppState;

/// GET /exams
///
/// **Query**: `course_id`, `year_level` *(optional)*, `page`, `per_page`.
/// Newest first.
pub async fn list_exams(
    State(app_state): State<AppState>,
    Query(q): Query<ExamListQuery>,
) -> ApiResult<ListResponse<ExamResponse>> {
    let (page, per_page) = resolve_page(q.page, q.per_page);
    let filter = ExamFilter {
        course_id: q.course_id,
        year_level: q.year_level,
        page,
        per_page,
    };

    match ExamService::list(app_state.db(), &filter).await {
        Ok((rows, total)) => ApiResponse::ok(
            ListResponse::new(rows, page, per_page, total),
            "Exams retrieved",
        ),
        Err(e) => service_failure(e),
    }
}

/// GET /exams/{exam_id}
pub async fn get_exam(
    State(app_state): State<AppState>,
    Path(exam_id): Path<i64>,
) -> ApiResult<ExamResponse> {
    match ExamService::get(app_state.db(), exam_id).await {
        Ok(e) => ApiResponse::ok(e.into(), "Exam retrieved"),
        Err(e) => service_failure(e),
    }
}

/// GET /exams/{exam_id}/students
///
/// Students currently in the exam's target course and year level.
pub async fn get_exam_students(
    State(app_state): State<AppState>,
    Path(exam_id): Path<i64>,
) -> ApiResult<Vec<StudentResponse>> {
    match ExamService::students(app_state.db(), exam_id).await {
        Ok(rows) => ApiResponse::ok(
            rows.into_iter().map(StudentResponse::from).collect(),
            "Exam students retrieved",
        ),
        Err(e) => service_failure(e),
    }
}

/// GET /exams/{exam_id}/sessions
pub async fn list_sessions(
    State(app_state): State<AppState>,
    Path(exam_id): Path<i64>,
) -> ApiResult<Vec<ExamSessionResponse>> {
    match ExamService::sessions(app_state.db(), exam_id).await {
        Ok(rows) => ApiResponse::ok(
            rows.into_iter().map(ExamSessionResponse::from).collect(),
            "Exam sessions retrieved",
        ),
        Err(e) => service_failure(e),
    }
}
