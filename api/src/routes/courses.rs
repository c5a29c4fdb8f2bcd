//! `/courses`: the course catalogue students, exams and announcements target.

use crate::auth::guards::{allow_admin, allow_staff};
use crate::response::{ApiResponse, ApiResult};
use crate::routes::common::{rfc3339, service_failure, validation_failure};
use axum::{
    Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use db::models::course;
use serde::{Deserialize, Serialize};
use services::course_service::CourseService;
use util::state::AppState;
use validator::Validate;

/// - `GET /courses` → `list_courses` (staff)
/// - `POST /courses` → `create_course` (admin)
pub fn courses_routes(app_state: AppState) -> Router<AppState> {
    let admin_only = Router::new()
        .route("/", post(create_course))
        .route_layer(from_fn_with_state(app_state.clone(), allow_admin));

    Router::new()
        .route("/", get(list_courses))
        .route_layer(from_fn_with_state(app_state, allow_staff))
        .merge(admin_only)
}

#[derive(Debug, Serialize, Default)]
pub struct CourseResponse {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub created_at: String,
}

impl From<course::Model> for CourseResponse {
    fn from(c: course::Model) -> Self {
        Self {
            id: c.id,
            code: c.code,
            name: c.name,
            created_at: rfc3339(c.created_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 20, message = "Course code must be 1-20 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 255, message = "Course name must be 1-255 characters"))]
    pub name: String,
}

/// GET /courses
///
/// All courses ordered by code.
pub async fn list_courses(State(app_state): State<AppState>) -> ApiResult<Vec<CourseResponse>> {
    match CourseService::list(app_state.db()).await {
        Ok(rows) => ApiResponse::ok(
            rows.into_iter().map(CourseResponse::from).collect(),
            "Courses retrieved",
        ),
        Err(e) => service_failure(e),
    }
}

/// POST /courses
///
/// ```json
/// { "code": "BSIT", "name": "BS Information Technology" }
/// ```
///
/// Codes are stored upper-case. A duplicate code is `409 Conflict`.
pub async fn create_course(
    State(app_state): State<AppState>,
    Json(req): Json<CreateCourseRequest>,
) -> ApiResult<CourseResponse> {
    if let Err(errors) = req.validate() {
        return validation_failure(&errors);
    }

    match CourseService::create(app_state.db(), &req.code, &req.name).await {
        Ok(c) => ApiResponse::created(c.into(), "Course created"),
        Err(e) => service_failure(e),
    }
}
