//! `/announcements` route group (staff only). Announcements target a
//! course and year level; recipients are resolved from the live roster.

use crate::auth::{
    AuthUser,
    guards::{allow_staff, validate_known_ids},
};
use crate::response::{ApiResponse, ApiResult};
use crate::routes::common::{
    ListResponse, resolve_page, rfc3339, service_failure, validation_failure,
};
use crate::routes::students::common::StudentResponse;
use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    middleware::from_fn_with_state,
    routing::get,
};
use db::models::announcement;
use serde::{Deserialize, Serialize};
use services::announcement_service::{AnnouncementService, CreateAnnouncement};
use util::state::AppState;
use validator::Validate;

/// - `GET|POST /announcements`
/// - `GET /announcements/{announcement_id}`
/// - `GET /announcements/{announcement_id}/recipients`
pub fn announcements_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_announcements).post(create_announcement))
        .route("/{announcement_id}", get(get_announcement))
        .route("/{announcement_id}/recipients", get(get_recipients))
        .route_layer(from_fn_with_state(app_state.clone(), validate_known_ids))
        .route_layer(from_fn_with_state(app_state, allow_staff))
}

#[derive(Debug, Serialize, Default)]
pub struct AnnouncementResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub target_course: i64,
    pub target_year_level: i32,
    pub created_by: i64,
    pub created_at: String,
}

impl From<announcement::Model> for AnnouncementResponse {
    fn from(a: announcement::Model) -> Self {
        Self {
            id: a.id,
            title: a.title,
            content: a.content,
            target_course: a.target_course,
            target_year_level: a.target_year_level,
            created_by: a.created_by,
            created_at: rfc3339(a.created_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AnnouncementRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub target_course: i64,
    #[validate(range(min = 1, max = 10, message = "Year level must be between 1 and 10"))]
    pub target_year_level: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnnouncementListQuery {
    pub course_id: Option<i64>,
    pub year_level: Option<i32>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// GET /announcements
///
/// **Query**: `course_id`, `year_level` *(optional)*, `page`, `per_page`.
pub async fn list_announcements(
    State(app_state): State<AppState>,
    Query(q): Query<AnnouncementListQuery>,
) -> ApiResult<ListResponse<AnnouncementResponse>> {
    let (page, per_page) = resolve_page(q.page, q.per_page);
    match AnnouncementService::list(app_state.db(), q.course_id, q.year_level, page, per_page).await
    {
        Ok((rows, total)) => ApiResponse::ok(
            ListResponse::new(rows, page, per_page, total),
            "Announcements retrieved",
        ),
        Err(e) => service_failure(e),
    }
}

/// POST /announcements
///
/// ```json
/// { "title": "Room change", "content": "Midterm moves to Lab 4", "target_course": 1, "target_year_level": 2 }
/// ```
pub async fn create_announcement(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<AnnouncementRequest>,
) -> ApiResult<AnnouncementResponse> {
    if let Err(errors) = req.validate() {
        return validation_failure(&errors);
    }

    let params = CreateAnnouncement {
        title: req.title,
        content: req.content,
        target_course: req.target_course,
        target_year_level: req.target_year_level,
    };
    match AnnouncementService::create(app_state.db(), claims.sub, params).await {
        Ok(a) => ApiResponse::created(a.into(), "Announcement created"),
        Err(e) => service_failure(e),
    }
}

/// GET /announcements/{announcement_id}
pub async fn get_announcement(
    State(app_state): State<AppState>,
    Path(announcement_id): Path<i64>,
) -> ApiResult<AnnouncementResponse> {
    match AnnouncementService::get(app_state.db(), announcement_id).await {
        Ok(a) => ApiResponse::ok(a.into(), "Announcement retrieved"),
        Err(e) => service_failure(e),
    }
}

/// GET /announcements/{announcement_id}/recipients
pub async fn get_recipients(
    State(app_state): State<AppState>,
    Path(announcement_id): Path<i64>,
) -> ApiResult<Vec<StudentResponse>> {
    match AnnouncementService::recipients(app_state.db(), announcement_id).await {
        Ok(rows) => ApiResponse::ok(
            rows.into_iter().map(StudentResponse::from).collect(),
            "Recipients retrieved",
        ),
        Err(e) => service_failure(e),
    }
}
