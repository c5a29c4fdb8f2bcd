use crate::auth::guards::allow_staff;
use crate::response::{ApiResponse, ApiResult};
use crate::routes::common::service_failure;
use crate::routes::students::common::ActivityResponse;
use axum::{
    Router,
    extract::{Query, State},
    middleware::from_fn_with_state,
    routing::get,
};
use serde::{Deserialize, Serialize};
use services::dashboard_service::DashboardService;
use util::state::AppState;

const DEFAULT_RECENT: u64 = 10;
const MAX_RECENT: u64 = 100;

/// `GET /dashboard` (staff).
pub fn dashboard_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_dashboard))
        .route_layer(from_fn_with_state(app_state, allow_staff))
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub recent: Option<u64>,
}

#[derive(Debug, Serialize, Default)]
pub struct DashboardResponse {
    pub students: u64,
    pub active_students: u64,
    pub exams: u64,
    pub active_exam_sessions: u64,
    pub sessions_online: u64,
    pub sessions_idle: u64,
    pub sessions_offline: u64,
    pub recent_activity: Vec<ActivityResponse>,
}

/// GET /dashboard
///
/// Headline counts plus the latest activity across all students
/// (`?recent=N`, default 10, max 100).
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    Query(q): Query<DashboardQuery>,
) -> ApiResult<DashboardResponse> {
    let recent = q.recent.unwrap_or(DEFAULT_RECENT).clamp(1, MAX_RECENT);

    match DashboardService::summary(app_state.db(), recent).await {
        Ok(s) => ApiResponse::ok(
            DashboardResponse {
                students: s.students,
                active_students: s.active_students,
                exams: s.exams,
                active_exam_sessions: s.active_exam_sessions,
                sessions_online: s.sessions_online,
                sessions_idle: s.sessions_idle,
                sessions_offline: s.sessions_offline,
                recent_activity: s
                    .recent_activity
                    .into_iter()
                    .map(ActivityResponse::from)
                    .collect(),
            },
            "Dashboard retrieved",
        ),
        Err(e) => service_failure(e),
    }
}
