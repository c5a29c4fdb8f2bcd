//! `/monitoring`: live view of every client session and a manual trigger for
//! the background sweep.

use crate::auth::guards::allow_staff;
use crate::response::{ApiResponse, ApiResult};
use crate::routes::common::service_failure;
use crate::routes::students::common::{SessionResponse, StudentResponse};
use crate::sweeper::{SweepOutcome, run_sweep};
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use chrono::Utc;
use db::models::student_session::SessionStatus;
use serde::{Deserialize, Serialize};
use services::heartbeat_service::{HeartbeatService, MonitoredSession};
use std::str::FromStr;
use util::state::AppState;

/// - `GET /monitoring` → `get_overview`
/// - `POST /monitoring/sweep` → `trigger_sweep`
pub fn monitoring_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_overview))
        .route("/sweep", post(trigger_sweep))
        .route_layer(from_fn_with_state(app_state, allow_staff))
}

#[derive(Debug, Default, Deserialize)]
pub struct OverviewQuery {
    /// `online` | `idle` | `offline`
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct MonitoredSessionResponse {
    #[serde(flatten)]
    pub session: SessionResponse,
    pub student: Option<StudentResponse>,
}

impl From<MonitoredSession> for MonitoredSessionResponse {
    fn from(m: MonitoredSession) -> Self {
        Self {
            session: m.session.into(),
            student: m.student.map(StudentResponse::from),
        }
    }
}

/// GET /monitoring
///
/// Every device session with its student, optionally filtered by `?status=`.
pub async fn get_overview(
    State(app_state): State<AppState>,
    Query(q): Query<OverviewQuery>,
) -> ApiResult<Vec<MonitoredSessionResponse>> {
    let status = match q.status.as_deref().map(SessionStatus::from_str).transpose() {
        Ok(s) => s,
        Err(_) => {
            return ApiResponse::fail(
                StatusCode::BAD_REQUEST,
                "Status must be one of 'online', 'idle' or 'offline'",
            );
        }
    };

    match HeartbeatService::overview(app_state.db(), status).await {
        Ok(rows) => ApiResponse::ok(
            rows.into_iter().map(MonitoredSessionResponse::from).collect(),
            "Sessions retrieved",
        ),
        Err(e) => service_failure(e),
    }
}

/// POST /monitoring/sweep
///
/// Runs one sweep now instead of waiting for the next tick.
///
/// ```json
/// { "success": true, "data": { "idled": 1, "offlined": 0, "exams_ended": 0 }, "message": "Sweep completed" }
/// ```
pub async fn trigger_sweep(State(app_state): State<AppState>) -> ApiResult<SweepOutcome> {
    match run_sweep(&app_state, Utc::now()).await {
        Ok(outcome) => ApiResponse::ok(outcome, "Sweep completed"),
        Err(e) => service_failure(e),
    }
}
