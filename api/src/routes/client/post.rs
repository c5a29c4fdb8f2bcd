use super::{ActivityRequest, ClientLoginRequest, ClientTokenResponse, ExecutedRequest, HeartbeatRequest};
use crate::auth::{AuthUser, Role, generate_jwt, guards::Empty};
use crate::response::{ApiResponse, ApiResult};
use crate::routes::common::{service_failure, validation_failure};
use crate::routes::students::common::{ActivityResponse, CommandResponse, SessionResponse};
use axum::{
    Extension, Json,
    extract::{ConnectInfo, Path, State},
    http::{Extensions, StatusCode},
};
use chrono::Utc;
use services::{
    activity_service::ActivityService,
    command_service::CommandService,
    heartbeat_service::{Heartbeat, HeartbeatService, HeartbeatThresholds, parse_timestamp},
    student_service::StudentService,
};
use std::net::SocketAddr;
use util::state::AppState;
use validator::Validate;

/// POST /client/login
///
/// Signs a student's exam client in, marks the student `active` and logs a
/// `login` activity.
///
/// ```json
/// { "email": "jdoe@school.edu", "password": "initial-pass", "device_name": "lab3-pc07" }
/// ```
///
/// - `200 OK` with `{ student, token, expires_at }`
/// - `401 Unauthorized` on bad credentials
pub async fn client_login(
    State(app_state): State<AppState>,
    Json(req): Json<ClientLoginRequest>,
) -> ApiResult<ClientTokenResponse> {
    if let Err(errors) = req.validate() {
        return validation_failure(&errors);
    }

    let student = match StudentService::client_login(
        app_state.db(),
        &req.email,
        &req.password,
        req.device_name.as_deref(),
    )
    .await
    {
        Ok(s) => s,
        Err(e) => return service_failure(e),
    };

    let (token, expires_at) = match generate_jwt(student.id, false, Role::Student) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!(error = %e, student_id = student.id, "failed to sign client token");
            return ApiResponse::fail(StatusCode::INTERNAL_SERVER_ERROR, "Could not issue token");
        }
    };

    ApiResponse::ok(
        ClientTokenResponse {
            student: student.into(),
            token,
            expires_at,
        },
        "Login successful",
    )
}

/// POST /client/logout
///
/// Marks the student `inactive`, logs `logout` and revokes the token.
pub async fn client_logout(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> ApiResult<Empty> {
    if let Err(e) = StudentService::client_logout(app_state.db(), claims.sub).await {
        return service_failure(e);
    }
    app_state.revoked().revoke(claims.jti, claims.exp as i64);
    ApiResponse::ok(Empty, "Logged out")
}

/// POST /client/heartbeat
///
/// ```json
/// { "device_name": "lab3-pc07", "ip_address": "10.0.3.7", "timestamp": "2026-03-14T09:00:05Z" }
/// ```
///
/// Puts the device's session `online`. A malformed or far-future timestamp is
/// `400` and nothing is written.
pub async fn heartbeat(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    extensions: Extensions,
    Json(req): Json<HeartbeatRequest>,
) -> ApiResult<SessionResponse> {
    if let Err(errors) = req.validate() {
        return validation_failure(&errors);
    }

    let ip_address = match req.ip_address.filter(|ip| !ip.trim().is_empty()) {
        Some(ip) => ip,
        None => match extensions.get::<ConnectInfo<SocketAddr>>() {
            Some(ConnectInfo(addr)) => addr.ip().to_string(),
            None => {
                return ApiResponse::fail(StatusCode::BAD_REQUEST, "ip_address is required");
            }
        },
    };

    let thresholds = match HeartbeatThresholds::from_config() {
        Ok(t) => t,
        Err(e) => return service_failure(e),
    };

    let beat = Heartbeat {
        student_id: claims.sub,
        ip_address,
        device_name: req.device_name,
        timestamp: req.timestamp,
    };

    match HeartbeatService::record(app_state.db(), app_state.locks(), &thresholds, beat, Utc::now())
        .await
    {
        Ok(session) => ApiResponse::ok(session.into(), "Heartbeat recorded"),
        Err(e) => service_failure(e),
    }
}

/// POST /client/commands/{command_id}/executed
///
/// ```json
/// { "executed_at": "2026-03-14T09:01:00Z" }
/// ```
///
/// - `404` when the command is not this student's
/// - `409` when it was already executed or an older command is still pending
pub async fn report_executed(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(command_id): Path<i64>,
    Json(req): Json<ExecutedRequest>,
) -> ApiResult<CommandResponse> {
    let executed_at = match req.executed_at.as_deref() {
        Some(raw) => match parse_timestamp(raw) {
            Ok(at) => at,
            Err(e) => return service_failure(e),
        },
        None => Utc::now(),
    };

    match CommandService::report_executed(
        app_state.db(),
        app_state.locks(),
        claims.sub,
        command_id,
        executed_at,
    )
    .await
    {
        Ok(c) => ApiResponse::ok(c.into(), "Command marked as executed"),
        Err(e) => service_failure(e),
    }
}

/// POST /client/activity
///
/// ```json
/// { "activity_type": "tab_switch", "description": "Switched to browser" }
/// ```
///
/// `activity_type` must be one of `login`, `logout`, `tab_switch`, `idle`,
/// `command`, `exam_start`, `exam_end`, `violation`.
pub async fn record_activity(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<ActivityRequest>,
) -> ApiResult<ActivityResponse> {
    if let Err(errors) = req.validate() {
        return validation_failure(&errors);
    }

    match ActivityService::record_raw(
        app_state.db(),
        claims.sub,
        &req.activity_type,
        req.description.as_deref(),
    )
    .await
    {
        Ok(a) => ApiResponse::created(a.into(), "Activity recorded"),
        Err(e) => service_failure(e),
    }
}
