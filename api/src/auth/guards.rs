use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Json,
    body::Body,
    extract::{FromRequestParts, Path, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use db::models::{
    announcement::Entity as AnnouncementEntity, exam::Entity as ExamEntity,
    exam_session::Entity as ExamSessionEntity, student::Entity as StudentEntity,
};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use std::collections::HashMap;
use util::state::AppState;

// --- Role Based Access Guards ---

#[derive(serde::Serialize, Default)]
pub struct Empty;

type GuardError = (StatusCode, Json<ApiResponse<Empty>>);

fn deny(status: StatusCode, message: impl Into<String>) -> GuardError {
    (status, Json(ApiResponse::error(message)))
}

/// Verifies the bearer token, rejects revoked ones and stores the claims in
/// the request extensions for handlers.
async fn extract_and_insert_authuser(
    app_state: &AppState,
    req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), GuardError> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| deny(StatusCode::UNAUTHORIZED, "Authentication required"))?;

    if app_state.revoked().is_revoked(&user.0.jti) {
        return Err(deny(StatusCode::UNAUTHORIZED, "Token has been revoked"));
    }

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

/// Any staff token.
pub async fn allow_staff(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let (req, user) = extract_and_insert_authuser(&app_state, req).await?;

    if !user.0.is_staff() {
        return Err(deny(StatusCode::FORBIDDEN, "Staff access required"));
    }

    Ok(next.run(req).await)
}

/// Staff token with the admin flag.
pub async fn allow_admin(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let (req, user) = extract_and_insert_authuser(&app_state, req).await?;

    if !(user.0.is_staff() && user.0.admin) {
        return Err(deny(StatusCode::FORBIDDEN, "Admin access required"));
    }

    Ok(next.run(req).await)
}

/// Student token issued by `POST /client/login`.
pub async fn allow_student_client(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let (req, user) = extract_and_insert_authuser(&app_state, req).await?;

    if !user.0.is_student() {
        return Err(deny(StatusCode::FORBIDDEN, "Student client access required"));
    }

    Ok(next.run(req).await)
}

// --- Path id validation ---

async fn check_exists<E>(
    db: &DatabaseConnection,
    id: i64,
    label: &str,
) -> Result<(), GuardError>
where
    E: EntityTrait,
    <E::PrimaryKey as sea_orm::PrimaryKeyTrait>::ValueType: From<i64>,
{
    match E::find_by_id(id).one(db).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(deny(StatusCode::NOT_FOUND, format!("{label} {id} not found"))),
        Err(e) => Err(db_failure(e)),
    }
}

async fn check_session_hierarchy(
    db: &DatabaseConnection,
    exam_id: i64,
    session_id: i64,
) -> Result<(), GuardError> {
    match ExamSessionEntity::find_by_id(session_id).one(db).await {
        Ok(Some(s)) if s.exam_id == exam_id => Ok(()),
        Ok(_) => Err(deny(
            StatusCode::NOT_FOUND,
            format!("Session {session_id} not found for exam {exam_id}"),
        )),
        Err(e) => Err(db_failure(e)),
    }
}

fn db_failure(err: DbErr) -> GuardError {
    tracing::error!(error = %err, "database error while validating path ids");
    deny(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
}

/// Parses every id in the matched path and 404s early on references that do
/// not exist, so handlers only see well-formed ids.
///
/// Known keys: `student_id`, `exam_id`, `session_id`, `announcement_id`,
/// `command_id`. Any other key is a 400.
pub async fn validate_known_ids(
    State(app_state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let db = app_state.db();

    let mut ids: HashMap<&str, i64> = HashMap::new();
    for (key, raw) in &params {
        match key.as_str() {
            "student_id" | "exam_id" | "session_id" | "announcement_id" | "command_id" => {
                let id = raw.parse::<i64>().map_err(|_| {
                    deny(
                        StatusCode::BAD_REQUEST,
                        format!("Invalid {key}: '{raw}'. Must be an integer."),
                    )
                    .into_response()
                })?;
                ids.insert(key.as_str(), id);
            }
            _ => {
                return Err(deny(
                    StatusCode::BAD_REQUEST,
                    format!("Unexpected parameter: '{key}'."),
                )
                .into_response());
            }
        }
    }

    if let Some(&id) = ids.get("student_id") {
        check_exists::<StudentEntity>(db, id, "Student")
            .await
            .map_err(IntoResponse::into_response)?;
    }
    if let Some(&id) = ids.get("exam_id") {
        check_exists::<ExamEntity>(db, id, "Exam")
            .await
            .map_err(IntoResponse::into_response)?;
    }
    if let (Some(&exam_id), Some(&session_id)) = (ids.get("exam_id"), ids.get("session_id")) {
        check_session_hierarchy(db, exam_id, session_id)
            .await
            .map_err(IntoResponse::into_response)?;
    }
    if let Some(&id) = ids.get("announcement_id") {
        check_exists::<AnnouncementEntity>(db, id, "Announcement")
            .await
            .map_err(IntoResponse::into_response)?;
    }

    Ok(next.run(req).await)
}
