use super::UserResponse;
use crate::auth::AuthUser;
use crate::response::{ApiResponse, ApiResult};
use crate::routes::common::service_failure;
use axum::{Extension, extract::State};
use services::user_service::UserService;
use util::state::AppState;

/// GET /auth/me
///
/// Profile of the signed-in staff user.
///
/// ```json
/// {
///   "success": true,
///   "data": { "id": 1, "username": "proctor1", "email": "proctor1@school.edu", "admin": true,
///             "created_at": "...", "updated_at": "..." },
///   "message": "User data retrieved successfully"
/// }
/// ```
pub async fn get_me(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> ApiResult<UserResponse> {
    match UserService::find(app_state.db(), claims.sub).await {
        Ok(user) => ApiResponse::ok(user.into(), "User data retrieved successfully"),
        Err(e) => service_failure(e),
    }
}
