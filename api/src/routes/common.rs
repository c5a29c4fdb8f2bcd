//! Helpers shared by every route group: error mapping, validation messages,
//! pagination and timestamp formatting.

use crate::response::{ApiResponse, ApiResult};
use axum::http::StatusCode;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use services::ServiceError;
use validator::ValidationErrors;

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PER_PAGE;

/// Joins every field's validation message with `"; "`.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

pub fn validation_failure<T>(errors: &ValidationErrors) -> ApiResult<T>
where
    T: Serialize + Default,
{
    ApiResponse::fail(StatusCode::BAD_REQUEST, format_validation_errors(errors))
}

pub fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Conflict(_)
        | ServiceError::AlreadyExecuted(_)
        | ServiceError::InvalidState(_) => StatusCode::CONFLICT,
        ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        ServiceError::Config(_) | ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps a service failure onto a status code and error envelope.
///
/// Server-side faults (`Database`, `Config`) are logged at `error` and the
/// client only sees a generic message; everything else is returned verbatim.
///
/// ### Example
/// ```json
/// { "success": false, "data": {}, "message": "Student 12 not found" }
/// ```
pub fn service_failure<T>(err: ServiceError) -> ApiResult<T>
where
    T: Serialize + Default,
{
    let status = status_for(&err);
    match err {
        ServiceError::Config(_) => {
            tracing::error!(error = %err, "server misconfigured");
            ApiResponse::fail(status, "Server configuration error")
        }
        ServiceError::Database(_) => {
            tracing::error!(error = %err, "request failed");
            ApiResponse::fail(status, "Database error")
        }
        _ => ApiResponse::fail(status, err.to_string()),
    }
}

/// 1-based page and clamped page size.
///
/// The page is capped at [`MAX_PAGE`] so the row offset handed to the
/// paginator (`page * per_page`) always fits in an SQL `BIGINT`.
pub fn resolve_page(page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
    (
        page.unwrap_or(1).clamp(1, MAX_PAGE),
        per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
    )
}

#[derive(Debug, Serialize, Default)]
pub struct ListResponse<T>
where
    T: Serialize,
{
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new<M>(rows: Vec<M>, page: u64, per_page: u64, total: u64) -> Self
    where
        T: From<M>,
    {
        Self {
            items: rows.into_iter().map(T::from).collect(),
            page,
            per_page,
            total,
        }
    }
}

pub fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

pub fn rfc3339_opt(at: Option<DateTime<Utc>>) -> Option<String> {
    at.map(rfc3339)
}

pub fn date_opt(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}
