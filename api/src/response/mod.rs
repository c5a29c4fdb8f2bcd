use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Envelope wrapped around every JSON body the API returns.
///
/// Every endpoint, including guard rejections, answers with the same shape:
/// ```json
/// {
///   "success": true,
///   "data": { ... },
///   "message": "Some message"
/// }
/// ```
///
/// - `T` is the type of the `data` payload.
/// - `success` tells the client whether the operation went through.
/// - `message` is a human-readable summary, or the error reason.
///
/// ## Example (success):
/// ```json
/// {
///   "success": true,
///   "data": { "id": 1, "username": "jdoe", "status": "inactive" },
///   "message": "Student retrieved"
/// }
/// ```
///
/// ## Example (error):
/// On failure `data` is the payload type's `Default` value, so a list
/// endpoint returns `[]` and an object endpoint returns its zeroed shape.
/// ```json
/// {
///   "success": false,
///   "data": [],
///   "message": "Student 9 not found"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

/// What every handler returns: a status code and an enveloped body.
pub type ApiResult<T> = (StatusCode, Json<ApiResponse<T>>);

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Constructs a success envelope.
    ///
    /// # Arguments
    /// - `data`: The result payload.
    /// - `message`: A descriptive message to accompany the success.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Constructs an error envelope with a defaulted payload.
    ///
    /// # Arguments
    /// - `message`: The reason the request failed.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }

    /// `200 OK` with a success envelope.
    pub fn ok(data: T, message: impl Into<String>) -> ApiResult<T> {
        (StatusCode::OK, Json(Self::success(data, message)))
    }

    /// `201 Created` with a success envelope.
    pub fn created(data: T, message: impl Into<String>) -> ApiResult<T> {
        (StatusCode::CREATED, Json(Self::success(data, message)))
    }

    /// An error envelope with the given status.
    pub fn fail(status: StatusCode, message: impl Into<String>) -> ApiResult<T>
    where
        T: Default,
    {
        (status, Json(Self::error(message)))
    }
}
