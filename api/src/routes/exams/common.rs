use crate::routes::common::{date_opt, rfc3339, rfc3339_opt};
use db::models::{exam, exam_session};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Default)]
pub struct ExamResponse {
    pub id: i64,
    pub room: String,
    pub title: String,
    pub duration: i32,
    pub exam_date: Option<String>,
    pub requirement: Option<String>,
    pub target_course: i64,
    pub target_year_level: i32,
    pub created_by: i64,
    pub created_at: String,
}

impl From<exam::Model> for ExamResponse {
    fn from(e: exam::Model) -> Self {
        Self {
            id: e.id,
            room: e.room,
            title: e.title,
            duration: e.duration,
            exam_date: date_opt(e.exam_date),
            requirement: e.requirement,
            target_course: e.target_course,
            target_year_level: e.target_year_level,
            created_by: e.created_by,
            created_at: rfc3339(e.created_at),
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct ExamSessionResponse {
    pub id: i64,
    pub exam_id: i64,
    pub status: String,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
}

impl From<exam_session::Model> for ExamSessionResponse {
    fn from(s: exam_session::Model) -> Self {
        Self {
            id: s.id,
            exam_id: s.exam_id,
            status: s.status.to_string(),
            started_at: rfc3339_opt(s.started_at),
            ended_at: rfc3339_opt(s.ended_at),
        }
    }
}

/// Body of `POST .../end`. `changed` is false when the session had already
/// ended.
#[derive(Debug, Serialize, Default)]
pub struct EndSessionResponse {
    #[serde(flatten)]
    pub session: ExamSessionResponse,
    pub changed: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateExamRequest {
    #[validate(length(min = 1, max = 255, message = "Room must be 1-255 characters"))]
    pub room: String,

    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Minutes.
    #[validate(range(min = 1, max = 1440, message = "Duration must be between 1 and 1440 minutes"))]
    pub duration: i32,

    /// `YYYY-MM-DD`.
    pub exam_date: Option<String>,

    pub requirement: Option<String>,

    pub target_course: i64,

    #[validate(range(min = 1, max = 10, message = "Year level must be between 1 and 10"))]
    pub target_year_level: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExamListQuery {
    pub course_id: Option<i64>,
    pub year_level: Option<i32>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}
