//! Response and request DTOs for the `/students` group. The session, command
//! and activity shapes are reused by the client routes.

use crate::routes::common::{rfc3339, rfc3339_opt};
use db::models::{activity_log, command, student, student_session};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Default)]
pub struct StudentResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub course_id: i64,
    pub year_level: i32,
    pub status: String,
    pub created_by: i64,
    pub created_at: String,
}

impl From<student::Model> for StudentResponse {
    fn from(s: student::Model) -> Self {
        Self {
            id: s.id,
            username: s.username,
            email: s.email,
            course_id: s.course_id,
            year_level: s.year_level,
            status: s.status.to_string(),
            created_by: s.created_by,
            created_at: rfc3339(s.created_at),
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct SessionResponse {
    pub id: i64,
    pub student_id: i64,
    pub status: String,
    pub last_heartbeat: Option<String>,
    pub ip_address: Option<String>,
    pub device_name: Option<String>,
}

impl From<student_session::Model> for SessionResponse {
    fn from(s: student_session::Model) -> Self {
        Self {
            id: s.id,
            student_id: s.student_id,
            status: s.status.to_string(),
            last_heartbeat: rfc3339_opt(s.last_heartbeat),
            ip_address: s.ip_address,
            device_name: s.device_name,
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct CommandResponse {
    pub id: i64,
    pub student_id: i64,
    pub command: String,
    pub created_at: String,
    pub executed_at: Option<String>,
}

impl From<command::Model> for CommandResponse {
    fn from(c: command::Model) -> Self {
        Self {
            id: c.id,
            student_id: c.student_id,
            command: c.command,
            created_at: rfc3339(c.created_at),
            executed_at: rfc3339_opt(c.executed_at),
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct ActivityResponse {
    pub id: i64,
    pub student_id: i64,
    pub activity_type: String,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<activity_log::Model> for ActivityResponse {
    fn from(a: activity_log::Model) -> Self {
        Self {
            id: a.id,
            student_id: a.student_id,
            activity_type: a.activity_type.to_string(),
            description: a.description,
            created_at: rfc3339(a.created_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub course_id: i64,

    #[validate(range(min = 1, max = 10, message = "Year level must be between 1 and 10"))]
    pub year_level: i32,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    /// `active` or `inactive`.
    pub status: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CommandRequest {
    #[validate(length(min = 1, max = 1000, message = "Command must be 1-1000 characters"))]
    pub command: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct StudentListQuery {
    pub course_id: Option<i64>,
    pub year_level: Option<i32>,
    pub status: Option<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommandListQuery {
    /// Only unexecuted commands, oldest first.
    #[serde(default)]
    pub pending: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}
