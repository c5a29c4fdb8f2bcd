//! Domain operations for the exam monitor.
//!
//! Every service is a unit struct with associated async functions taking the
//! database connection explicitly. Errors are reported as [`ServiceError`].

pub mod activity_service;
pub mod announcement_service;
pub mod command_service;
pub mod course_service;
pub mod dashboard_service;
pub mod error;
pub mod exam_service;
pub mod heartbeat_service;
pub mod student_service;
pub mod user_service;

pub use error::{ServiceError, ServiceResult};

#[cfg(test)]
pub(crate) mod test_support;
