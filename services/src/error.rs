use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Command {0} has already been executed")]
    AlreadyExecuted(i64),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(DbErr),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Whether the error belongs to the conflict family (409).
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::Conflict(_) | Self::AlreadyExecuted(_) | Self::InvalidState(_)
        )
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                return ServiceError::Conflict(format!("Duplicate value: {detail}"));
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                return ServiceError::NotFound("Referenced record does not exist".into());
            }
            _ => {}
        }
        match err {
            DbErr::RecordNotFound(msg) => ServiceError::NotFound(msg),
            other => ServiceError::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_not_found_maps_to_not_found() {
        let err: ServiceError = DbErr::RecordNotFound("Student 9 not found".into()).into();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Student 9 not found"));
    }

    #[test]
    fn custom_errors_stay_database_errors() {
        let err: ServiceError = DbErr::Custom("boom".into()).into();
        assert!(matches!(err, ServiceError::Database(_)));
        assert!(!err.is_conflict());
    }

    #[test]
    fn config_errors_are_not_conflicts() {
        let err = ServiceError::Config("HEARTBEAT_IDLE_SECONDS".into());
        assert!(!err.is_conflict());
        assert_eq!(err.to_string(), "Invalid configuration: HEARTBEAT_IDLE_SECONDS");
    }

    #[test]
    fn already_executed_is_a_conflict() {
        assert!(ServiceError::AlreadyExecuted(3).is_conflict());
        assert_eq!(
            ServiceError::AlreadyExecuted(3).to_string(),
            "Command 3 has already been executed"
        );
    }
}
