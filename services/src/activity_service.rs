use crate::error::{ServiceError, ServiceResult};
use db::models::{
    activity_log::{self, ActivityType},
    student::Entity as StudentEntity,
};
use sea_orm::{DatabaseConnection, EntityTrait};
use std::str::FromStr;

pub const MAX_DESCRIPTION_LEN: usize = 1000;

pub struct ActivityService;

impl ActivityService {
    /// Appends one entry. Fails only when the student does not exist or the
    /// description is oversized.
    pub async fn record(
        db: &DatabaseConnection,
        student_id: i64,
        activity_type: ActivityType,
        description: Option<&str>,
    ) -> ServiceResult<activity_log::Model> {
        let description = description.map(str::trim).filter(|d| !d.is_empty());
        if description.is_some_and(|d| d.len() > MAX_DESCRIPTION_LEN) {
            return Err(ServiceError::validation(format!(
                "Description must be at most {MAX_DESCRIPTION_LEN} characters"
            )));
        }
        if StudentEntity::find_by_id(student_id).one(db).await?.is_none() {
            return Err(ServiceError::not_found(format!("Student {student_id} not found")));
        }

        let entry = activity_log::Model::append(db, student_id, activity_type, description).await?;
        if activity_type == ActivityType::Violation {
            tracing::warn!(student_id, description, "violation reported");
        }
        Ok(entry)
    }

    /// Same as [`record`](Self::record) for a type name received over the wire.
    pub async fn record_raw(
        db: &DatabaseConnection,
        student_id: i64,
        activity_type: &str,
        description: Option<&str>,
    ) -> ServiceResult<activity_log::Model> {
        let kind = parse_activity_type(activity_type)?;
        Self::record(db, student_id, kind, description).await
    }

    pub async fn for_student(
        db: &DatabaseConnection,
        student_id: i64,
        activity_type: Option<ActivityType>,
        page: u64,
        per_page: u64,
    ) -> ServiceResult<(Vec<activity_log::Model>, u64)> {
        if StudentEntity::find_by_id(student_id).one(db).await?.is_none() {
            return Err(ServiceError::not_found(format!("Student {student_id} not found")));
        }
        Ok(activity_log::Model::for_student(db, student_id, activity_type, page, per_page).await?)
    }
}

pub fn parse_activity_type(raw: &str) -> ServiceResult<ActivityType> {
    ActivityType::from_str(raw.trim())
        .map_err(|_| ServiceError::validation(format!("Unknown activity type: {raw}")))
}
