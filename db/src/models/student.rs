use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::user::{hash_password, verify_password_hash};

/// A student enrolled in a course, monitored by the desktop client.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub username: String,
    /// Globally unique.
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub course_id: i64,
    pub year_level: i32,
    pub status: StudentStatus,
    /// Staff user who enrolled the student.
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "student_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StudentStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::student_session::Entity")]
    Sessions,
    #[sea_orm(has_many = "super::command::Entity")]
    Commands,
    #[sea_orm(has_many = "super::activity_log::Entity")]
    ActivityLogs,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::student_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl Related<super::command::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commands.def()
    }
}

impl Related<super::activity_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Enrolls a student. New students start `inactive` until their first
    /// client login.
    pub async fn create(
        db: &DbConn,
        username: &str,
        email: &str,
        password: &str,
        course_id: i64,
        year_level: i32,
        created_by: i64,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            username: Set(username.to_owned()),
            email: Set(email.to_owned()),
            password_hash: Set(hash_password(password)?),
            course_id: Set(course_id),
            year_level: Set(year_level),
            status: Set(StudentStatus::Inactive),
            created_by: Set(created_by),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_by_email(db: &DbConn, email: &str) -> Result<Option<Model>, DbErr> {
        Entity::find().filter(Column::Email.eq(email)).one(db).await
    }

    pub async fn set_status<C>(db: &C, id: i64, status: StudentStatus) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let model = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Student {id} not found")))?;

        if model.status == status {
            return Ok(model);
        }

        let mut active: ActiveModel = model.into();
        active.status = Set(status);
        active.update(db).await
    }

    /// Every student in the `(course, year level)` cohort, ordered by id.
    pub async fn cohort<C>(db: &C, course_id: i64, year_level: i32) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::YearLevel.eq(year_level))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    pub fn verify_password(&self, password: &str) -> bool {
        verify_password_hash(&self.password_hash, password)
    }
}
