use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryFilter, QueryOrder, Set};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "announcements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub content: String,
    pub target_course: i64,
    pub target_year_level: i32,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::TargetCourse",
        to = "super::course::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
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

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        title: &str,
        content: &str,
        target_course: i64,
        target_year_level: i32,
        created_by: i64,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            title: Set(title.to_owned()),
            content: Set(content.to_owned()),
            target_course: Set(target_course),
            target_year_level: Set(target_year_level),
            created_by: Set(created_by),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Announcements addressed to the cohort, newest first.
    pub async fn for_cohort(
        db: &DbConn,
        course_id: i64,
        year_level: i32,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::TargetCourse.eq(course_id))
            .filter(Column::TargetYearLevel.eq(year_level))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }
}
