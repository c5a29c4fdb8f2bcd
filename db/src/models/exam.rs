use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "exams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub room: String,
    pub title: String,
    /// Length of a sitting in minutes.
    pub duration: i32,
    pub exam_date: Option<NaiveDate>,
    /// Free-text instructions shown to students (allowed materials etc).
    pub requirement: Option<String>,
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
    #[sea_orm(has_many = "super::exam_session::Entity")]
    Sessions,
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

impl Related<super::exam_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &DbConn,
        room: &str,
        title: &str,
        duration: i32,
        exam_date: Option<NaiveDate>,
        requirement: Option<&str>,
        target_course: i64,
        target_year_level: i32,
        created_by: i64,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            room: Set(room.to_owned()),
            title: Set(title.to_owned()),
            duration: Set(duration),
            exam_date: Set(exam_date),
            requirement: Set(requirement.map(str::to_owned)),
            target_course: Set(target_course),
            target_year_level: Set(target_year_level),
            created_by: Set(created_by),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Exams targeting the cohort, soonest date first. Undated exams sort last.
    pub async fn for_cohort<C>(db: &C, course_id: i64, year_level: i32) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut exams = Entity::find()
            .filter(Column::TargetCourse.eq(course_id))
            .filter(Column::TargetYearLevel.eq(year_level))
            .order_by_asc(Column::Id)
            .all(db)
            .await?;
        exams.sort_by_key(|e| (e.exam_date.is_none(), e.exam_date));
        Ok(exams)
    }

    /// Earliest instant a session of this exam may start: midnight UTC of
    /// `exam_date`. `None` for undated exams.
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.exam_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    pub fn is_eligible(&self, now: DateTime<Utc>) -> bool {
        self.starts_at().is_none_or(|start| now >= start)
    }

    /// Instant a sitting that began at `started_at` runs out of time.
    pub fn deadline_from(&self, started_at: DateTime<Utc>) -> DateTime<Utc> {
        started_at + Duration::minutes(i64::from(self.duration))
    }
}
