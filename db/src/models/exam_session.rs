use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One sitting of an exam.
///
/// Status only advances along `pending -> active -> ended`. `started_at` is
/// written by the start transition and `ended_at` by the end transition.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "exam_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub exam_id: i64,
    pub status: ExamSessionStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "exam_session_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExamSessionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "ended")]
    Ended,
}

impl ExamSessionStatus {
    pub fn can_transition_to(self, next: ExamSessionStatus) -> bool {
        matches!(
            (self, next),
            (ExamSessionStatus::Pending, ExamSessionStatus::Active)
                | (ExamSessionStatus::Active, ExamSessionStatus::Ended)
        )
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exam::Entity",
        from = "Column::ExamId",
        to = "super::exam::Column::Id"
    )]
    Exam,
}

impl Related<super::exam::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exam.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(db: &DbConn, exam_id: i64) -> Result<Model, DbErr> {
        ActiveModel {
            exam_id: Set(exam_id),
            status: Set(ExamSessionStatus::Pending),
            started_at: Set(None),
            ended_at: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn for_exam(db: &DbConn, exam_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::ExamId.eq(exam_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// `pending -> active`. Returns `false` when the session was not pending.
    pub async fn try_start<C>(db: &C, id: i64, at: DateTime<Utc>) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let res = Entity::update_many()
            .col_expr(Column::Status, Expr::value(ExamSessionStatus::Active))
            .col_expr(Column::StartedAt, Expr::value(at))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(ExamSessionStatus::Pending))
            .exec(db)
            .await?;
        Ok(res.rows_affected == 1)
    }

    /// `active -> ended`. Returns `false` when the session was not active.
    pub async fn try_end<C>(db: &C, id: i64, at: DateTime<Utc>) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let res = Entity::update_many()
            .col_expr(Column::Status, Expr::value(ExamSessionStatus::Ended))
            .col_expr(Column::EndedAt, Expr::value(at))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(ExamSessionStatus::Active))
            .exec(db)
            .await?;
        Ok(res.rows_affected == 1)
    }

    /// Active sessions paired with their exam.
    pub async fn active_with_exam(
        db: &DbConn,
    ) -> Result<Vec<(Model, Option<super::exam::Model>)>, DbErr> {
        Entity::find()
            .filter(Column::Status.eq(ExamSessionStatus::Active))
            .find_also_related(super::exam::Entity)
            .all(db)
            .await
    }
}
