use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;

/// An instruction queued for a student's client.
///
/// `executed_at` stays null until the client reports execution, and is
/// written at most once.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "commands")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub command: String,
    pub created_at: DateTime<Utc>,
    pub executed_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_pending(&self) -> bool {
        self.executed_at.is_none()
    }

    pub async fn create<C>(db: &C, student_id: i64, command: &str) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        ActiveModel {
            student_id: Set(student_id),
            command: Set(command.to_owned()),
            created_at: Set(Utc::now()),
            executed_at: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Unexecuted commands for the student in delivery (creation) order.
    pub async fn pending_for_student(db: &DbConn, student_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ExecutedAt.is_null())
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Head of the student's pending queue.
    pub async fn next_pending<C>(db: &C, student_id: i64) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ExecutedAt.is_null())
            .order_by_asc(Column::Id)
            .one(db)
            .await
    }

    /// Full history for the student, newest first.
    pub async fn for_student(db: &DbConn, student_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    /// Sets `executed_at` if it is still null. Returns whether this call won.
    pub async fn mark_executed_if_pending<C>(
        db: &C,
        id: i64,
        at: DateTime<Utc>,
    ) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let res = Entity::update_many()
            .col_expr(Column::ExecutedAt, Expr::value(at))
            .filter(Column::Id.eq(id))
            .filter(Column::ExecutedAt.is_null())
            .exec(db)
            .await?;
        Ok(res.rows_affected == 1)
    }
}
