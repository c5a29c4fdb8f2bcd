use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Liveness record for one client device of a student.
///
/// A row exists per `(student_id, device_name)` and is created on the
/// device's first heartbeat. `status` is driven only by heartbeat arrival
/// (to `online`) and by the sweep (to `idle` / `offline`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "student_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub status: SessionStatus,
    pub last_heartbeat: Option<DateTime<Utc>>,
    pub ip_address: Option<String>,
    pub device_name: Option<String>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "session_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SessionStatus {
    #[sea_orm(string_value = "online")]
    Online,
    #[sea_orm(string_value = "offline")]
    Offline,
    #[sea_orm(string_value = "idle")]
    Idle,
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
    pub async fn find_for_device<C>(
        db: &C,
        student_id: i64,
        device_name: &str,
    ) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::DeviceName.eq(device_name))
            .one(db)
            .await
    }

    /// Applies a heartbeat: the device's session goes `online` and records
    /// the sender's address. `last_heartbeat` only ever moves forward, so a
    /// delayed heartbeat cannot rewind it.
    ///
    /// Callers must hold the student's lock so the find-then-write pair is
    /// not interleaved with another heartbeat for the same device.
    pub async fn record_heartbeat<C>(
        db: &C,
        student_id: i64,
        ip_address: &str,
        device_name: &str,
        at: DateTime<Utc>,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        match Self::find_for_device(db, student_id, device_name).await? {
            Some(existing) => {
                let newest = match existing.last_heartbeat {
                    Some(prev) if prev > at => prev,
                    _ => at,
                };
                let mut active: ActiveModel = existing.into();
                active.status = Set(SessionStatus::Online);
                active.last_heartbeat = Set(Some(newest));
                active.ip_address = Set(Some(ip_address.to_owned()));
                active.update(db).await
            }
            None => {
                ActiveModel {
                    student_id: Set(student_id),
                    status: Set(SessionStatus::Online),
                    last_heartbeat: Set(Some(at)),
                    ip_address: Set(Some(ip_address.to_owned())),
                    device_name: Set(Some(device_name.to_owned())),
                    ..Default::default()
                }
                .insert(db)
                .await
            }
        }
    }

    pub async fn for_student(db: &DbConn, student_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::LastHeartbeat)
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Sessions in `status` whose last heartbeat is older than `cutoff`.
    pub async fn stale(
        db: &DbConn,
        status: SessionStatus,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::Status.eq(status))
            .filter(Column::LastHeartbeat.lt(cutoff))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Moves one session from `from` to `to`, but only while it is still in
    /// `from` and still silent since before `cutoff`. Returns whether the row
    /// changed; `false` means a heartbeat or another sweep got there first.
    pub async fn mark_if_stale<C>(
        db: &C,
        id: i64,
        from: SessionStatus,
        to: SessionStatus,
        cutoff: DateTime<Utc>,
    ) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let res = Entity::update_many()
            .col_expr(Column::Status, Expr::value(to))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(from))
            .filter(Column::LastHeartbeat.lt(cutoff))
            .exec(db)
            .await?;
        Ok(res.rows_affected == 1)
    }
}
