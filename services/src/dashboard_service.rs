use crate::error::ServiceResult;
use db::models::{
    activity_log,
    exam::Entity as ExamEntity,
    exam_session::{Column as ExamSessionColumn, Entity as ExamSessionEntity, ExamSessionStatus},
    student::{Column as StudentColumn, Entity as StudentEntity, StudentStatus},
    student_session::{Column as SessionColumn, Entity as SessionEntity, SessionStatus},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub students: u64,
    pub active_students: u64,
    pub exams: u64,
    pub active_exam_sessions: u64,
    pub sessions_online: u64,
    pub sessions_idle: u64,
    pub sessions_offline: u64,
    pub recent_activity: Vec<activity_log::Model>,
}

pub struct DashboardService;

impl DashboardService {
    pub async fn summary(db: &DatabaseConnection, recent: u64) -> ServiceResult<DashboardSummary> {
        let sessions_with = |status: SessionStatus| {
            SessionEntity::find()
                .filter(SessionColumn::Status.eq(status))
                .count(db)
        };

        Ok(DashboardSummary {
            students: StudentEntity::find().count(db).await?,
            active_students: StudentEntity::find()
                .filter(StudentColumn::Status.eq(StudentStatus::Active))
                .count(db)
                .await?,
            exams: ExamEntity::find().count(db).await?,
            active_exam_sessions: ExamSessionEntity::find()
                .filter(ExamSessionColumn::Status.eq(ExamSessionStatus::Active))
                .count(db)
                .await?,
            sessions_online: sessions_with(SessionStatus::Online).await?,
            sessions_idle: sessions_with(SessionStatus::Idle).await?,
            sessions_offline: sessions_with(SessionStatus::Offline).await?,
            recent_activity: activity_log::Model::recent(db, recent).await?,
        })
    }
}
