//! Exams and the exam-session state machine.
//!
//! A session moves `pending -> active -> ended` only. Starting requires the
//! exam's date to have arrived. Ending is idempotent: ending an ended session
//! succeeds without changing anything. Each transition is one conditional
//! UPDATE, and successful transitions log `exam_start` / `exam_end` for every
//! student in the targeted cohort inside the same transaction.

use crate::error::{ServiceError, ServiceResult};
use crate::student_service::validate_year_level;
use chrono::{DateTime, NaiveDate, Utc};
use db::models::{
    activity_log::{self, ActivityType},
    course::Entity as CourseEntity,
    exam::{self, Column as ExamColumn, Entity as ExamEntity},
    exam_session::{self, Entity as SessionEntity, ExamSessionStatus},
    student,
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use serde::Serialize;

pub const MAX_DURATION_MINUTES: i32 = 24 * 60;

#[derive(Debug, Clone)]
pub struct NewExam {
    pub room: String,
    pub title: String,
    pub duration: i32,
    pub exam_date: Option<NaiveDate>,
    pub requirement: Option<String>,
    pub target_course: i64,
    pub target_year_level: i32,
}

#[derive(Debug, Clone, Default)]
pub struct ExamFilter {
    pub course_id: Option<i64>,
    pub year_level: Option<i32>,
    pub page: u64,
    pub per_page: u64,
}

/// Outcome of an end request. `changed` is false for a repeated end.
#[derive(Debug, Clone, Serialize)]
pub struct Transition {
    pub session: exam_session::Model,
    pub changed: bool,
}

pub struct ExamService;

impl ExamService {
    pub async fn create(
        db: &DatabaseConnection,
        created_by: i64,
        params: NewExam,
    ) -> ServiceResult<exam::Model> {
        let room = params.room.trim();
        let title = params.title.trim();
        if room.is_empty() || room.len() > 255 {
            return Err(ServiceError::validation("Room must be 1-255 characters"));
        }
        if title.is_empty() || title.len() > 255 {
            return Err(ServiceError::validation("Title must be 1-255 characters"));
        }
        if !(1..=MAX_DURATION_MINUTES).contains(&params.duration) {
            return Err(ServiceError::validation(format!(
                "Duration must be between 1 and {MAX_DURATION_MINUTES} minutes"
            )));
        }
        validate_year_level(params.target_year_level)?;
        if CourseEntity::find_by_id(params.target_course).one(db).await?.is_none() {
            return Err(ServiceError::not_found(format!(
                "Course {} not found",
                params.target_course
            )));
        }

        let requirement = params
            .requirement
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty());
        let created = exam::Model::create(
            db,
            room,
            title,
            params.duration,
            params.exam_date,
            requirement,
            params.target_course,
            params.target_year_level,
            created_by,
        )
        .await?;
        tracing::info!(exam_id = created.id, created_by, "exam created");
        Ok(created)
    }

    pub async fn get(db: &DatabaseConnection, id: i64) -> ServiceResult<exam::Model> {
        ExamEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Exam {id} not found")))
    }

    pub async fn list(
        db: &DatabaseConnection,
        filter: &ExamFilter,
    ) -> ServiceResult<(Vec<exam::Model>, u64)> {
        let mut query = ExamEntity::find();
        if let Some(course_id) = filter.course_id {
            query = query.filter(ExamColumn::TargetCourse.eq(course_id));
        }
        if let Some(year) = filter.year_level {
            query = query.filter(ExamColumn::TargetYearLevel.eq(year));
        }
        let paginator = query
            .order_by_desc(ExamColumn::CreatedAt)
            .order_by_desc(ExamColumn::Id)
            .paginate(db, filter.per_page.max(1));
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(filter.page.saturating_sub(1)).await?;
        Ok((rows, total))
    }

    /// Students the exam is addressed to, resolved against the current roster.
    pub async fn students(db: &DatabaseConnection, exam_id: i64) -> ServiceResult<Vec<student::Model>> {
        let exam = Self::get(db, exam_id).await?;
        Ok(student::Model::cohort(db, exam.target_course, exam.target_year_level).await?)
    }

    pub async fn for_student(
        db: &DatabaseConnection,
        student: &student::Model,
    ) -> ServiceResult<Vec<exam::Model>> {
        Ok(exam::Model::for_cohort(db, student.course_id, student.year_level).await?)
    }

    pub async fn create_session(
        db: &DatabaseConnection,
        exam_id: i64,
    ) -> ServiceResult<exam_session::Model> {
        Self::get(db, exam_id).await?;
        let session = exam_session::Model::create(db, exam_id).await?;
        tracing::info!(exam_id, session_id = session.id, "exam session created");
        Ok(session)
    }

    pub async fn sessions(
        db: &DatabaseConnection,
        exam_id: i64,
    ) -> ServiceResult<Vec<exam_session::Model>> {
        Self::get(db, exam_id).await?;
        Ok(exam_session::Model::for_exam(db, exam_id).await?)
    }

    pub async fn get_session(
        db: &DatabaseConnection,
        exam_id: i64,
        session_id: i64,
    ) -> ServiceResult<exam_session::Model> {
        SessionEntity::find_by_id(session_id)
            .one(db)
            .await?
            .filter(|s| s.exam_id == exam_id)
            .ok_or_else(|| {
                ServiceError::not_found(format!("Session {session_id} not found for exam {exam_id}"))
            })
    }

    pub async fn start_session(
        db: &DatabaseConnection,
        exam_id: i64,
        session_id: i64,
        now: DateTime<Utc>,
    ) -> ServiceResult<exam_session::Model> {
        let exam = Self::get(db, exam_id).await?;
        let session = Self::get_session(db, exam_id, session_id).await?;

        if !session.status.can_transition_to(ExamSessionStatus::Active) {
            return Err(ServiceError::invalid_state(format!(
                "Cannot start a session that is {}",
                session.status
            )));
        }
        if !exam.is_eligible(now) {
            return Err(ServiceError::invalid_state(format!(
                "Exam {exam_id} is not scheduled to start yet"
            )));
        }

        let txn = db.begin().await?;
        if !exam_session::Model::try_start(&txn, session_id, now).await? {
            txn.rollback().await?;
            return Err(ServiceError::invalid_state("Session is no longer pending"));
        }
        let logged = log_for_cohort(&txn, &exam, ActivityType::ExamStart, session_id).await?;
        txn.commit().await?;

        tracing::info!(exam_id, session_id, students = logged, "exam session started");
        Self::get_session(db, exam_id, session_id).await
    }

    pub async fn end_session(
        db: &DatabaseConnection,
        exam_id: i64,
        session_id: i64,
        now: DateTime<Utc>,
    ) -> ServiceResult<Transition> {
        let exam = Self::get(db, exam_id).await?;
        let session = Self::get_session(db, exam_id, session_id).await?;

        match session.status {
            ExamSessionStatus::Ended => {
                return Ok(Transition {
                    session,
                    changed: false,
                });
            }
            ExamSessionStatus::Pending => {
                return Err(ServiceError::invalid_state(
                    "Cannot end a session that has not started",
                ));
            }
            ExamSessionStatus::Active => {}
        }

        let txn = db.begin().await?;
        let changed = exam_session::Model::try_end(&txn, session_id, now).await?;
        if changed {
            let logged = log_for_cohort(&txn, &exam, ActivityType::ExamEnd, session_id).await?;
            txn.commit().await?;
            tracing::info!(exam_id, session_id, students = logged, "exam session ended");
        } else {
            txn.rollback().await?;
        }

        let session = Self::get_session(db, exam_id, session_id).await?;
        if session.status != ExamSessionStatus::Ended {
            return Err(ServiceError::invalid_state(format!(
                "Cannot end a session that is {}",
                session.status
            )));
        }
        Ok(Transition { session, changed })
    }

    /// Ends every active session whose exam duration has elapsed. Returns how
    /// many sessions this call ended.
    pub async fn end_overdue(db: &DatabaseConnection, now: DateTime<Utc>) -> ServiceResult<u64> {
        let mut ended = 0;
        for (session, exam) in exam_session::Model::active_with_exam(db).await? {
            let (Some(exam), Some(started_at)) = (exam, session.started_at) else {
                continue;
            };
            if exam.deadline_from(started_at) > now {
                continue;
            }
            if Self::end_session(db, exam.id, session.id, now).await?.changed {
                ended += 1;
            }
        }
        Ok(ended)
    }
}

async fn log_for_cohort(
    txn: &DatabaseTransaction,
    exam: &exam::Model,
    kind: ActivityType,
    session_id: i64,
) -> ServiceResult<usize> {
    let verb = if kind == ActivityType::ExamStart { "started" } else { "ended" };
    let description = format!("{} (session {session_id}) {verb}", exam.title);
    let cohort = student::Model::cohort(txn, exam.target_course, exam.target_year_level).await?;
    for s in &cohort {
        activity_log::Model::append(txn, s.id, kind, Some(&description)).await?;
    }
    Ok(cohort.len())
}
