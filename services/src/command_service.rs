//! Command dispatch to student clients.
//!
//! Each student has a FIFO queue of pending commands. A client fetches the
//! head, runs it and reports back; the report stamps `executed_at` once.

use crate::error::{ServiceError, ServiceResult};
use chrono::{DateTime, Utc};
use db::models::{
    activity_log::{self, ActivityType},
    command::{self, Entity as CommandEntity},
    student::Entity as StudentEntity,
};
use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};
use util::locks::KeyedLocks;

pub const MAX_COMMAND_LEN: usize = 1000;

pub struct CommandService;

impl CommandService {
    async fn ensure_student(db: &DatabaseConnection, student_id: i64) -> ServiceResult<()> {
        match StudentEntity::find_by_id(student_id).one(db).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found(format!("Student {student_id} not found"))),
        }
    }

    /// Queues a command and logs a `command` activity in the same transaction.
    pub async fn issue(
        db: &DatabaseConnection,
        student_id: i64,
        command_text: &str,
    ) -> ServiceResult<command::Model> {
        let text = command_text.trim();
        if text.is_empty() || text.len() > MAX_COMMAND_LEN {
            return Err(ServiceError::validation(format!(
                "Command must be 1-{MAX_COMMAND_LEN} characters"
            )));
        }
        Self::ensure_student(db, student_id).await?;

        let txn = db.begin().await?;
        let created = command::Model::create(&txn, student_id, text).await?;
        activity_log::Model::append(
            &txn,
            student_id,
            ActivityType::Command,
            Some(&format!("Command issued: {text}")),
        )
        .await?;
        txn.commit().await?;

        tracing::info!(student_id, command_id = created.id, "command issued");
        Ok(created)
    }

    pub async fn pending(db: &DatabaseConnection, student_id: i64) -> ServiceResult<Vec<command::Model>> {
        Self::ensure_student(db, student_id).await?;
        Ok(command::Model::pending_for_student(db, student_id).await?)
    }

    pub async fn next(db: &DatabaseConnection, student_id: i64) -> ServiceResult<Option<command::Model>> {
        Self::ensure_student(db, student_id).await?;
        Ok(command::Model::next_pending(db, student_id).await?)
    }

    pub async fn history(db: &DatabaseConnection, student_id: i64) -> ServiceResult<Vec<command::Model>> {
        Self::ensure_student(db, student_id).await?;
        Ok(command::Model::for_student(db, student_id).await?)
    }

    /// Records that `student_id`'s client ran `command_id` at `executed_at`.
    ///
    /// Execution must follow queue order, and a command is stamped once; a
    /// second report is `AlreadyExecuted`.
    pub async fn report_executed(
        db: &DatabaseConnection,
        locks: &KeyedLocks,
        student_id: i64,
        command_id: i64,
        executed_at: DateTime<Utc>,
    ) -> ServiceResult<command::Model> {
        let _guard = locks.lock(student_id).await;

        let cmd = CommandEntity::find_by_id(command_id)
            .one(db)
            .await?
            .filter(|c| c.student_id == student_id)
            .ok_or_else(|| ServiceError::not_found(format!("Command {command_id} not found")))?;

        if !cmd.is_pending() {
            return Err(ServiceError::AlreadyExecuted(command_id));
        }
        if executed_at < cmd.created_at {
            return Err(ServiceError::validation(
                "Execution time cannot precede the command's creation",
            ));
        }
        if let Some(head) = command::Model::next_pending(db, student_id).await? {
            if head.id != command_id {
                return Err(ServiceError::invalid_state(format!(
                    "Command {} must be executed before command {command_id}",
                    head.id
                )));
            }
        }

        if !command::Model::mark_executed_if_pending(db, command_id, executed_at).await? {
            return Err(ServiceError::AlreadyExecuted(command_id));
        }

        tracing::info!(student_id, command_id, "command executed");
        Ok(command::Model {
            executed_at: Some(executed_at),
            ..cmd
        })
    }
}
