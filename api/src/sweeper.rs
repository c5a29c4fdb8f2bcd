//! Periodic background maintenance: demotes silent client sessions and ends
//! exam sessions whose time is up.

use chrono::{DateTime, Utc};
use serde::Serialize;
use services::{
    ServiceResult,
    exam_service::ExamService,
    heartbeat_service::{HeartbeatService, HeartbeatThresholds},
};
use std::time::Duration;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use util::state::AppState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepOutcome {
    pub idled: u64,
    pub offlined: u64,
    pub exams_ended: u64,
}

/// One sweep pass at `now`. Thresholds are read from configuration on every
/// call.
pub async fn run_sweep(state: &AppState, now: DateTime<Utc>) -> ServiceResult<SweepOutcome> {
    let thresholds = HeartbeatThresholds::from_config()?;
    let report = HeartbeatService::sweep(state.db(), &thresholds, now).await?;
    let exams_ended = ExamService::end_overdue(state.db(), now).await?;

    Ok(SweepOutcome {
        idled: report.idled,
        offlined: report.offlined,
        exams_ended,
    })
}

/// Runs [`run_sweep`] every `every` until the returned handle is aborted.
/// A failed pass is logged and retried on the next tick.
pub fn spawn_sweeper(state: AppState, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match run_sweep(&state, Utc::now()).await {
                Ok(outcome) if outcome != SweepOutcome::default() => {
                    tracing::info!(
                        idled = outcome.idled,
                        offlined = outcome.offlined,
                        exams_ended = outcome.exams_ended,
                        "sweep applied"
                    );
                }
                Ok(_) => tracing::trace!("sweep found nothing to do"),
                Err(e) => tracing::warn!(error = %e, "sweep failed, retrying on next tick"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::models::{
        course, student,
        student_session::{self, Entity as SessionEntity, SessionStatus},
        user,
    };
    use db::test_utils::setup_test_db;
    use sea_orm::EntityTrait;

    async fn stale_session(state: &AppState, age_secs: i64) -> student_session::Model {
        let db = state.db();
        let staff = user::Model::create(db, "proctor", "proctor@example.com", "password", true)
            .await
            .unwrap();
        let c = course::Model::create(db, "BSIT", "IT").await.unwrap();
        let s = student::Model::create(db, "kim", "kim@example.com", "pw", c.id, 1, staff.id)
            .await
            .unwrap();
        let at = Utc::now() - chrono::Duration::seconds(age_secs);
        student_session::Model::record_heartbeat(db, s.id, "10.0.0.2", "lab-1", at)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn run_sweep_reports_offline_sessions() {
        let state = AppState::new(setup_test_db().await);
        let session = stale_session(&state, 24 * 60 * 60).await;

        let outcome = run_sweep(&state, Utc::now()).await.unwrap();
        assert_eq!(outcome.offlined, 1);
        assert_eq!(outcome.exams_ended, 0);

        let stored = SessionEntity::find_by_id(session.id)
            .one(state.db())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, SessionStatus::Offline);

        assert_eq!(run_sweep(&state, Utc::now()).await.unwrap(), SweepOutcome::default());
    }

    #[tokio::test]
    async fn spawned_sweeper_runs_until_aborted() {
        let state = AppState::new(setup_test_db().await);
        let session = stale_session(&state, 24 * 60 * 60).await;

        let handle = spawn_sweeper(state.clone(), Duration::from_millis(10));

        let mut status = SessionStatus::Online;
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            status = SessionEntity::find_by_id(session.id)
                .one(state.db())
                .await
                .unwrap()
                .unwrap()
                .status;
            if status == SessionStatus::Offline {
                break;
            }
        }
        assert_eq!(status, SessionStatus::Offline);

        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
    }
}
