//! Liveness tracking for student client devices.
//!
//! A heartbeat puts the device's session `online`. The periodic sweep demotes
//! silent sessions to `idle` and later `offline`. Sweep writes are conditional
//! on the session still being stale, so a heartbeat that lands mid-sweep wins.

use crate::error::{ServiceError, ServiceResult};
use chrono::{DateTime, Duration, Utc};
use db::models::{
    activity_log::{self, ActivityType},
    student::{self, Entity as StudentEntity},
    student_session::{self, Column as SessionColumn, Entity as SessionEntity, SessionStatus},
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use std::net::IpAddr;
use util::{config, locks::KeyedLocks};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartbeatThresholds {
    pub idle_after: Duration,
    pub offline_after: Duration,
    pub max_skew: Duration,
}

impl HeartbeatThresholds {
    pub fn new(idle_secs: u64, offline_secs: u64, max_skew_secs: u64) -> ServiceResult<Self> {
        if idle_secs == 0 || idle_secs >= offline_secs {
            return Err(ServiceError::Config(
                "idle threshold must be positive and shorter than the offline threshold".into(),
            ));
        }
        let secs = |v: u64| Duration::seconds(i64::try_from(v).unwrap_or(i64::MAX / 1000));
        Ok(Self {
            idle_after: secs(idle_secs),
            offline_after: secs(offline_secs),
            max_skew: secs(max_skew_secs),
        })
    }

    pub fn from_config() -> ServiceResult<Self> {
        Self::new(
            config::heartbeat_idle_seconds(),
            config::heartbeat_offline_seconds(),
            config::heartbeat_max_skew_seconds(),
        )
    }

    /// Status a session should have at `now` given its last heartbeat.
    pub fn classify(&self, last_heartbeat: Option<DateTime<Utc>>, now: DateTime<Utc>) -> SessionStatus {
        match last_heartbeat {
            None => SessionStatus::Offline,
            Some(at) if now - at >= self.offline_after => SessionStatus::Offline,
            Some(at) if now - at >= self.idle_after => SessionStatus::Idle,
            Some(_) => SessionStatus::Online,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Heartbeat {
    pub student_id: i64,
    pub ip_address: String,
    pub device_name: String,
    /// RFC 3339 or unix seconds. `None` means "now".
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub idled: u64,
    pub offlined: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitoredSession {
    pub session: student_session::Model,
    pub student: Option<student::Model>,
}

pub fn parse_timestamp(raw: &str) -> ServiceResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| ServiceError::validation(format!("Malformed timestamp: {raw:?}")))
}

pub struct HeartbeatService;

impl HeartbeatService {
    /// Applies one heartbeat. Input is fully validated before anything is
    /// written, and writes for the same student are serialized through `locks`.
    pub async fn record(
        db: &DatabaseConnection,
        locks: &KeyedLocks,
        thresholds: &HeartbeatThresholds,
        heartbeat: Heartbeat,
        now: DateTime<Utc>,
    ) -> ServiceResult<student_session::Model> {
        let at = match heartbeat.timestamp.as_deref() {
            Some(raw) => parse_timestamp(raw)?,
            None => now,
        };
        if at - now > thresholds.max_skew {
            return Err(ServiceError::validation("Heartbeat timestamp is too far in the future"));
        }

        let ip: IpAddr = heartbeat
            .ip_address
            .trim()
            .parse()
            .map_err(|_| ServiceError::validation("Invalid IP address"))?;
        let device = heartbeat.device_name.trim();
        if device.is_empty() || device.len() > 100 {
            return Err(ServiceError::validation("Device name must be 1-100 characters"));
        }

        let _guard = locks.lock(heartbeat.student_id).await;

        if StudentEntity::find_by_id(heartbeat.student_id).one(db).await?.is_none() {
            return Err(ServiceError::not_found(format!(
                "Student {} not found",
                heartbeat.student_id
            )));
        }

        let session = student_session::Model::record_heartbeat(
            db,
            heartbeat.student_id,
            &ip.to_string(),
            device,
            at,
        )
        .await?;
        tracing::debug!(
            student_id = heartbeat.student_id,
            session_id = session.id,
            device,
            "heartbeat recorded"
        );
        Ok(session)
    }

    /// Demotes silent sessions. Idle transitions also append an `idle`
    /// activity entry for the student.
    pub async fn sweep(
        db: &DatabaseConnection,
        thresholds: &HeartbeatThresholds,
        now: DateTime<Utc>,
    ) -> ServiceResult<SweepReport> {
        let offline_cutoff = now - thresholds.offline_after;
        let idle_cutoff = now - thresholds.idle_after;
        let mut report = SweepReport::default();

        for from in [SessionStatus::Online, SessionStatus::Idle] {
            for session in student_session::Model::stale(db, from, offline_cutoff).await? {
                if student_session::Model::mark_if_stale(
                    db,
                    session.id,
                    from,
                    SessionStatus::Offline,
                    offline_cutoff,
                )
                .await?
                {
                    report.offlined += 1;
                }
            }
        }

        for session in student_session::Model::stale(db, SessionStatus::Online, idle_cutoff).await? {
            let txn = db.begin().await?;
            let changed = student_session::Model::mark_if_stale(
                &txn,
                session.id,
                SessionStatus::Online,
                SessionStatus::Idle,
                idle_cutoff,
            )
            .await?;
            if changed {
                let description = session
                    .device_name
                    .as_deref()
                    .map(|d| format!("No heartbeat from {d}"));
                activity_log::Model::append(
                    &txn,
                    session.student_id,
                    ActivityType::Idle,
                    description.as_deref(),
                )
                .await?;
                report.idled += 1;
            }
            txn.commit().await?;
        }

        if report != SweepReport::default() {
            tracing::info!(idled = report.idled, offlined = report.offlined, "heartbeat sweep");
        }
        Ok(report)
    }

    pub async fn sessions_for_student(
        db: &DatabaseConnection,
        student_id: i64,
    ) -> ServiceResult<Vec<student_session::Model>> {
        if StudentEntity::find_by_id(student_id).one(db).await?.is_none() {
            return Err(ServiceError::not_found(format!("Student {student_id} not found")));
        }
        Ok(student_session::Model::for_student(db, student_id).await?)
    }

    /// Every session with its student, optionally narrowed to one status.
    pub async fn overview(
        db: &DatabaseConnection,
        status: Option<SessionStatus>,
    ) -> ServiceResult<Vec<MonitoredSession>> {
        let mut query = SessionEntity::find();
        if let Some(status) = status {
            query = query.filter(SessionColumn::Status.eq(status));
        }
        let rows = query
            .order_by_desc(SessionColumn::LastHeartbeat)
            .order_by_asc(SessionColumn::Id)
            .find_also_related(StudentEntity)
            .all(db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(session, student)| MonitoredSession { session, student })
            .collect())
    }
}
