//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health`: liveness probe (public)
//! - `/auth`: staff register/login (public), logout and profile (staff)
//! - `/dashboard`, `/courses`, `/students`, `/exams`, `/announcements`,
//!   `/monitoring`: administration (staff, course creation admin only)
//! - `/client`: the student exam client (login public, the rest student token)
//!
//! Guards are attached per group with `route_layer`, so unmatched paths fall
//! through to a plain 404 instead of a 401.

use axum::Router;
use util::state::AppState;

pub mod announcements;
pub mod auth;
pub mod client;
pub mod common;
pub mod courses;
pub mod dashboard;
pub mod exams;
pub mod health;
pub mod monitoring;
pub mod students;

use announcements::announcements_routes;
use auth::auth_routes;
use client::client_routes;
use courses::courses_routes;
use dashboard::dashboard_routes;
use exams::exams_routes;
use health::health_routes;
use monitoring::monitoring_routes;
use students::students_routes;

/// Builds the `/api` router. Nest the result under `/api`.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes(app_state.clone()))
        .nest("/dashboard", dashboard_routes(app_state.clone()))
        .nest("/courses", courses_routes(app_state.clone()))
        .nest("/students", students_routes(app_state.clone()))
        .nest("/exams", exams_routes(app_state.clone()))
        .nest("/announcements", announcements_routes(app_state.clone()))
        .nest("/monitoring", monitoring_routes(app_state.clone()))
        .nest("/client", client_routes(app_state.clone()))
        .with_state(app_state)
}
