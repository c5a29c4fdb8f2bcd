#[cfg(test)]
mod tests {
    use crate::helpers::app::{seed_course, seed_staff, seed_student, student_token};
    use crate::helpers::{make_test_app, request, send};
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use db::models::student_session;
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_overview_lists_live_sessions() {
        let (app, app_state) = make_test_app().await;
        let db = app_state.db();
        let (staff, token) = seed_staff(db, "proctor", false).await;
        let course = seed_course(db, "BSIT").await;
        let s = seed_student(db, &staff, &course, 1, "kim@school.edu").await;

        let beat = json!({ "device_name": "lab3-pc07", "ip_address": "10.0.3.7" });
        let (status, _) =
            send(&app, request("POST", "/api/client/heartbeat", Some(&student_token(s.id)), Some(beat))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = send(&app, request("GET", "/api/monitoring", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        let rows = json["data"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["status"], "online");
        assert_eq!(rows[0]["student"]["email"], "kim@school.edu");

        let (_, json) = send(&app, request("GET", "/api/monitoring?status=offline", Some(&token), None)).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 0);

        let (status, _) = send(&app, request("GET", "/api/monitoring?status=bogus", Some(&token), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            send(&app, request("GET", "/api/monitoring", Some(&student_token(s.id)), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[serial]
    async fn test_manual_sweep_demotes_silent_devices() {
        let (app, app_state) = make_test_app().await;
        let db = app_state.db();
        let (staff, token) = seed_staff(db, "proctor", false).await;
        let course = seed_course(db, "BSIT").await;
        let s = seed_student(db, &staff, &course, 1, "kim@school.edu").await;

        let long_ago = Utc::now() - Duration::days(1);
        student_session::Model::record_heartbeat(db, s.id, "10.0.3.7", "lab3-pc07", long_ago)
            .await
            .unwrap();

        let (status, json) = send(&app, request("POST", "/api/monitoring/sweep", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["offlined"], 1);
        assert_eq!(json["data"]["idled"], 0);

        let (_, json) = send(&app, request("GET", "/api/monitoring?status=offline", Some(&token), None)).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);

        let (_, json) = send(&app, request("POST", "/api/monitoring/sweep", Some(&token), None)).await;
        assert_eq!(json["data"]["offlined"], 0);
    }

    #[tokio::test]
    #[serial]
    async fn test_dashboard_counts() {
        let (app, app_state) = make_test_app().await;
        let db = app_state.db();
        let (staff, token) = seed_staff(db, "proctor", false).await;
        let course = seed_course(db, "BSIT").await;
        let s = seed_student(db, &staff, &course, 1, "kim@school.edu").await;
        seed_student(db, &staff, &course, 1, "lee@school.edu").await;

        let login = json!({ "email": "kim@school.edu", "password": "password123" });
        send(&app, request("POST", "/api/client/login", None, Some(login))).await;
        let beat = json!({ "device_name": "lab3-pc07", "ip_address": "10.0.3.7" });
        send(&app, request("POST", "/api/client/heartbeat", Some(&student_token(s.id)), Some(beat))).await;

        let (status, json) = send(&app, request("GET", "/api/dashboard?recent=5", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["students"], 2);
        assert_eq!(json["data"]["active_students"], 1);
        assert_eq!(json["data"]["sessions_online"], 1);
        assert_eq!(json["data"]["exams"], 0);
        assert_eq!(json["data"]["recent_activity"][0]["activity_type"], "login");
    }
}
