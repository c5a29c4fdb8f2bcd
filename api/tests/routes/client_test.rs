#[cfg(test)]
mod tests {
    use crate::helpers::app::{seed_course, seed_staff, seed_student, student_token};
    use crate::helpers::{make_test_app, request, send};
    use axum::http::StatusCode;
    use db::models::student::{Entity as StudentEntity, StudentStatus};
    use sea_orm::EntityTrait;
    use serde_json::json;
    use serial_test::serial;
    use services::command_service::CommandService;
    use util::config::{self, AppConfig};

    #[tokio::test]
    #[serial]
    async fn test_client_login_and_logout() {
        let (app, app_state) = make_test_app().await;
        let db = app_state.db();
        let (staff, _) = seed_staff(db, "proctor", false).await;
        let course = seed_course(db, "BSIT").await;
        let s = seed_student(db, &staff, &course, 1, "kim@school.edu").await;

        let bad = json!({ "email": "kim@school.edu", "password": "nope" });
        let (status, _) = send(&app, request("POST", "/api/client/login", None, Some(bad))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let body = json!({ "email": "KIM@school.edu", "password": "password123", "device_name": "lab3-pc07" });
        let (status, json) = send(&app, request("POST", "/api/client/login", None, Some(body))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["student"]["id"], s.id);
        assert_eq!(json["data"]["student"]["status"], "active");
        let token = json["data"]["token"].as_str().unwrap().to_owned();

        let (status, _) = send(&app, request("POST", "/api/client/logout", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);

        let stored = StudentEntity::find_by_id(s.id).one(db).await.unwrap().unwrap();
        assert_eq!(stored.status, StudentStatus::Inactive);

        let beat = json!({ "device_name": "lab3-pc07", "ip_address": "10.0.3.7" });
        let (status, _) = send(&app, request("POST", "/api/client/heartbeat", Some(&token), Some(beat))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn test_heartbeat() {
        let (app, app_state) = make_test_app().await;
        let db = app_state.db();
        let (staff, staff_token) = seed_staff(db, "proctor", false).await;
        let course = seed_course(db, "BSIT").await;
        let s = seed_student(db, &staff, &course, 1, "kim@school.edu").await;
        let token = student_token(s.id);

        let beat = json!({ "device_name": "lab3-pc07", "ip_address": "10.0.3.7" });
        let (status, json) =
            send(&app, request("POST", "/api/client/heartbeat", Some(&token), Some(beat.clone()))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "online");
        assert_eq!(json["data"]["student_id"], s.id);
        let session_id = json["data"]["id"].clone();

        let (_, json) =
            send(&app, request("POST", "/api/client/heartbeat", Some(&token), Some(beat.clone()))).await;
        assert_eq!(json["data"]["id"], session_id);

        let malformed = json!({ "device_name": "lab3-pc07", "ip_address": "10.0.3.7", "timestamp": "yesterday" });
        let (status, _) =
            send(&app, request("POST", "/api/client/heartbeat", Some(&token), Some(malformed))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let no_ip = json!({ "device_name": "lab3-pc07" });
        let (status, json) =
            send(&app, request("POST", "/api/client/heartbeat", Some(&token), Some(no_ip))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "ip_address is required");

        let (status, _) =
            send(&app, request("POST", "/api/client/heartbeat", Some(&staff_token), Some(beat))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let uri = format!("/api/students/{}/sessions", s.id);
        let (_, json) = send(&app, request("GET", &uri, Some(&staff_token), None)).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn test_bad_heartbeat_thresholds_are_a_server_error() {
        let (app, app_state) = make_test_app().await;
        let db = app_state.db();
        let (staff, _) = seed_staff(db, "proctor", false).await;
        let course = seed_course(db, "BSIT").await;
        let s = seed_student(db, &staff, &course, 1, "kim@school.edu").await;

        let previous = config::heartbeat_idle_seconds();
        AppConfig::set_heartbeat_idle_seconds(config::heartbeat_offline_seconds());

        let beat = json!({ "device_name": "lab3-pc07", "ip_address": "10.0.3.7" });
        let (status, json) =
            send(&app, request("POST", "/api/client/heartbeat", Some(&student_token(s.id)), Some(beat))).await;
        AppConfig::set_heartbeat_idle_seconds(previous);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["message"], "Server configuration error");
    }

    #[tokio::test]
    #[serial]
    async fn test_commands_execute_in_order_once() {
        let (app, app_state) = make_test_app().await;
        let db = app_state.db();
        let (staff, _) = seed_staff(db, "proctor", false).await;
        let course = seed_course(db, "BSIT").await;
        let s = seed_student(db, &staff, &course, 1, "kim@school.edu").await;
        let other = seed_student(db, &staff, &course, 1, "lee@school.edu").await;
        let token = student_token(s.id);

        let first = CommandService::issue(db, s.id, "lock_screen").await.unwrap();
        let second = CommandService::issue(db, s.id, "close_browser").await.unwrap();
        let foreign = CommandService::issue(db, other.id, "screenshot").await.unwrap();

        let (_, json) = send(&app, request("GET", "/api/client/commands", Some(&token), None)).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 2);

        let (_, json) = send(&app, request("GET", "/api/client/commands/next", Some(&token), None)).await;
        assert_eq!(json["data"]["id"], first.id);

        let executed = |id: i64| format!("/api/client/commands/{id}/executed");

        let (status, _) =
            send(&app, request("POST", &executed(second.id), Some(&token), Some(json!({})))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, json) =
            send(&app, request("POST", &executed(first.id), Some(&token), Some(json!({})))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["data"]["executed_at"].is_string());

        let (status, json) =
            send(&app, request("POST", &executed(first.id), Some(&token), Some(json!({})))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["message"], format!("Command {} has already been executed", first.id));

        let (status, _) =
            send(&app, request("POST", &executed(foreign.id), Some(&token), Some(json!({})))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, json) = send(&app, request("GET", "/api/client/commands/next", Some(&token), None)).await;
        assert_eq!(json["data"]["id"], second.id);
    }

    #[tokio::test]
    #[serial]
    async fn test_activity_types_are_closed() {
        let (app, app_state) = make_test_app().await;
        let db = app_state.db();
        let (staff, _) = seed_staff(db, "proctor", false).await;
        let course = seed_course(db, "BSIT").await;
        let s = seed_student(db, &staff, &course, 1, "kim@school.edu").await;
        let token = student_token(s.id);

        let body = json!({ "activity_type": "tab_switch", "description": "Switched to browser" });
        let (status, json) = send(&app, request("POST", "/api/client/activity", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["activity_type"], "tab_switch");

        let body = json!({ "activity_type": "copy_paste" });
        let (status, _) = send(&app, request("POST", "/api/client/activity", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn test_client_sees_targeted_announcements_and_exams() {
        let (app, app_state) = make_test_app().await;
        let db = app_state.db();
        let (staff, staff_token) = seed_staff(db, "proctor", false).await;
        let course = seed_course(db, "BSIT").await;
        let s = seed_student(db, &staff, &course, 2, "kim@school.edu").await;
        let token = student_token(s.id);

        for year in [2, 3] {
            let body = json!({
                "title": format!("Year {year} notice"),
                "content": "Bring your ID",
                "target_course": course.id,
                "target_year_level": year
            });
            let (status, _) =
                send(&app, request("POST", "/api/announcements", Some(&staff_token), Some(body))).await;
            assert_eq!(status, StatusCode::CREATED);
        }
        let exam = json!({
            "room": "Lab 3",
            "title": "Midterm",
            "duration": 60,
            "target_course": course.id,
            "target_year_level": 2
        });
        send(&app, request("POST", "/api/exams", Some(&staff_token), Some(exam))).await;

        let (_, json) = send(&app, request("GET", "/api/client/announcements", Some(&token), None)).await;
        let items = json["data"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["title"], "Year 2 notice");

        let (_, json) = send(&app, request("GET", "/api/client/exams", Some(&token), None)).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
    }
}
