#[cfg(test)]
mod tests {
    use crate::helpers::app::{seed_course, seed_staff, seed_student};
    use crate::helpers::{make_test_app, request, send};
    use axum::http::StatusCode;
    use serde_json::json;
    use serial_test::serial;

    fn new_student(email: &str, course_id: i64, year_level: i32) -> serde_json::Value {
        json!({
            "username": email.split('@').next().unwrap(),
            "email": email,
            "password": "initial-pass",
            "course_id": course_id,
            "year_level": year_level
        })
    }

    #[tokio::test]
    #[serial]
    async fn test_create_student() {
        let (app, app_state) = make_test_app().await;
        let (staff, token) = seed_staff(app_state.db(), "proctor", false).await;
        let course = seed_course(app_state.db(), "BSIT").await;

        let (status, json) = send(
            &app,
            request("POST", "/api/students", Some(&token), Some(new_student("Kim@school.edu", course.id, 2))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["email"], "kim@school.edu");
        assert_eq!(json["data"]["status"], "inactive");
        assert_eq!(json["data"]["created_by"], staff.id);

        let (status, _) = send(
            &app,
            request("POST", "/api/students", Some(&token), Some(new_student("kim@school.edu", course.id, 3))),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            request("POST", "/api/students", Some(&token), Some(new_student("lee@school.edu", 999, 1))),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, json) = send(
            &app,
            request("POST", "/api/students", Some(&token), Some(new_student("lee@school.edu", course.id, 11))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Year level must be between 1 and 10");
    }

    #[tokio::test]
    #[serial]
    async fn test_list_filters_and_paginates() {
        let (app, app_state) = make_test_app().await;
        let db = app_state.db();
        let (staff, token) = seed_staff(db, "proctor", false).await;
        let it = seed_course(db, "BSIT").await;
        let cs = seed_course(db, "BSCS").await;
        seed_student(db, &staff, &it, 1, "zed@school.edu").await;
        seed_student(db, &staff, &it, 1, "amy@school.edu").await;
        seed_student(db, &staff, &cs, 2, "bob@school.edu").await;

        let uri = format!("/api/students?course_id={}&sort=username&per_page=1", it.id);
        let (status, json) = send(&app, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 2);
        assert_eq!(json["data"]["per_page"], 1);
        assert_eq!(json["data"]["items"][0]["username"], "amy");

        let (_, json) = send(&app, request("GET", "/api/students?q=BOB", Some(&token), None)).await;
        assert_eq!(json["data"]["total"], 1);

        let (status, _) =
            send(&app, request("GET", "/api/students?status=asleep", Some(&token), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn test_huge_page_number_returns_empty_page() {
        let (app, app_state) = make_test_app().await;
        let db = app_state.db();
        let (staff, token) = seed_staff(db, "proctor", false).await;
        let course = seed_course(db, "BSIT").await;
        let s = seed_student(db, &staff, &course, 1, "kim@school.edu").await;

        for uri in [
            format!("/api/students?page={}", u64::MAX),
            format!("/api/students/{}/activity?page={}&per_page={}", s.id, u64::MAX, u64::MAX),
            format!("/api/exams?page={}", u64::MAX),
            format!("/api/announcements?page={}", u64::MAX),
        ] {
            let (status, json) = send(&app, request("GET", &uri, Some(&token), None)).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(json["data"]["items"].as_array().unwrap().len(), 0, "{uri}");
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_path_ids_are_checked() {
        let (app, app_state) = make_test_app().await;
        let (_, token) = seed_staff(app_state.db(), "proctor", false).await;

        let (status, json) = send(&app, request("GET", "/api/students/999", Some(&token), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Student 999 not found");

        let (status, _) = send(&app, request("GET", "/api/students/abc", Some(&token), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, request("GET", "/api/students/999", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn test_status_transition() {
        let (app, app_state) = make_test_app().await;
        let db = app_state.db();
        let (staff, token) = seed_staff(db, "proctor", false).await;
        let course = seed_course(db, "BSIT").await;
        let s = seed_student(db, &staff, &course, 1, "kim@school.edu").await;
        let uri = format!("/api/students/{}/status", s.id);

        let (status, json) =
            send(&app, request("PUT", &uri, Some(&token), Some(json!({ "status": "Active" })))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "active");

        let (status, _) =
            send(&app, request("PUT", &uri, Some(&token), Some(json!({ "status": "deleted" })))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn test_commands_are_queued_and_logged() {
        let (app, app_state) = make_test_app().await;
        let db = app_state.db();
        let (staff, token) = seed_staff(db, "proctor", false).await;
        let course = seed_course(db, "BSIT").await;
        let s = seed_student(db, &staff, &course, 1, "kim@school.edu").await;
        let commands = format!("/api/students/{}/commands", s.id);

        for text in ["lock_screen", "close_browser"] {
            let (status, json) =
                send(&app, request("POST", &commands, Some(&token), Some(json!({ "command": text })))).await;
            assert_eq!(status, StatusCode::CREATED);
            assert!(json["data"]["executed_at"].is_null());
        }

        let (status, _) =
            send(&app, request("POST", &commands, Some(&token), Some(json!({ "command": "" })))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, json) = send(&app, request("GET", &format!("{commands}?pending=true"), Some(&token), None)).await;
        let queue = json["data"].as_array().unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0]["command"], "lock_screen");

        let activity = format!("/api/students/{}/activity?type=command", s.id);
        let (status, json) = send(&app, request("GET", &activity, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 2);

        let bad = format!("/api/students/{}/activity?type=copy_paste", s.id);
        let (status, _) = send(&app, request("GET", &bad, Some(&token), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
