#[cfg(test)]
mod tests {
    use crate::helpers::app::{seed_course, seed_staff, seed_student};
    use crate::helpers::{make_test_app, request, send};
    use axum::{Router, http::StatusCode};
    use chrono::{Duration, Utc};
    use serde_json::{Value, json};
    use serial_test::serial;

    fn exam_body(course_id: i64, exam_date: Option<String>) -> Value {
        json!({
            "room": "Lab 3",
            "title": "Data Structures Midterm",
            "duration": 90,
            "exam_date": exam_date,
            "requirement": "Calculator allowed",
            "target_course": course_id,
            "target_year_level": 2
        })
    }

    async fn create_exam(app: &Router, token: &str, body: Value) -> i64 {
        let (status, json) = send(app, request("POST", "/api/exams", Some(token), Some(body))).await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        json["data"]["id"].as_i64().unwrap()
    }

    async fn create_session(app: &Router, token: &str, exam_id: i64) -> i64 {
        let uri = format!("/api/exams/{exam_id}/sessions");
        let (status, json) = send(app, request("POST", &uri, Some(token), None)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["status"], "pending");
        json["data"]["id"].as_i64().unwrap()
    }

    /// Enrol a student, schedule an exam for their cohort, open a session,
    /// start it, end it, end it again.
    #[tokio::test]
    #[serial]
    async fn test_exam_session_lifecycle() {
        let (app, app_state) = make_test_app().await;
        let db = app_state.db();
        let (_, token) = seed_staff(db, "proctor", false).await;
        let course = seed_course(db, "BSIT").await;

        let (status, json) = send(
            &app,
            request(
                "POST",
                "/api/students",
                Some(&token),
                Some(json!({
                    "username": "kim",
                    "email": "kim@school.edu",
                    "password": "initial-pass",
                    "course_id": course.id,
                    "year_level": 2
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let student_id = json["data"]["id"].as_i64().unwrap();

        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        let exam_id = create_exam(&app, &token, exam_body(course.id, Some(today))).await;
        let session_id = create_session(&app, &token, exam_id).await;
        let start = format!("/api/exams/{exam_id}/sessions/{session_id}/start");
        let end = format!("/api/exams/{exam_id}/sessions/{session_id}/end");

        let (status, _) = send(&app, request("POST", &end, Some(&token), None)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, json) = send(&app, request("POST", &start, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "active");
        assert!(json["data"]["started_at"].is_string());

        let (status, _) = send(&app, request("POST", &start, Some(&token), None)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, json) = send(&app, request("POST", &end, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ended");
        assert_eq!(json["data"]["changed"], true);
        let ended_at = json["data"]["ended_at"].clone();

        let (status, json) = send(&app, request("POST", &end, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["changed"], false);
        assert_eq!(json["data"]["ended_at"], ended_at);

        let activity = format!("/api/students/{student_id}/activity");
        let (_, json) = send(&app, request("GET", &activity, Some(&token), None)).await;
        let kinds: Vec<&str> = json["data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["activity_type"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, vec!["exam_end", "exam_start"]);
    }

    #[tokio::test]
    #[serial]
    async fn test_future_exam_cannot_start() {
        let (app, app_state) = make_test_app().await;
        let (_, token) = seed_staff(app_state.db(), "proctor", false).await;
        let course = seed_course(app_state.db(), "BSIT").await;

        let later = (Utc::now() + Duration::days(3)).date_naive().format("%Y-%m-%d").to_string();
        let exam_id = create_exam(&app, &token, exam_body(course.id, Some(later))).await;
        let session_id = create_session(&app, &token, exam_id).await;

        let uri = format!("/api/exams/{exam_id}/sessions/{session_id}/start");
        let (status, _) = send(&app, request("POST", &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, json) = send(&app, request("GET", &format!("/api/exams/{exam_id}/sessions"), Some(&token), None)).await;
        assert_eq!(json["data"][0]["status"], "pending");
    }

    #[tokio::test]
    #[serial]
    async fn test_session_must_belong_to_exam() {
        let (app, app_state) = make_test_app().await;
        let (_, token) = seed_staff(app_state.db(), "proctor", false).await;
        let course = seed_course(app_state.db(), "BSIT").await;

        let a = create_exam(&app, &token, exam_body(course.id, None)).await;
        let b = create_exam(&app, &token, exam_body(course.id, None)).await;
        let session_of_a = create_session(&app, &token, a).await;

        let uri = format!("/api/exams/{b}/sessions/{session_of_a}/start");
        let (status, _) = send(&app, request("POST", &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, request("POST", "/api/exams/999/sessions", Some(&token), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn test_create_validates_date_and_course() {
        let (app, app_state) = make_test_app().await;
        let (_, token) = seed_staff(app_state.db(), "proctor", false).await;
        let course = seed_course(app_state.db(), "BSIT").await;

        let body = exam_body(course.id, Some("14/03/2026".into()));
        let (status, _) = send(&app, request("POST", "/api/exams", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, request("POST", "/api/exams", Some(&token), Some(exam_body(999, None)))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let mut body = exam_body(course.id, None);
        body["duration"] = json!(0);
        let (status, _) = send(&app, request("POST", "/api/exams", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn test_exam_students_follow_cohort() {
        let (app, app_state) = make_test_app().await;
        let db = app_state.db();
        let (staff, token) = seed_staff(db, "proctor", false).await;
        let course = seed_course(db, "BSIT").await;
        seed_student(db, &staff, &course, 2, "in@school.edu").await;
        seed_student(db, &staff, &course, 3, "out@school.edu").await;

        let exam_id = create_exam(&app, &token, exam_body(course.id, None)).await;
        let uri = format!("/api/exams/{exam_id}/students");
        let (status, json) = send(&app, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        let students = json["data"].as_array().unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0]["email"], "in@school.edu");

        let (_, json) = send(&app, request("GET", "/api/exams", Some(&token), None)).await;
        assert_eq!(json["data"]["total"], 1);
    }
}
