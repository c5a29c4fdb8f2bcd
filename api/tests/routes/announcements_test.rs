#[cfg(test)]
mod tests {
    use crate::helpers::app::{seed_course, seed_staff, seed_student};
    use crate::helpers::{make_test_app, request, send};
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use serial_test::serial;

    fn notice(course_id: i64, year: i32) -> Value {
        json!({
            "title": "Room change",
            "content": "The midterm moves to Lab 4",
            "target_course": course_id,
            "target_year_level": year
        })
    }

    #[tokio::test]
    #[serial]
    async fn test_create_and_fetch() {
        let (app, app_state) = make_test_app().await;
        let db = app_state.db();
        let (staff, token) = seed_staff(db, "proctor", false).await;
        let course = seed_course(db, "BSIT").await;

        let (status, json) =
            send(&app, request("POST", "/api/announcements", Some(&token), Some(notice(course.id, 2)))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["created_by"], staff.id);
        let id = json["data"]["id"].as_i64().unwrap();

        let (status, json) =
            send(&app, request("GET", &format!("/api/announcements/{id}"), Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["title"], "Room change");

        let (status, _) = send(&app, request("GET", "/api/announcements/999", Some(&token), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, json) = send(&app, request("GET", "/api/announcements", Some(&token), None)).await;
        assert_eq!(json["data"]["total"], 1);
    }

    #[tokio::test]
    #[serial]
    async fn test_create_rejects_bad_targets() {
        let (app, app_state) = make_test_app().await;
        let db = app_state.db();
        let (_, token) = seed_staff(db, "proctor", false).await;
        let course = seed_course(db, "BSIT").await;

        let (status, json) =
            send(&app, request("POST", "/api/announcements", Some(&token), Some(notice(course.id, 0)))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Year level must be between 1 and 10");

        let (status, _) =
            send(&app, request("POST", "/api/announcements", Some(&token), Some(notice(999, 1)))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) =
            send(&app, request("POST", "/api/announcements", None, Some(notice(course.id, 1)))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn test_recipients_follow_cohort() {
        let (app, app_state) = make_test_app().await;
        let db = app_state.db();
        let (staff, token) = seed_staff(db, "proctor", false).await;
        let it = seed_course(db, "BSIT").await;
        let cs = seed_course(db, "BSCS").await;
        seed_student(db, &staff, &it, 2, "in@school.edu").await;
        seed_student(db, &staff, &it, 3, "wrong-year@school.edu").await;
        seed_student(db, &staff, &cs, 2, "wrong-course@school.edu").await;

        let (_, json) =
            send(&app, request("POST", "/api/announcements", Some(&token), Some(notice(it.id, 2)))).await;
        let id = json["data"]["id"].as_i64().unwrap();

        let uri = format!("/api/announcements/{id}/recipients");
        let (status, json) = send(&app, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        let recipients = json["data"].as_array().unwrap();
        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0]["email"], "in@school.edu");
    }
}
