#[cfg(test)]
mod tests {
    use crate::helpers::app::seed_staff;
    use crate::helpers::{make_test_app, request, send};
    use axum::http::StatusCode;
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_admin_creates_courses_staff_lists_them() {
        let (app, app_state) = make_test_app().await;
        let (_, admin) = seed_staff(app_state.db(), "admin", true).await;
        let (_, staff) = seed_staff(app_state.db(), "proctor", false).await;

        let body = json!({ "code": "bsit", "name": "BS Information Technology" });
        let (status, json) = send(&app, request("POST", "/api/courses", Some(&admin), Some(body.clone()))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["code"], "BSIT");

        let (status, _) = send(&app, request("POST", "/api/courses", Some(&admin), Some(body.clone()))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, json) = send(&app, request("POST", "/api/courses", Some(&staff), Some(body))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Admin access required");

        let (status, json) = send(&app, request("GET", "/api/courses", Some(&staff), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn test_course_code_length_is_validated() {
        let (app, app_state) = make_test_app().await;
        let (_, admin) = seed_staff(app_state.db(), "admin", true).await;

        let body = json!({ "code": "X".repeat(21), "name": "Too long" });
        let (status, json) = send(&app, request("POST", "/api/courses", Some(&admin), Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Course code must be 1-20 characters");
    }
}
