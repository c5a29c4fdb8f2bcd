#[cfg(test)]
mod tests {
    use crate::helpers::app::{seed_staff, student_token};
    use crate::helpers::{make_test_app, request, send};
    use axum::http::StatusCode;
    use serde_json::json;
    use serial_test::serial;

    fn register_body(username: &str) -> serde_json::Value {
        json!({
            "username": username,
            "email": format!("{username}@school.edu"),
            "password": "longenough"
        })
    }

    /// The first account becomes admin, later ones do not.
    #[tokio::test]
    #[serial]
    async fn test_register_bootstraps_admin() {
        let (app, _) = make_test_app().await;

        let (status, json) =
            send(&app, request("POST", "/api/auth/register", None, Some(register_body("first")))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["admin"], true);
        assert!(!json["data"]["token"].as_str().unwrap().is_empty());

        let (status, json) =
            send(&app, request("POST", "/api/auth/register", None, Some(register_body("second")))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["admin"], false);
    }

    #[tokio::test]
    #[serial]
    async fn test_simultaneous_first_registrations_yield_one_admin() {
        let (app, _) = make_test_app().await;
        let register = |name: &'static str| send(&app, request("POST", "/api/auth/register", None, Some(register_body(name))));

        let (a, b, c, d) = tokio::join!(register("ann"), register("ben"), register("cat"), register("dov"));

        let mut admins = 0;
        for (status, json) in [a, b, c, d] {
            assert_eq!(status, StatusCode::CREATED);
            if json["data"]["admin"] == true {
                admins += 1;
            }
        }
        assert_eq!(admins, 1);
    }

    #[tokio::test]
    #[serial]
    async fn test_register_rejects_duplicates_and_bad_input() {
        let (app, _) = make_test_app().await;
        send(&app, request("POST", "/api/auth/register", None, Some(register_body("proctor")))).await;

        let (status, json) =
            send(&app, request("POST", "/api/auth/register", None, Some(register_body("proctor")))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["success"], false);

        let body = json!({ "username": "ok_name", "email": "ok@school.edu", "password": "short" });
        let (status, json) = send(&app, request("POST", "/api/auth/register", None, Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Password must be at least 8 characters");
    }

    #[tokio::test]
    #[serial]
    async fn test_login_by_username_or_email() {
        let (app, app_state) = make_test_app().await;
        seed_staff(app_state.db(), "proctor", false).await;

        for identifier in ["proctor", "proctor@school.edu"] {
            let body = json!({ "identifier": identifier, "password": "password123" });
            let (status, json) = send(&app, request("POST", "/api/auth/login", None, Some(body))).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["data"]["username"], "proctor");
        }

        let body = json!({ "identifier": "proctor", "password": "wrong-password" });
        let (status, _) = send(&app, request("POST", "/api/auth/login", None, Some(body))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn test_me_requires_staff_token() {
        let (app, app_state) = make_test_app().await;
        let (user, token) = seed_staff(app_state.db(), "proctor", true).await;

        let (status, json) = send(&app, request("GET", "/api/auth/me", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["id"], user.id);
        assert_eq!(json["data"]["admin"], true);

        let (status, _) = send(&app, request("GET", "/api/auth/me", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) =
            send(&app, request("GET", "/api/auth/me", Some("not-a-jwt"), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) =
            send(&app, request("GET", "/api/auth/me", Some(&student_token(1)), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[serial]
    async fn test_logout_revokes_token() {
        let (app, app_state) = make_test_app().await;
        let (_, token) = seed_staff(app_state.db(), "proctor", false).await;

        let (status, _) = send(&app, request("POST", "/api/auth/logout", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = send(&app, request("GET", "/api/auth/me", Some(&token), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "Token has been revoked");
    }
}
