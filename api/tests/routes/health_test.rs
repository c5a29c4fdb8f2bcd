#[cfg(test)]
mod tests {
    use crate::helpers::{make_test_app, request, send};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_is_public() {
        let (app, _) = make_test_app().await;
        let (status, json) = send(&app, request("GET", "/api/health", None, None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "OK");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (app, _) = make_test_app().await;
        let (status, _) = send(&app, request("GET", "/api/nope", None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
