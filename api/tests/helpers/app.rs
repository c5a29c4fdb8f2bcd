use api::auth::{Role, generate_jwt};
use api::routes::routes;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use db::models::{course, student, user};
use db::test_utils::setup_test_db;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;
use util::state::AppState;

/// Router mounted at `/api` over a fresh in-memory database.
pub async fn make_test_app() -> (Router, AppState) {
    let db = setup_test_db().await;
    let app_state = AppState::new(db);
    let app = Router::new().nest("/api", routes(app_state.clone()));
    (app, app_state)
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub async fn seed_staff(db: &DatabaseConnection, username: &str, admin: bool) -> (user::Model, String) {
    let user = user::Model::create(
        db,
        username,
        &format!("{username}@school.edu"),
        "password123",
        admin,
    )
    .await
    .expect("Failed to create staff user");
    let (token, _) = generate_jwt(user.id, user.admin, Role::Staff).unwrap();
    (user, token)
}

pub async fn seed_course(db: &DatabaseConnection, code: &str) -> course::Model {
    course::Model::create(db, code, &format!("{code} programme"))
        .await
        .expect("Failed to create course")
}

pub async fn seed_student(
    db: &DatabaseConnection,
    staff: &user::Model,
    course: &course::Model,
    year_level: i32,
    email: &str,
) -> student::Model {
    let username = email.split('@').next().unwrap();
    student::Model::create(db, username, email, "password123", course.id, year_level, staff.id)
        .await
        .expect("Failed to create student")
}

pub fn student_token(student_id: i64) -> String {
    generate_jwt(student_id, false, Role::Student).unwrap().0
}
