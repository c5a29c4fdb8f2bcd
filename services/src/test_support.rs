//! Fixtures shared by the service tests.

use db::models::{course, student, user};
use sea_orm::DatabaseConnection;

pub async fn staff(db: &DatabaseConnection) -> user::Model {
    user::Model::create(db, "proctor", "proctor@example.com", "password", true)
        .await
        .expect("Failed to create staff user")
}

pub async fn course(db: &DatabaseConnection, code: &str) -> course::Model {
    course::Model::create(db, code, &format!("{code} programme"))
        .await
        .expect("Failed to create course")
}

pub async fn student(
    db: &DatabaseConnection,
    staff: &user::Model,
    course: &course::Model,
    year_level: i32,
    email: &str,
) -> student::Model {
    let username = email.split('@').next().unwrap_or(email);
    student::Model::create(db, username, email, "password", course.id, year_level, staff.id)
        .await
        .expect("Failed to create student")
}
