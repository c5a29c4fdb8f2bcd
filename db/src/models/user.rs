use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, QueryFilter, Set};
use serde::Serialize;

/// A staff account in the `users` table.
///
/// Staff create students, exams and announcements. The `admin` flag
/// additionally grants course management.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::student::Entity")]
    Students,
    #[sea_orm(has_many = "super::exam::Entity")]
    Exams,
    #[sea_orm(has_many = "super::announcement::Entity")]
    Announcements,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::exam::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exams.def()
    }
}

impl Related<super::announcement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Announcements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Hashes `password` with Argon2 and a random salt.
pub fn hash_password(password: &str) -> Result<String, DbErr> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbErr::Custom(format!("password hashing failed: {e}")))
}

/// Checks `password` against a stored PHC hash. Malformed hashes never match.
pub fn verify_password_hash(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

impl Model {
    pub async fn create(
        db: &DbConn,
        username: &str,
        email: &str,
        password: &str,
        admin: bool,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let active = ActiveModel {
            username: Set(username.to_owned()),
            email: Set(email.to_owned()),
            password_hash: Set(hash_password(password)?),
            admin: Set(admin),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        active.insert(db).await
    }

    /// Looks a user up by either username or email.
    pub async fn find_by_username_or_email(
        db: &DbConn,
        identifier: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(db)
            .await
    }

    /// Returns the user when `identifier` and `password` match an account.
    pub async fn verify_credentials(
        db: &DbConn,
        identifier: &str,
        password: &str,
    ) -> Result<Option<Model>, DbErr> {
        Ok(Self::find_by_username_or_email(db, identifier)
            .await?
            .filter(|user| user.verify_password(password)))
    }

    pub fn verify_password(&self, password: &str) -> bool {
        verify_password_hash(&self.password_hash, password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_create_and_verify_credentials() {
        let db = setup_test_db().await;

        let user = Model::create(&db, "proctor", "proctor@example.com", "s3cret!", false)
            .await
            .expect("Failed to create user");
        assert_ne!(user.password_hash, "s3cret!");
        assert!(user.verify_password("s3cret!"));

        let by_email = Model::verify_credentials(&db, "proctor@example.com", "s3cret!")
            .await
            .unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(user.id));

        let wrong = Model::verify_credentials(&db, "proctor", "nope").await.unwrap();
        assert!(wrong.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = setup_test_db().await;

        Model::create(&db, "a", "same@example.com", "pw", false)
            .await
            .unwrap();
        let dup = Model::create(&db, "b", "same@example.com", "pw", false).await;
        assert!(dup.is_err());
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!verify_password_hash("not-a-phc-string", "anything"));
    }
}
