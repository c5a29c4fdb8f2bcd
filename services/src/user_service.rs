use crate::error::{ServiceError, ServiceResult};
use db::models::user::{self, Entity as UserEntity, Model};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    sea_query::{Expr, Query},
};

#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct UserService;

impl UserService {
    /// Creates a staff account. The very first account is made an admin so a
    /// fresh install can manage courses.
    ///
    /// The account is inserted as a regular user and then promoted by a
    /// single conditional `UPDATE` that only matches while no admin exists,
    /// so concurrent registrations on an empty install yield one admin.
    pub async fn register(db: &DatabaseConnection, params: RegisterUser) -> ServiceResult<Model> {
        let username = params.username.trim();
        let email = params.email.trim().to_lowercase();

        if username.is_empty() || username.len() > 50 {
            return Err(ServiceError::validation("Username must be 1-50 characters"));
        }
        if !email.contains('@') || email.len() > 100 {
            return Err(ServiceError::validation("A valid email of at most 100 characters is required"));
        }
        if params.password.len() < 8 {
            return Err(ServiceError::validation("Password must be at least 8 characters"));
        }

        if Model::find_by_username_or_email(db, username).await?.is_some()
            || Model::find_by_username_or_email(db, &email).await?.is_some()
        {
            return Err(ServiceError::Conflict(
                "A user with this username or email already exists".into(),
            ));
        }

        let created = Model::create(db, username, &email, &params.password, false).await?;
        let admin = Self::promote_if_first_admin(db, created.id).await?;
        tracing::info!(user_id = created.id, admin, "registered staff user");
        Ok(Model { admin, ..created })
    }

    /// Sets `admin` on `user_id` only when no admin account exists yet.
    async fn promote_if_first_admin(db: &DatabaseConnection, user_id: i64) -> ServiceResult<bool> {
        let existing_admin = Query::select()
            .expr(Expr::val(1))
            .from(UserEntity)
            .and_where(Expr::col(user::Column::Admin).eq(true))
            .to_owned();

        let result = UserEntity::update_many()
            .col_expr(user::Column::Admin, Expr::value(true))
            .filter(user::Column::Id.eq(user_id))
            .filter(Expr::exists(existing_admin).not())
            .exec(db)
            .await?;
        Ok(result.rows_affected == 1)
    }

    pub async fn authenticate(
        db: &DatabaseConnection,
        identifier: &str,
        password: &str,
    ) -> ServiceResult<Model> {
        Model::verify_credentials(db, identifier.trim(), password)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Invalid username or password".into()))
    }

    pub async fn find(db: &DatabaseConnection, id: i64) -> ServiceResult<user::Model> {
        UserEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("User {id} not found")))
    }
}
