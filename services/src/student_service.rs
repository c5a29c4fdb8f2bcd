use crate::error::{ServiceError, ServiceResult};
use db::models::{
    activity_log::{self, ActivityType},
    course::Entity as CourseEntity,
    student::{self, Column as StudentColumn, Entity as StudentEntity, Model, StudentStatus},
};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

pub const MIN_YEAR_LEVEL: i32 = 1;
pub const MAX_YEAR_LEVEL: i32 = 10;

pub fn validate_year_level(year_level: i32) -> ServiceResult<()> {
    if (MIN_YEAR_LEVEL..=MAX_YEAR_LEVEL).contains(&year_level) {
        Ok(())
    } else {
        Err(ServiceError::validation(format!(
            "Year level must be between {MIN_YEAR_LEVEL} and {MAX_YEAR_LEVEL}"
        )))
    }
}

#[derive(Debug, Clone)]
pub struct NewStudent {
    pub username: String,
    pub email: String,
    pub password: String,
    pub course_id: i64,
    pub year_level: i32,
}

#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    pub course_id: Option<i64>,
    pub year_level: Option<i32>,
    pub status: Option<StudentStatus>,
    /// Case-insensitive partial match on username or email.
    pub query: Option<String>,
    /// Comma-separated fields, `-` prefix for descending.
    pub sort: Option<String>,
    pub page: u64,
    pub per_page: u64,
}

pub struct StudentService;

impl StudentService {
    pub async fn create(
        db: &DatabaseConnection,
        created_by: i64,
        params: NewStudent,
    ) -> ServiceResult<Model> {
        let username = params.username.trim();
        let email = params.email.trim().to_lowercase();

        if username.is_empty() || username.len() > 50 {
            return Err(ServiceError::validation("Username must be 1-50 characters"));
        }
        if !email.contains('@') || email.len() > 100 {
            return Err(ServiceError::validation(
                "A valid email of at most 100 characters is required",
            ));
        }
        if params.password.is_empty() {
            return Err(ServiceError::validation("Password is required"));
        }
        validate_year_level(params.year_level)?;

        if CourseEntity::find_by_id(params.course_id).one(db).await?.is_none() {
            return Err(ServiceError::not_found(format!(
                "Course {} not found",
                params.course_id
            )));
        }
        if Model::find_by_email(db, &email).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "A student with email {email} already exists"
            )));
        }

        let created = Model::create(
            db,
            username,
            &email,
            &params.password,
            params.course_id,
            params.year_level,
            created_by,
        )
        .await?;
        tracing::info!(student_id = created.id, created_by, "student enrolled");
        Ok(created)
    }

    pub async fn get(db: &DatabaseConnection, id: i64) -> ServiceResult<Model> {
        StudentEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Student {id} not found")))
    }

    /// Filtered, sorted page of the roster plus the total match count.
    pub async fn list(
        db: &DatabaseConnection,
        filter: &StudentFilter,
    ) -> ServiceResult<(Vec<Model>, u64)> {
        let mut condition = Condition::all();
        if let Some(course_id) = filter.course_id {
            condition = condition.add(StudentColumn::CourseId.eq(course_id));
        }
        if let Some(year) = filter.year_level {
            condition = condition.add(StudentColumn::YearLevel.eq(year));
        }
        if let Some(status) = filter.status {
            condition = condition.add(StudentColumn::Status.eq(status));
        }
        if let Some(q) = filter.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let q = q.to_lowercase();
            condition = condition.add(
                Condition::any()
                    .add(StudentColumn::Username.contains(&q))
                    .add(StudentColumn::Email.contains(&q)),
            );
        }

        let mut query = StudentEntity::find().filter(condition);
        let mut sorted = false;
        if let Some(sort) = &filter.sort {
            for field in sort.split(',').map(str::trim) {
                let (name, desc) = match field.strip_prefix('-') {
                    Some(rest) => (rest, true),
                    None => (field, false),
                };
                let column = match name {
                    "username" => StudentColumn::Username,
                    "email" => StudentColumn::Email,
                    "year_level" => StudentColumn::YearLevel,
                    "status" => StudentColumn::Status,
                    "created_at" => StudentColumn::CreatedAt,
                    _ => continue,
                };
                query = if desc {
                    query.order_by_desc(column)
                } else {
                    query.order_by_asc(column)
                };
                sorted = true;
            }
        }
        if !sorted {
            query = query.order_by_asc(StudentColumn::Id);
        }

        let paginator = query.paginate(db, filter.per_page.max(1));
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(filter.page.saturating_sub(1)).await?;
        Ok((rows, total))
    }

    pub async fn set_status(
        db: &DatabaseConnection,
        id: i64,
        status: StudentStatus,
    ) -> ServiceResult<Model> {
        let updated = student::Model::set_status(db, id, status).await?;
        tracing::info!(student_id = id, %status, "student status changed");
        Ok(updated)
    }

    pub async fn authenticate(
        db: &DatabaseConnection,
        email: &str,
        password: &str,
    ) -> ServiceResult<Model> {
        Model::find_by_email(db, &email.trim().to_lowercase())
            .await?
            .filter(|s| s.verify_password(password))
            .ok_or_else(|| ServiceError::Unauthorized("Invalid email or password".into()))
    }

    /// Client sign-in: verifies credentials, marks the student active and logs
    /// a `login` activity in one transaction.
    pub async fn client_login(
        db: &DatabaseConnection,
        email: &str,
        password: &str,
        device: Option<&str>,
    ) -> ServiceResult<Model> {
        let found = Self::authenticate(db, email, password).await?;

        let txn = db.begin().await?;
        let updated = student::Model::set_status(&txn, found.id, StudentStatus::Active).await?;
        let description = device.map(|d| format!("Signed in from {d}"));
        activity_log::Model::append(&txn, found.id, ActivityType::Login, description.as_deref())
            .await?;
        txn.commit().await?;

        tracing::info!(student_id = found.id, "student client signed in");
        Ok(updated)
    }

    pub async fn client_logout(db: &DatabaseConnection, student_id: i64) -> ServiceResult<Model> {
        let txn = db.begin().await?;
        let updated = student::Model::set_status(&txn, student_id, StudentStatus::Inactive).await?;
        activity_log::Model::append(&txn, student_id, ActivityType::Logout, None).await?;
        txn.commit().await?;

        tracing::info!(student_id, "student client signed out");
        Ok(updated)
    }
}
