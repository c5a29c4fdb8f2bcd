use crate::error::{ServiceError, ServiceResult};
use db::models::course::{Entity as CourseEntity, Model};
use sea_orm::{DatabaseConnection, EntityTrait};

pub struct CourseService;

impl CourseService {
    pub async fn list(db: &DatabaseConnection) -> ServiceResult<Vec<Model>> {
        Ok(Model::all(db).await?)
    }

    pub async fn get(db: &DatabaseConnection, id: i64) -> ServiceResult<Model> {
        CourseEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Course {id} not found")))
    }

    pub async fn create(db: &DatabaseConnection, code: &str, name: &str) -> ServiceResult<Model> {
        let code = code.trim().to_uppercase();
        let name = name.trim();
        if code.is_empty() || code.len() > 20 {
            return Err(ServiceError::validation("Course code must be 1-20 characters"));
        }
        if name.is_empty() || name.len() > 255 {
            return Err(ServiceError::validation("Course name must be 1-255 characters"));
        }
        if Model::find_by_code(db, &code).await?.is_some() {
            return Err(ServiceError::Conflict(format!("Course {code} already exists")));
        }
        Ok(Model::create(db, &code, name).await?)
    }
}
