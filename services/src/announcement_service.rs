use crate::error::{ServiceError, ServiceResult};
use crate::student_service::validate_year_level;
use db::models::{
    announcement::{self, Column as AnnouncementColumn, Entity as AnnouncementEntity},
    course::Entity as CourseEntity,
    student,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

#[derive(Debug, Clone)]
pub struct CreateAnnouncement {
    pub title: String,
    pub content: String,
    pub target_course: i64,
    pub target_year_level: i32,
}

pub struct AnnouncementService;

impl AnnouncementService {
    pub async fn create(
        db: &DatabaseConnection,
        created_by: i64,
        params: CreateAnnouncement,
    ) -> ServiceResult<announcement::Model> {
        let title = params.title.trim();
        let content = params.content.trim();
        if title.is_empty() || title.len() > 255 {
            return Err(ServiceError::validation("Title must be 1-255 characters"));
        }
        if content.is_empty() {
            return Err(ServiceError::validation("Content is required"));
        }
        validate_year_level(params.target_year_level)?;
        if CourseEntity::find_by_id(params.target_course).one(db).await?.is_none() {
            return Err(ServiceError::not_found(format!(
                "Course {} not found",
                params.target_course
            )));
        }

        let created = announcement::Model::create(
            db,
            title,
            content,
            params.target_course,
            params.target_year_level,
            created_by,
        )
        .await?;
        tracing::info!(announcement_id = created.id, created_by, "announcement posted");
        Ok(created)
    }

    pub async fn get(db: &DatabaseConnection, id: i64) -> ServiceResult<announcement::Model> {
        AnnouncementEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Announcement {id} not found")))
    }

    pub async fn list(
        db: &DatabaseConnection,
        course_id: Option<i64>,
        year_level: Option<i32>,
        page: u64,
        per_page: u64,
    ) -> ServiceResult<(Vec<announcement::Model>, u64)> {
        let mut query = AnnouncementEntity::find();
        if let Some(course_id) = course_id {
            query = query.filter(AnnouncementColumn::TargetCourse.eq(course_id));
        }
        if let Some(year) = year_level {
            query = query.filter(AnnouncementColumn::TargetYearLevel.eq(year));
        }
        let paginator = query
            .order_by_desc(AnnouncementColumn::CreatedAt)
            .order_by_desc(AnnouncementColumn::Id)
            .paginate(db, per_page.max(1));
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }

    /// Students who currently see the announcement.
    pub async fn recipients(db: &DatabaseConnection, id: i64) -> ServiceResult<Vec<student::Model>> {
        let a = Self::get(db, id).await?;
        Ok(student::Model::cohort(db, a.target_course, a.target_year_level).await?)
    }

    pub async fn for_student(
        db: &DatabaseConnection,
        student: &student::Model,
    ) -> ServiceResult<Vec<announcement::Model>> {
        Ok(announcement::Model::for_cohort(db, student.course_id, student.year_level).await?)
    }
}
