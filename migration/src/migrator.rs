use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202512240001_create_users::Migration),
            Box::new(migrations::m202512240002_create_courses::Migration),
            Box::new(migrations::m202512240003_create_students::Migration),
            Box::new(migrations::m202512240004_create_student_sessions::Migration),
            Box::new(migrations::m202512240005_create_announcements::Migration),
            Box::new(migrations::m202512240006_create_exams::Migration),
            Box::new(migrations::m202512240007_create_exam_sessions::Migration),
            Box::new(migrations::m202512240008_create_commands::Migration),
            Box::new(migrations::m202512240009_create_activity_logs::Migration),
        ]
    }
}
