use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202512240004_create_student_sessions"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("student_sessions"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("student_id"))
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("status"))
                            .enumeration(
                                Alias::new("session_status"),
                                vec![
                                    Alias::new("online"),
                                    Alias::new("offline"),
                                    Alias::new("idle"),
                                ],
                            )
                            .not_null()
                            .default("offline"),
                    )
                    .col(
                        ColumnDef::new(Alias::new("last_heartbeat"))
                            .timestamp()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("ip_address"))
                            .string_len(45)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("device_name"))
                            .string_len(100)
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_sessions_student")
                            .from(Alias::new("student_sessions"), Alias::new("student_id"))
                            .to(Alias::new("students"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_student_sessions_status")
                    .table(Alias::new("student_sessions"))
                    .col(Alias::new("status"))
                    .col(Alias::new("last_heartbeat"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("student_sessions")).to_owned())
            .await
    }
}
