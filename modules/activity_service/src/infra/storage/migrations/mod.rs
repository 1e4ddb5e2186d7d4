//! Database migrations for the activity service

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_lookups::Migration),
            Box::new(m20250301_000003_create_activities::Migration),
            Box::new(m20250301_000004_create_feedback::Migration),
        ]
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Version,
    Email,
    FirstName,
    LastName,
    Bio,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Technologies {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum ActivityTypes {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Activities {
    Table,
    Id,
    Version,
    Name,
    Description,
    ApplicationDeadline,
    FinalDeadline,
    CreatedAt,
    UpdatedAt,
    Status,
    OwnerId,
}

#[derive(DeriveIden)]
enum ActivityTechnologies {
    Table,
    ActivityId,
    TechnologyId,
}

#[derive(DeriveIden)]
enum ActivityActivityTypes {
    Table,
    ActivityId,
    ActivityTypeId,
}

#[derive(DeriveIden)]
enum Feedback {
    Table,
    Id,
    UserToId,
    UserFromId,
    Stars,
    Comment,
    CreatedAt,
}

mod m20250301_000001_create_users {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_users"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Version)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(Users::Email)
                                .string_len(180)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::FirstName).string_len(100).not_null())
                        .col(ColumnDef::new(Users::LastName).string_len(100).not_null())
                        .col(ColumnDef::new(Users::Bio).text())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000002_create_lookups {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_lookups"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Technologies::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Technologies::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Technologies::Name)
                                .string_len(100)
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ActivityTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ActivityTypes::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ActivityTypes::Name)
                                .string_len(100)
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ActivityTypes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Technologies::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000003_create_activities {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_activities"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Activities::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Activities::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Activities::Version)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(Activities::Name).string_len(255).not_null())
                        .col(ColumnDef::new(Activities::Description).text())
                        .col(ColumnDef::new(Activities::ApplicationDeadline).timestamp_with_time_zone())
                        .col(ColumnDef::new(Activities::FinalDeadline).timestamp_with_time_zone())
                        .col(
                            ColumnDef::new(Activities::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Activities::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Activities::Status).string_len(50).not_null())
                        .col(ColumnDef::new(Activities::OwnerId).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_activities_owner")
                                .from(Activities::Table, Activities::OwnerId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::NoAction)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_activities_owner_id")
                        .table(Activities::Table)
                        .col(Activities::OwnerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ActivityTechnologies::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ActivityTechnologies::ActivityId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ActivityTechnologies::TechnologyId)
                                .integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(ActivityTechnologies::ActivityId)
                                .col(ActivityTechnologies::TechnologyId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_activity_technologies_activity")
                                .from(ActivityTechnologies::Table, ActivityTechnologies::ActivityId)
                                .to(Activities::Table, Activities::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_activity_technologies_technology")
                                .from(
                                    ActivityTechnologies::Table,
                                    ActivityTechnologies::TechnologyId,
                                )
                                .to(Technologies::Table, Technologies::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ActivityActivityTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ActivityActivityTypes::ActivityId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ActivityActivityTypes::ActivityTypeId)
                                .integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(ActivityActivityTypes::ActivityId)
                                .col(ActivityActivityTypes::ActivityTypeId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_activity_activity_types_activity")
                                .from(
                                    ActivityActivityTypes::Table,
                                    ActivityActivityTypes::ActivityId,
                                )
                                .to(Activities::Table, Activities::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_activity_activity_types_type")
                                .from(
                                    ActivityActivityTypes::Table,
                                    ActivityActivityTypes::ActivityTypeId,
                                )
                                .to(ActivityTypes::Table, ActivityTypes::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ActivityActivityTypes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ActivityTechnologies::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Activities::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000004_create_feedback {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000004_create_feedback"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Feedback::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Feedback::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Feedback::UserToId).integer().not_null())
                        .col(ColumnDef::new(Feedback::UserFromId).integer())
                        .col(ColumnDef::new(Feedback::Stars).integer().not_null())
                        .col(ColumnDef::new(Feedback::Comment).text())
                        .col(
                            ColumnDef::new(Feedback::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_feedback_user_to")
                                .from(Feedback::Table, Feedback::UserToId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_feedback_user_from")
                                .from(Feedback::Table, Feedback::UserFromId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_feedback_user_to_id")
                        .table(Feedback::Table)
                        .col(Feedback::UserToId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Feedback::Table).to_owned())
                .await
        }
    }
}
