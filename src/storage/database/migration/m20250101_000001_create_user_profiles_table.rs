use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProfiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserProfiles::OrgId).uuid().not_null())
                    .col(ColumnDef::new(UserProfiles::ManagerId).uuid().null())
                    .col(
                        ColumnDef::new(UserProfiles::Role)
                            .string()
                            .not_null()
                            .default("member"),
                    )
                    .col(ColumnDef::new(UserProfiles::DisplayName).string().null())
                    .col(
                        ColumnDef::new(UserProfiles::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Reporting-edge loads scan one organization at a time
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_profiles_org_id")
                    .table(UserProfiles::Table)
                    .col(UserProfiles::OrgId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_profiles_manager_id")
                    .table(UserProfiles::Table)
                    .col(UserProfiles::ManagerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    Id,
    OrgId,
    ManagerId,
    Role,
    DisplayName,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}
