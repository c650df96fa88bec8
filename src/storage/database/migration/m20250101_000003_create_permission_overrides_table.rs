use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PermissionOverrides::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PermissionOverrides::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PermissionOverrides::OrgId).uuid().not_null())
                    .col(ColumnDef::new(PermissionOverrides::UserId).uuid().not_null())
                    .col(ColumnDef::new(PermissionOverrides::EntityType).string().null())
                    .col(ColumnDef::new(PermissionOverrides::Scope).string().not_null())
                    .col(
                        ColumnDef::new(PermissionOverrides::Granted)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(PermissionOverrides::Reason).text().not_null())
                    .col(
                        ColumnDef::new(PermissionOverrides::ExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PermissionOverrides::RevokedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PermissionOverrides::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_permission_overrides_user_id")
                            .from(PermissionOverrides::Table, PermissionOverrides::UserId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_permission_overrides_user")
                    .table(PermissionOverrides::Table)
                    .col(PermissionOverrides::OrgId)
                    .col(PermissionOverrides::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PermissionOverrides::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PermissionOverrides {
    Table,
    Id,
    OrgId,
    UserId,
    EntityType,
    Scope,
    Granted,
    Reason,
    ExpiresAt,
    RevokedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    Id,
}
