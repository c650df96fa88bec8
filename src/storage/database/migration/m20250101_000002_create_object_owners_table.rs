use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ObjectOwners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ObjectOwners::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ObjectOwners::EntityType).string().not_null())
                    .col(ColumnDef::new(ObjectOwners::EntityId).uuid().not_null())
                    .col(ColumnDef::new(ObjectOwners::UserId).uuid().not_null())
                    .col(ColumnDef::new(ObjectOwners::Role).string().not_null())
                    .col(
                        ColumnDef::new(ObjectOwners::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ObjectOwners::AssignedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_object_owners_user_id")
                            .from(ObjectOwners::Table, ObjectOwners::UserId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One row per (record, user, kind)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_object_owners_unique_assignment")
                    .table(ObjectOwners::Table)
                    .col(ObjectOwners::EntityType)
                    .col(ObjectOwners::EntityId)
                    .col(ObjectOwners::UserId)
                    .col(ObjectOwners::Role)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Consulted-visibility probes go by user first
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_object_owners_user_lookup")
                    .table(ObjectOwners::Table)
                    .col(ObjectOwners::UserId)
                    .col(ObjectOwners::EntityType)
                    .col(ObjectOwners::Role)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ObjectOwners::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ObjectOwners {
    Table,
    Id,
    EntityType,
    EntityId,
    UserId,
    Role,
    IsPrimary,
    AssignedAt,
}

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    Id,
}
