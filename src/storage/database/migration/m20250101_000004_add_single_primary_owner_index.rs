use sea_orm_migration::prelude::*;

/// Partial unique index holding every record to one Responsible row
const INDEX_NAME: &str = "idx_object_owners_single_primary";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // sea-query has no partial index builder; the statement is valid on SQLite and Postgres
        manager
            .get_connection()
            .execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {} ON object_owners (entity_type, entity_id) WHERE is_primary",
                INDEX_NAME
            ))
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&format!("DROP INDEX IF EXISTS {}", INDEX_NAME))
            .await?;
        Ok(())
    }
}
