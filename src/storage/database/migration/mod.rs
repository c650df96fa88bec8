use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_profiles_table;
mod m20250101_000002_create_object_owners_table;
mod m20250101_000003_create_permission_overrides_table;
mod m20250101_000004_add_single_primary_owner_index;

/// Database migrator for SeaORM
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_profiles_table::Migration),
            Box::new(m20250101_000002_create_object_owners_table::Migration),
            Box::new(m20250101_000003_create_permission_overrides_table::Migration),
            Box::new(m20250101_000004_add_single_primary_owner_index::Migration),
        ]
    }
}
