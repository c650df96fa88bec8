use crate::config::{DatabaseConfig, EntityConfig, EntityRegistry};
use crate::utils::error::{AccessError, Result};
use sea_orm::sea_query::{Alias, ColumnDef, Index, Table};
use sea_orm::*;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::super::entities;
use super::super::migration::Migrator;
use super::types::{DatabaseBackendType, DatabaseStats, SeaOrmDatabase};

impl SeaOrmDatabase {
    /// Connect to the configured database
    ///
    /// A failed connection is an error; there is no fallback database.
    pub async fn new(config: &DatabaseConfig, registry: Arc<EntityRegistry>) -> Result<Self> {
        let db = Self::try_connect(&config.url, config).await?;
        let backend_type = if config.is_sqlite() {
            DatabaseBackendType::SQLite
        } else {
            DatabaseBackendType::PostgreSQL
        };
        info!("Database connection established ({:?})", backend_type);
        Ok(Self {
            db,
            backend_type,
            registry,
        })
    }

    /// Try to connect to a database
    async fn try_connect(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url.to_string());
        opt.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.connection_timeout))
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(3600))
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        Database::connect(opt).await.map_err(|e| {
            warn!("Database connection failed: {}", e);
            AccessError::Database(e)
        })
    }

    /// Get the current backend type
    pub fn backend_type(&self) -> DatabaseBackendType {
        self.backend_type
    }

    /// Registered entity layouts this database serves
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Run database migrations and create missing entity tables
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations...");
        Migrator::up(&self.db, None).await.map_err(|e| {
            warn!("Migration failed: {}", e);
            AccessError::Database(e)
        })?;
        self.ensure_entity_tables().await?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Create the table of every registered entity type that does not exist yet
    ///
    /// Only the columns the access layer reads are created; deployments that own their
    /// entity schema simply already have the tables.
    pub async fn ensure_entity_tables(&self) -> Result<()> {
        let backend = self.db.get_database_backend();
        for config in self.registry.entities() {
            debug!(entity_type = %config.name, table = %config.table, "Ensuring entity table");
            let table = entity_table(config);
            self.db.execute(backend.build(&table)).await?;

            let index = Index::create()
                .if_not_exists()
                .name(format!(
                    "idx_{}_{}_{}",
                    config.table, config.organization_column, config.owner_column
                ))
                .table(Alias::new(&config.table))
                .col(Alias::new(&config.organization_column))
                .col(Alias::new(&config.owner_column))
                .to_owned();
            self.db.execute(backend.build(&index)).await?;
        }
        Ok(())
    }

    /// Get the underlying database connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Close the database connection
    pub async fn close(self) -> Result<()> {
        self.db.close().await.map_err(AccessError::Database)?;
        Ok(())
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        debug!("Performing database health check");

        // Simple query to check database connectivity
        let _result = entities::UserProfile::find()
            .limit(1)
            .all(&self.db)
            .await
            .map_err(AccessError::Database)?;

        debug!("Database health check passed");
        Ok(())
    }

    /// Row counts of the bookkeeping tables
    pub async fn stats(&self) -> Result<DatabaseStats> {
        Ok(DatabaseStats {
            users: entities::UserProfile::find().count(&self.db).await?,
            assignments: entities::ObjectOwner::find().count(&self.db).await?,
            overrides: entities::PermissionOverride::find().count(&self.db).await?,
        })
    }
}

fn entity_table(config: &EntityConfig) -> sea_orm::sea_query::TableCreateStatement {
    Table::create()
        .table(Alias::new(&config.table))
        .if_not_exists()
        .col(
            ColumnDef::new(Alias::new(&config.id_column))
                .uuid()
                .not_null()
                .primary_key(),
        )
        .col(
            ColumnDef::new(Alias::new(&config.organization_column))
                .uuid()
                .not_null(),
        )
        .col(ColumnDef::new(Alias::new(&config.owner_column)).uuid().null())
        .col(
            ColumnDef::new(Alias::new(&config.deleted_column))
                .timestamp_with_time_zone()
                .null(),
        )
        .to_owned()
}
