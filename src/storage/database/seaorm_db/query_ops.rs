use crate::config::EntityConfig;
use crate::core::filter::EffectiveFilter;
use crate::core::models::{EntityRecord, EntityType, OrganizationId, RecordId, UserId};
use crate::core::traits::QueryExecutor;
use crate::utils::error::Result;
use async_trait::async_trait;
use sea_orm::prelude::{DateTimeWithTimeZone, Uuid};
use sea_orm::sea_query::{Alias, Expr, Order, Query, SelectStatement};
use sea_orm::{ConnectionTrait, QueryResult};
use tracing::debug;

use super::super::filter_sql::filter_condition;
use super::types::SeaOrmDatabase;

const RECORD_ID: &str = "record_id";
const ORGANIZATION_ID: &str = "organization_id";
const OWNER_ID: &str = "owner_id";
const DELETED_AT: &str = "deleted_at";

/// Select of the ownership projection of an entity table under fixed aliases
pub(super) fn record_select(config: &EntityConfig) -> SelectStatement {
    let table = Alias::new(&config.table);
    Query::select()
        .expr_as(
            Expr::col((table.clone(), Alias::new(&config.id_column))),
            Alias::new(RECORD_ID),
        )
        .expr_as(
            Expr::col((table.clone(), Alias::new(&config.organization_column))),
            Alias::new(ORGANIZATION_ID),
        )
        .expr_as(
            Expr::col((table.clone(), Alias::new(&config.owner_column))),
            Alias::new(OWNER_ID),
        )
        .expr_as(
            Expr::col((table.clone(), Alias::new(&config.deleted_column))),
            Alias::new(DELETED_AT),
        )
        .from(table)
        .to_owned()
}

/// Decode a row produced by [`record_select`]
pub(super) fn decode_record(row: &QueryResult, entity_type: &EntityType) -> Result<EntityRecord> {
    let id: Uuid = row.try_get("", RECORD_ID)?;
    let organization_id: Uuid = row.try_get("", ORGANIZATION_ID)?;
    let owner_id: Option<Uuid> = row.try_get("", OWNER_ID)?;
    let deleted_at: Option<DateTimeWithTimeZone> = row.try_get("", DELETED_AT)?;

    Ok(EntityRecord {
        id: RecordId::from(id),
        entity_type: entity_type.clone(),
        organization_id: OrganizationId::from(organization_id),
        owner_id: owner_id.map(UserId::from),
        deleted_at: deleted_at.map(|at| at.to_utc()),
        label: None,
    })
}

/// Ownership projection of one record, deleted ones included
pub(super) async fn fetch_record<C: ConnectionTrait>(
    conn: &C,
    config: &EntityConfig,
    entity_type: &EntityType,
    record_id: RecordId,
) -> Result<Option<EntityRecord>> {
    let select = record_select(config)
        .and_where(
            Expr::col((Alias::new(&config.table), Alias::new(&config.id_column)))
                .eq(record_id.as_uuid()),
        )
        .to_owned();
    let backend = conn.get_database_backend();
    conn.query_one(backend.build(&select))
        .await?
        .map(|row| decode_record(&row, entity_type))
        .transpose()
}

#[async_trait]
impl QueryExecutor for SeaOrmDatabase {
    async fn execute(&self, filter: &EffectiveFilter) -> Result<Vec<EntityRecord>> {
        if filter.is_nothing() {
            return Ok(Vec::new());
        }
        let entity_type = filter.entity_type();
        let config = self.registry.resolve(entity_type)?;
        debug!(
            entity_type = %entity_type,
            organization_id = %filter.organization_id(),
            "Executing filtered list query"
        );

        let select = record_select(config)
            .cond_where(filter_condition(filter, config))
            .order_by(
                (Alias::new(&config.table), Alias::new(&config.id_column)),
                Order::Asc,
            )
            .to_owned();
        let backend = self.db.get_database_backend();
        let rows = self.db.query_all(backend.build(&select)).await?;

        rows.iter()
            .map(|row| decode_record(row, entity_type))
            .collect()
    }
}
