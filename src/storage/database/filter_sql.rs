//! Translation of effective filters into SQL conditions
//!
//! Every condition is pinned to the filter's organization and excludes soft-deleted rows
//! before the scope is applied. A consulted clause becomes a correlated `EXISTS` over
//! `object_owners`, so listing never materializes the assignment set.

use crate::config::EntityConfig;
use crate::core::filter::{EffectiveFilter, FilterScope};
use crate::core::models::EntityType;
use sea_orm::sea_query::{Alias, Condition, Expr, Query};

use super::entities::object_owner;

/// WHERE condition restricting `config`'s table to the rows `filter` admits
pub fn filter_condition(filter: &EffectiveFilter, config: &EntityConfig) -> Condition {
    let table = Alias::new(&config.table);
    let mut condition = Condition::all()
        .add(
            Expr::col((table.clone(), Alias::new(&config.organization_column)))
                .eq(filter.organization_id().as_uuid()),
        )
        .add(Expr::col((table, Alias::new(&config.deleted_column))).is_null());

    if let Some(scope) = scope_condition(filter.scope(), filter.entity_type(), config) {
        condition = condition.add(scope);
    }
    condition
}

/// `None` means no restriction beyond the tenant guard
fn scope_condition(
    scope: &FilterScope,
    entity_type: &EntityType,
    config: &EntityConfig,
) -> Option<Condition> {
    let table = Alias::new(&config.table);
    match scope {
        FilterScope::OrgWide => None,
        FilterScope::Nothing => Some(never()),
        FilterScope::OwnedBy { owners } if owners.is_empty() => Some(never()),
        FilterScope::OwnedBy { owners } => Some(
            Condition::all().add(
                Expr::col((table, Alias::new(&config.owner_column)))
                    .is_in(owners.iter().map(|owner| owner.as_uuid())),
            ),
        ),
        FilterScope::ConsultedBy { kinds, .. } if kinds.is_empty() => Some(never()),
        FilterScope::ConsultedBy { user_id, kinds } => {
            let assignments = Query::select()
                .expr(Expr::val(1))
                .from(object_owner::Entity)
                .and_where(
                    Expr::col((object_owner::Entity, object_owner::Column::EntityType))
                        .eq(entity_type.as_str()),
                )
                .and_where(
                    Expr::col((object_owner::Entity, object_owner::Column::EntityId))
                        .equals((table, Alias::new(&config.id_column))),
                )
                .and_where(
                    Expr::col((object_owner::Entity, object_owner::Column::UserId))
                        .eq(user_id.as_uuid()),
                )
                .and_where(
                    Expr::col((object_owner::Entity, object_owner::Column::Role))
                        .is_in(kinds.iter().map(|kind| kind.as_str())),
                )
                .to_owned();
            Some(Condition::all().add(Expr::exists(assignments)))
        }
        FilterScope::Union { branches } => {
            if branches.is_empty() {
                return Some(never());
            }
            let mut any = Condition::any();
            for branch in branches {
                match scope_condition(branch, entity_type, config) {
                    // An unrestricted branch makes the whole union unrestricted
                    None => return None,
                    Some(branch) => any = any.add(branch),
                }
            }
            Some(any)
        }
    }
}

fn never() -> Condition {
    Condition::all().add(Expr::val(1).eq(0))
}
