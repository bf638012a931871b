//! Hooks shared by every entity family: create, update and destroy driven
//! entirely by the family's impact table.

use serde_json::Value;
use stash_schema::EntityFamily;
use stash_store::ObjectRef;

use super::{payload_ref, UpdateCx};
use crate::evict;
use crate::impact::impact_table;

/// Append to the "for filter" list, bump the created stat, then evict.
/// With `exclude_self` the new object keeps its own derived fields.
pub(super) fn create(cx: &mut UpdateCx<'_>, family: EntityFamily, payload: &Value, exclude_self: bool) {
    let table = impact_table(family);
    let created = payload_ref(family.typename(), payload);

    if let (Some(list), Some(obj)) = (&table.for_filter_query, &created) {
        evict::append_object(cx.cache, obj, list);
    }
    if let Some(stat) = table.created_stat {
        evict::update_stats(cx.cache, stat, 1.0);
    }

    let ignore = if exclude_self { created.as_ref() } else { None };
    cx.evict_type_fields(&table.type_fields(), ignore);
    cx.evict_queries(table.create_queries());
}

pub(super) fn update(cx: &mut UpdateCx<'_>, family: EntityFamily, ignore: Option<&ObjectRef>) {
    let table = impact_table(family);
    cx.evict_type_fields(&table.type_fields(), ignore);
    cx.evict_queries(table.queries);
}

/// Null each single-object lookup, drop the objects, lower the destroyed
/// stat by the number of ids, then evict the destroy sets.
pub(super) fn destroy(cx: &mut UpdateCx<'_>, family: EntityFamily, ids: &[String]) {
    let table = impact_table(family);
    cx.delete_objects(family.typename(), ids, table.find_query.as_ref());

    if let Some(stat) = table.destroyed_stat {
        evict::update_stats(cx.cache, stat, -(ids.len() as f64));
    }

    cx.evict_type_fields(&table.destroy_fields(), None);
    cx.evict_queries(&table.destroy_queries());
}
