use stash_schema::{EntityFamily, Typename};
use stash_store::ObjectRef;

use super::UpdateCx;
use crate::evict;
use crate::impact::impact_table;

/// Every source tag is deleted; the destination keeps its fresh fields.
pub(super) fn merge(cx: &mut UpdateCx<'_>, source: &[String], destination: &str) {
    let table = impact_table(EntityFamily::Tag);
    cx.delete_objects(Typename::Tag, source, table.find_query.as_ref());

    if let Some(stat) = table.destroyed_stat {
        evict::update_stats(cx.cache, stat, -(source.len() as f64));
    }

    let kept = ObjectRef::new(Typename::Tag, destination);
    cx.evict_type_fields(&table.type_fields(), Some(&kept));
    cx.evict_queries(table.queries);
}
