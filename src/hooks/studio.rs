use serde_json::Value;
use stash_schema::{EntityFamily, Typename};

use super::{payload_ref, UpdateCx};
use crate::evict;
use crate::impact::impact_table;

/// A new studio changes no derived field except its parent's child list.
pub(super) fn create(cx: &mut UpdateCx<'_>, payload: &Value, parent_id: Option<&str>) {
    let table = impact_table(EntityFamily::Studio);

    if let (Some(list), Some(obj)) = (&table.for_filter_query, payload_ref(Typename::Studio, payload)) {
        evict::append_object(cx.cache, &obj, list);
    }
    if let Some(stat) = table.created_stat {
        evict::update_stats(cx.cache, stat, 1.0);
    }
    if let Some(parent) = parent_id {
        cx.evict_field(Typename::Studio, parent, "child_studios");
    }

    cx.evict_queries(table.create_queries());
}
