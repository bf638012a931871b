//! Reachability collection.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::reference::reference_id;
use crate::store::CacheHandle;

/// Outcome of one collection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GcResult {
    /// Objects visited from the roots.
    pub scanned: usize,
    /// Cache ids removed, sorted.
    pub removed: Vec<String>,
}

impl CacheHandle {
    /// Remove every object not reachable from a root query field or a
    /// retained id.
    pub fn gc(&mut self) -> GcResult {
        let mut reachable: HashSet<String> = HashSet::new();
        let mut pending: Vec<String> = self.retained.iter().cloned().collect();
        for value in self.root.values() {
            collect_refs(value, &mut pending);
        }

        while let Some(id) = pending.pop() {
            if !reachable.insert(id.clone()) {
                continue;
            }
            if let Some(obj) = self.objects.get(&id) {
                for value in obj.values() {
                    collect_refs(value, &mut pending);
                }
            }
        }

        let mut removed: Vec<String> = self
            .objects
            .keys()
            .filter(|id| !reachable.contains(*id))
            .cloned()
            .collect();
        removed.sort();

        for id in &removed {
            self.objects.remove(id);
        }
        self.by_type.retain(|_, ids| {
            ids.retain(|id| !removed.binary_search(id).is_ok());
            !ids.is_empty()
        });

        let scanned = reachable.iter().filter(|id| self.objects.contains_key(*id)).count();
        debug!(scanned, removed = removed.len(), "gc");
        GcResult { scanned, removed }
    }
}

fn collect_refs(value: &Value, out: &mut Vec<String>) {
    if let Some(id) = reference_id(value) {
        out.push(id.to_string());
        return;
    }
    match value {
        Value::Array(items) => items.iter().for_each(|v| collect_refs(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_refs(v, out)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ObjectRef;
    use serde_json::json;
    use stash_schema::documents::FIND_SCENES;
    use stash_schema::Typename;

    fn populated() -> CacheHandle {
        let mut cache = CacheHandle::default();
        cache.write_query(
            &FIND_SCENES,
            None,
            &json!({
                "count": 1,
                "scenes": [{
                    "__typename": "Scene",
                    "id": "1",
                    "studio": {"__typename": "Studio", "id": "2", "name": "acme"}
                }]
            }),
        );
        cache.write_object(&json!({"__typename": "Tag", "id": "7", "name": "orphan"}));
        cache
    }

    #[test]
    fn test_gc_removes_unreachable() {
        let mut cache = populated();
        let result = cache.gc();

        assert_eq!(result.removed, vec!["Tag:7".to_string()]);
        assert_eq!(result.scanned, 2);
        assert!(cache.contains(&ObjectRef::new(Typename::Studio, "2")));
        assert!(cache.verify_index());
    }

    #[test]
    fn test_gc_after_root_eviction_drops_everything() {
        let mut cache = populated();
        cache.evict_root_field("findScenes");
        let result = cache.gc();

        assert_eq!(result.removed.len(), 3);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.count_of_type(Typename::Scene), 0);
    }

    #[test]
    fn test_retained_objects_survive() {
        let mut cache = populated();
        let tag = ObjectRef::new(Typename::Tag, "7");
        cache.retain(&tag);
        assert!(cache.gc().removed.is_empty());

        cache.release(&tag);
        assert_eq!(cache.gc().removed, vec!["Tag:7".to_string()]);
    }
}
