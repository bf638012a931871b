//! Eviction primitives
//!
//! Targeted invalidation on top of the store: drop root query entries, drop
//! derived fields on every resident object of a type, delete single objects,
//! append to "for filter" lists and patch the global stats object. Every
//! primitive is idempotent and a no-op for data that is not cached.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::{json, Number, Value};
use stash_schema::documents::STATS;
use stash_schema::{QueryDocument, Typename};
use stash_store::{CacheHandle, FieldUpdate, ObjectRef};
use tracing::trace;

/// Typename → field names to evict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeFields(BTreeMap<Typename, BTreeSet<String>>);

impl TypeFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from static table rows.
    pub fn from_rows(rows: &[(Typename, &[&str])]) -> Self {
        let mut fields = Self::new();
        for (typename, names) in rows {
            fields = fields.with(*typename, names);
        }
        fields
    }

    pub fn with(mut self, typename: Typename, names: &[&str]) -> Self {
        self.0
            .entry(typename)
            .or_default()
            .extend(names.iter().map(|n| n.to_string()));
        self
    }

    /// Union of both maps.
    pub fn merge(mut self, other: &TypeFields) -> Self {
        for (typename, names) in &other.0 {
            self.0.entry(*typename).or_default().extend(names.iter().cloned());
        }
        self
    }

    pub fn contains(&self, typename: Typename, field: &str) -> bool {
        self.0.get(&typename).is_some_and(|names| names.contains(field))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Typename, &BTreeSet<String>)> {
        self.0.iter().map(|(t, names)| (*t, names))
    }
}

/// Knobs for query eviction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictOptions {
    /// Collect unreachable objects after dropping root entries.
    pub gc_after_evict: bool,
}

impl Default for EvictOptions {
    fn default() -> Self {
        Self { gc_after_evict: true }
    }
}

/// Drop every cached result of the given queries, whatever their arguments,
/// then collect garbage. Returns the number of root entries removed.
pub fn evict_queries(cache: &mut CacheHandle, queries: &[QueryDocument]) -> usize {
    evict_queries_with(cache, queries, EvictOptions::default())
}

pub fn evict_queries_with(
    cache: &mut CacheHandle,
    queries: &[QueryDocument],
    options: EvictOptions,
) -> usize {
    let removed: usize = queries
        .iter()
        .map(|doc| cache.evict_root_field(doc.root_field))
        .sum();
    if options.gc_after_evict {
        cache.gc();
    }
    removed
}

/// Delete the named fields from every resident object of each listed type,
/// except `ignore`. Walks the typename index, never the whole store.
pub fn evict_type_fields(
    cache: &mut CacheHandle,
    fields: &TypeFields,
    ignore: Option<&ObjectRef>,
) -> usize {
    let mut removed = 0;
    for (typename, names) in fields.iter() {
        for obj in cache.ids_of_type(typename) {
            if ignore == Some(&obj) {
                continue;
            }
            for name in names {
                if cache.evict_field(&obj, name) {
                    removed += 1;
                }
            }
        }
    }
    trace!(removed, "evicted type fields");
    removed
}

/// Record "not found" for `single_query(id: <id>)` and drop the object.
pub fn delete_object(cache: &mut CacheHandle, obj: &ObjectRef, single_query: &QueryDocument) {
    let args = json!({ "id": obj.id });
    cache.write_root_field(single_query.root_field, Some(&args), &Value::Null);
    cache.evict_object(obj);
}

/// Append a reference to every cached list stored under the list query's
/// root field. Lists that already hold the reference are left alone.
/// Returns the number of lists changed.
pub fn append_object(cache: &mut CacheHandle, obj: &ObjectRef, list_query: &QueryDocument) -> usize {
    let reference = obj.to_reference();
    cache.modify_root(list_query.root_field, |_, value| match value {
        Value::Array(items) if !items.contains(&reference) => {
            let mut items = items.clone();
            items.push(reference.clone());
            FieldUpdate::Set(Value::Array(items))
        }
        _ => FieldUpdate::Keep,
    })
}

/// Add `delta` to `stats.<field>` when stats are cached and the field holds
/// a number. Returns whether the value changed.
pub fn update_stats(cache: &mut CacheHandle, field: &str, delta: f64) -> bool {
    let changed = cache.modify_root(STATS.root_field, |_, value| {
        let Value::Object(stats) = value else {
            return FieldUpdate::Keep;
        };
        let Some(next) = stats.get(field).and_then(|current| add_number(current, delta)) else {
            return FieldUpdate::Keep;
        };
        let mut stats = stats.clone();
        stats.insert(field.to_string(), next);
        FieldUpdate::Set(Value::Object(stats))
    });
    changed > 0
}

/// Drop `stats.<field>` so the next stats read refetches.
pub fn unresolve_stat(cache: &mut CacheHandle, field: &str) -> bool {
    let changed = cache.modify_root(STATS.root_field, |_, value| match value {
        Value::Object(stats) if stats.contains_key(field) => {
            let mut stats = stats.clone();
            stats.remove(field);
            FieldUpdate::Set(Value::Object(stats))
        }
        _ => FieldUpdate::Keep,
    });
    changed > 0
}

/// `value + delta`, staying integral when both sides are.
pub(crate) fn add_number(value: &Value, delta: f64) -> Option<Value> {
    if let Some(current) = value.as_i64() {
        if delta.fract() == 0.0 {
            return Some(Value::from(current + delta as i64));
        }
    }
    let current = value.as_f64()?;
    Number::from_f64(current + delta).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stash_schema::documents::{ALL_TAGS_FOR_FILTER, FIND_TAG, FIND_TAGS};
    use stash_store::ReadOutcome;

    fn tag(id: &str) -> Value {
        json!({"__typename": "Tag", "id": id, "name": format!("tag {}", id), "scene_count": 3})
    }

    fn seeded() -> CacheHandle {
        let mut cache = CacheHandle::default();
        cache.write_query(&FIND_TAGS, None, &json!({"count": 2, "tags": [tag("1"), tag("2")]}));
        cache.write_query(&ALL_TAGS_FOR_FILTER, None, &json!([tag("1"), tag("2")]));
        cache.write_query(&STATS, None, &json!({"tag_count": 2, "total_play_duration": 1.5}));
        cache
    }

    #[test]
    fn test_evict_queries_idempotent() {
        let mut cache = seeded();
        assert_eq!(evict_queries(&mut cache, &[FIND_TAGS]), 1);
        let once = cache.extract();
        assert_eq!(evict_queries(&mut cache, &[FIND_TAGS]), 0);
        assert_eq!(cache.extract(), once);
        assert!(cache.read_query(&FIND_TAGS, None).is_missing());
    }

    #[test]
    fn test_evict_queries_without_gc_keeps_orphans() {
        let mut cache = seeded();
        cache.evict_root_field(ALL_TAGS_FOR_FILTER.root_field);
        let options = EvictOptions { gc_after_evict: false };
        evict_queries_with(&mut cache, &[FIND_TAGS], options);
        assert_eq!(cache.len(), 2);

        evict_queries(&mut cache, &[FIND_TAGS]);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_evict_type_fields_respects_ignore() {
        let mut cache = seeded();
        let fields = TypeFields::new().with(Typename::Tag, &["scene_count"]);
        let keep = ObjectRef::new(Typename::Tag, "1");

        assert_eq!(evict_type_fields(&mut cache, &fields, Some(&keep)), 1);
        assert!(cache.get(&keep).unwrap().contains_key("scene_count"));
        let other = ObjectRef::new(Typename::Tag, "2");
        assert!(!cache.get(&other).unwrap().contains_key("scene_count"));

        assert_eq!(evict_type_fields(&mut cache, &fields, Some(&keep)), 0);
    }

    #[test]
    fn test_delete_object_answers_not_found() {
        let mut cache = seeded();
        let obj = ObjectRef::new(Typename::Tag, "1");
        delete_object(&mut cache, &obj, &FIND_TAG);

        assert!(!cache.contains(&obj));
        let args = json!({"id": "1"});
        assert_eq!(cache.read_query(&FIND_TAG, Some(&args)), ReadOutcome::Hit(Value::Null));
        assert!(cache.verify_index());
    }

    #[test]
    fn test_append_object_no_duplicates() {
        let mut cache = seeded();
        cache.write_object(&tag("3"));
        let obj = ObjectRef::new(Typename::Tag, "3");

        assert_eq!(append_object(&mut cache, &obj, &ALL_TAGS_FOR_FILTER), 1);
        assert_eq!(append_object(&mut cache, &obj, &ALL_TAGS_FOR_FILTER), 0);

        let all = cache.read_query(&ALL_TAGS_FOR_FILTER, None).into_hit().unwrap();
        assert_eq!(all.as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_append_object_skips_uncached_list() {
        let mut cache = CacheHandle::default();
        let obj = ObjectRef::new(Typename::Tag, "3");
        assert_eq!(append_object(&mut cache, &obj, &ALL_TAGS_FOR_FILTER), 0);
        assert!(cache.root().is_empty());
    }

    #[test]
    fn test_update_stats() {
        let mut cache = seeded();
        assert!(update_stats(&mut cache, "tag_count", 1.0));
        assert!(update_stats(&mut cache, "total_play_duration", 2.25));
        assert!(!update_stats(&mut cache, "scene_count", 1.0));

        let stats = cache.read_query(&STATS, None).into_hit().unwrap();
        assert_eq!(stats["tag_count"], 3);
        assert_eq!(stats["total_play_duration"], 3.75);
    }

    #[test]
    fn test_unresolve_stat_forces_refetch() {
        let mut cache = seeded();
        assert!(unresolve_stat(&mut cache, "tag_count"));
        assert!(!unresolve_stat(&mut cache, "tag_count"));
        assert!(cache.read_query(&STATS, None).is_missing());
    }

    #[test]
    fn test_type_fields_merge() {
        let a = TypeFields::from_rows(&[(Typename::Tag, &["parents"])]);
        let b = TypeFields::new().with(Typename::Tag, &["children"]).with(Typename::Scene, &["files"]);
        let merged = a.merge(&b);
        assert!(merged.contains(Typename::Tag, "parents"));
        assert!(merged.contains(Typename::Tag, "children"));
        assert!(merged.contains(Typename::Scene, "files"));
    }
}
