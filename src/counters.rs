//! O-counter patchers
//!
//! When the mutated scene or image is resident, the performers it lists are
//! patched by the exact delta and `stats.total_o_count` by the same amount.
//! When it is not, there is no way to know which performers changed: every
//! cached `Performer.o_counter` is evicted and `total_o_count` is dropped so
//! the next read refetches it. Nothing numeric is guessed in that case.

use serde::Serialize;
use serde_json::Value;
use stash_schema::{EntityFamily, Typename};
use stash_store::{CacheHandle, FieldUpdate, Fragment, ObjectRef, SLIM_IMAGE_DATA, SLIM_SCENE_DATA};
use tracing::{debug, warn};

use crate::evict::{self, add_number, EvictOptions, TypeFields};
use crate::impact::impact_table;

/// Global stat the counters roll up into.
pub const TOTAL_O_COUNT: &str = "total_o_count";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterOp {
    Increment,
    Decrement,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterTarget {
    Scene,
    Image,
}

impl CounterTarget {
    pub fn family(self) -> EntityFamily {
        match self {
            Self::Scene => EntityFamily::Scene,
            Self::Image => EntityFamily::Image,
        }
    }

    pub fn typename(self) -> Typename {
        self.family().typename()
    }

    fn fragment(self) -> &'static Fragment {
        match self {
            Self::Scene => &SLIM_SCENE_DATA,
            Self::Image => &SLIM_IMAGE_DATA,
        }
    }
}

/// What a counter patch did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CounterPatch {
    /// The entity was resident; `delta` went to the stat and to each of
    /// `performers`. Listed performers whose counter was not a number had it
    /// evicted and are reported as `unresolved`.
    Resident {
        delta: i64,
        performers: Vec<ObjectRef>,
        unresolved: Vec<ObjectRef>,
    },
    /// The entity was not resident; performer counters and the stat were dropped.
    Evicted,
}

pub fn patch_o_counter(
    cache: &mut CacheHandle,
    target: CounterTarget,
    id: &str,
    op: CounterOp,
    server_value: i64,
) -> CounterPatch {
    patch_o_counter_with(cache, target, id, op, server_value, EvictOptions::default())
}

pub fn patch_o_counter_with(
    cache: &mut CacheHandle,
    target: CounterTarget,
    id: &str,
    op: CounterOp,
    server_value: i64,
    options: EvictOptions,
) -> CounterPatch {
    let entity = ObjectRef::new(target.typename(), id);

    let patch = match cache.read_fragment(&entity, target.fragment()) {
        Some(fragment) => {
            let old = fragment.get("o_counter").and_then(Value::as_i64).unwrap_or(0);
            let delta = match op {
                CounterOp::Increment => 1,
                CounterOp::Decrement => -1,
                CounterOp::Reset => -old,
            };
            let listed: Vec<ObjectRef> = fragment
                .get("performers")
                .and_then(Value::as_array)
                .map(|list| list.iter().filter_map(ObjectRef::from_reference).collect())
                .unwrap_or_default();

            // a counter that is not a number cannot take the delta; drop it
            let mut performers = Vec::with_capacity(listed.len());
            let mut unresolved = Vec::new();
            for performer in listed {
                let mut patched = false;
                let touched = cache.modify_field(&performer, "o_counter", |value| {
                    match add_number(value, delta as f64) {
                        Some(next) => {
                            patched = true;
                            FieldUpdate::Set(next)
                        }
                        None => FieldUpdate::Delete,
                    }
                });
                if patched {
                    performers.push(performer);
                } else if touched {
                    unresolved.push(performer);
                }
            }
            evict::update_stats(cache, TOTAL_O_COUNT, delta as f64);
            debug!(%entity, delta, performers = performers.len(), unresolved = unresolved.len(), "patched o_counter");
            CounterPatch::Resident {
                delta,
                performers,
                unresolved,
            }
        }
        None => {
            let fields = TypeFields::new().with(Typename::Performer, &["o_counter"]);
            evict::evict_type_fields(cache, &fields, None);
            evict::unresolve_stat(cache, TOTAL_O_COUNT);
            warn!(%entity, "o_counter owner not resident, evicting performer counters");
            CounterPatch::Evicted
        }
    };

    cache.write_field(&entity, "o_counter", &Value::from(server_value));
    evict::evict_queries_with(cache, impact_table(target.family()).counter_queries, options);
    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stash_schema::documents::{FIND_PERFORMERS, FIND_SCENE, FIND_SCENES, STATS};

    fn seeded(o_counter: Value) -> CacheHandle {
        let scene = json!({
            "__typename": "Scene",
            "id": "1",
            "o_counter": o_counter,
            "performers": [
                {"__typename": "Performer", "id": "10", "o_counter": 4},
                {"__typename": "Performer", "id": "11", "o_counter": 7}
            ]
        });
        let mut cache = CacheHandle::default();
        cache.write_query(&FIND_SCENE, Some(&json!({"id": "1"})), &scene);
        cache.write_query(&FIND_SCENES, None, &json!({"count": 1, "scenes": [scene]}));
        cache.write_query(&STATS, None, &json!({"total_o_count": 20}));
        cache
    }

    fn o_counter(cache: &CacheHandle, typename: Typename, id: &str) -> Option<Value> {
        cache
            .get(&ObjectRef::new(typename, id))
            .and_then(|o| o.get("o_counter").cloned())
    }

    #[test]
    fn test_increment_resident() {
        let mut cache = seeded(json!(2));
        let patch = patch_o_counter(&mut cache, CounterTarget::Scene, "1", CounterOp::Increment, 3);

        assert!(matches!(patch, CounterPatch::Resident { delta: 1, ref performers, .. } if performers.len() == 2));
        assert_eq!(o_counter(&cache, Typename::Performer, "10"), Some(json!(5)));
        assert_eq!(o_counter(&cache, Typename::Performer, "11"), Some(json!(8)));
        assert_eq!(o_counter(&cache, Typename::Scene, "1"), Some(json!(3)));
        assert_eq!(cache.root()["stats"]["total_o_count"], 21);
        assert!(cache.read_query(&FIND_SCENES, None).is_missing());
    }

    #[test]
    fn test_reset_null_counter_is_zero_delta() {
        let mut cache = seeded(Value::Null);
        let patch = patch_o_counter(&mut cache, CounterTarget::Scene, "1", CounterOp::Reset, 0);

        assert!(matches!(patch, CounterPatch::Resident { delta: 0, .. }));
        assert_eq!(o_counter(&cache, Typename::Performer, "10"), Some(json!(4)));
        assert_eq!(cache.root()["stats"]["total_o_count"], 20);
    }

    #[test]
    fn test_non_resident_image_evicts() {
        let mut cache = seeded(json!(2));
        cache.write_query(&FIND_PERFORMERS, None, &json!({"count": 0, "performers": []}));
        let patch = patch_o_counter(&mut cache, CounterTarget::Image, "9", CounterOp::Decrement, 0);

        assert_eq!(patch, CounterPatch::Evicted);
        assert_eq!(o_counter(&cache, Typename::Performer, "10"), None);
        assert!(cache.root()["stats"].get("total_o_count").is_none());
        assert_eq!(o_counter(&cache, Typename::Performer, "11"), None);
        assert!(cache.read_query(&FIND_PERFORMERS, None).is_missing());
        assert_eq!(o_counter(&cache, Typename::Scene, "1"), Some(json!(2)));
    }
}
