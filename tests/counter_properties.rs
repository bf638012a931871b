//! O-counter propagation properties
//!
//! Resident owners move every listed performer and `total_o_count` by the
//! same delta, for any number of performers. Non-resident owners never
//! produce a number: performer counters and the stat are dropped instead.

use serde_json::{json, Value};

use stash_cache::counters::{patch_o_counter_with, TOTAL_O_COUNT};
use stash_cache::{apply_update_with, CounterOp, CounterPatch, CounterTarget, EvictOptions};
use stash_schema::documents::{FIND_IMAGES, FIND_PERFORMERS, FIND_SCENES, STATS};
use stash_schema::{Mutation, Typename};
use stash_store::{CacheHandle, ObjectRef};

const NO_GC: EvictOptions = EvictOptions { gc_after_evict: false };

fn performer(id: usize) -> ObjectRef {
    ObjectRef::new(Typename::Performer, id.to_string())
}

fn o_counter(cache: &CacheHandle, obj: &ObjectRef) -> Option<i64> {
    cache.get(obj)?.get("o_counter")?.as_i64()
}

fn total(cache: &CacheHandle) -> Option<i64> {
    cache.root().get("stats")?.get(TOTAL_O_COUNT)?.as_i64()
}

/// A resident owner with `n` performers, each at `start`.
fn seed(typename: &str, n: usize, owner_count: i64, start: i64, stats_total: i64) -> CacheHandle {
    let mut cache = CacheHandle::default();
    let performers: Vec<Value> = (0..n)
        .map(|i| json!({"__typename": "Performer", "id": (100 + i).to_string(), "o_counter": start}))
        .collect();
    cache.write_object(&json!({
        "__typename": typename,
        "id": "1",
        "o_counter": owner_count,
        "performers": performers,
    }));
    cache.write_query(&STATS, None, &json!({"total_o_count": stats_total}));
    cache
}

#[test]
fn test_delta_conserved_for_any_performer_count() {
    for n in 0..5 {
        for (op, owner, server, expected) in [
            (CounterOp::Increment, 3, 4, 1),
            (CounterOp::Decrement, 3, 2, -1),
            (CounterOp::Reset, 3, 0, -3),
        ] {
            let mut cache = seed("Scene", n, owner, 10, 50);
            let patch = patch_o_counter_with(&mut cache, CounterTarget::Scene, "1", op, server, NO_GC);

            let CounterPatch::Resident {
                delta,
                performers,
                unresolved,
            } = patch
            else {
                panic!("scene 1 is resident");
            };
            assert!(unresolved.is_empty());
            assert_eq!(delta, expected, "{:?} with {} performers", op, n);
            assert_eq!(performers.len(), n);
            for i in 0..n {
                assert_eq!(o_counter(&cache, &performer(100 + i)), Some(10 + expected));
            }
            assert_eq!(total(&cache), Some(50 + expected));
            assert_eq!(
                o_counter(&cache, &ObjectRef::new(Typename::Scene, "1")),
                Some(server)
            );
        }
    }
}

#[test]
fn test_reset_of_null_counter_is_zero_delta() {
    let mut cache = CacheHandle::default();
    cache.write_object(&json!({
        "__typename": "Image",
        "id": "1",
        "o_counter": null,
        "performers": [{"__typename": "Performer", "id": "100", "o_counter": 7}],
    }));
    cache.write_query(&STATS, None, &json!({"total_o_count": 20}));

    let patch = patch_o_counter_with(&mut cache, CounterTarget::Image, "1", CounterOp::Reset, 0, NO_GC);

    assert!(matches!(patch, CounterPatch::Resident { delta: 0, .. }));
    assert_eq!(o_counter(&cache, &performer(100)), Some(7));
    assert_eq!(total(&cache), Some(20));
}

#[test]
fn test_non_numeric_performer_counter_is_evicted_not_kept() {
    let mut cache = CacheHandle::default();
    cache.write_object(&json!({
        "__typename": "Scene",
        "id": "1",
        "o_counter": 2,
        "performers": [
            {"__typename": "Performer", "id": "7", "o_counter": null},
            {"__typename": "Performer", "id": "8", "o_counter": 3},
        ],
    }));
    cache.write_query(&STATS, None, &json!({"total_o_count": 10}));

    let patch = patch_o_counter_with(&mut cache, CounterTarget::Scene, "1", CounterOp::Increment, 3, NO_GC);

    let CounterPatch::Resident {
        delta,
        performers,
        unresolved,
    } = patch
    else {
        panic!("scene 1 is resident");
    };
    assert_eq!(delta, 1);
    assert_eq!(performers, vec![performer(8)]);
    assert_eq!(unresolved, vec![performer(7)]);

    // every reported performer moved with the stat; the null counter is gone
    assert_eq!(o_counter(&cache, &performer(8)), Some(4));
    assert_eq!(total(&cache), Some(11));
    assert!(!cache.get(&performer(7)).unwrap().contains_key("o_counter"));
}

#[test]
fn test_non_resident_owner_never_patches_numbers() {
    for op in [CounterOp::Increment, CounterOp::Decrement, CounterOp::Reset] {
        let mut cache = CacheHandle::default();
        cache.write_object(&json!({"__typename": "Performer", "id": "100", "o_counter": 7}));
        cache.write_object(&json!({"__typename": "Performer", "id": "101", "o_counter": 2}));
        cache.write_query(&STATS, None, &json!({"total_o_count": 20, "scene_count": 4}));

        let patch = patch_o_counter_with(&mut cache, CounterTarget::Scene, "99", op, 5, NO_GC);

        assert_eq!(patch, CounterPatch::Evicted);
        assert_eq!(o_counter(&cache, &performer(100)), None);
        assert_eq!(o_counter(&cache, &performer(101)), None);
        assert_eq!(total(&cache), None);
        assert!(cache.read_query(&STATS, None).is_missing());
        assert_eq!(cache.root()["stats"]["scene_count"], json!(4));
    }
}

#[test]
fn test_owner_with_evicted_performers_is_not_resident() {
    let mut cache = seed("Scene", 2, 3, 10, 50);
    cache.evict_field(&ObjectRef::new(Typename::Scene, "1"), "performers");

    let patch = patch_o_counter_with(&mut cache, CounterTarget::Scene, "1", CounterOp::Increment, 4, NO_GC);

    assert_eq!(patch, CounterPatch::Evicted);
    assert_eq!(o_counter(&cache, &performer(100)), None);
    assert_eq!(o_counter(&cache, &ObjectRef::new(Typename::Scene, "1")), Some(4));
}

#[test]
fn test_counter_queries_always_evicted() {
    let mut cache = seed("Image", 1, 0, 0, 0);
    cache.write_query(&FIND_IMAGES, None, &json!({"count": 0, "images": []}));
    cache.write_query(&FIND_PERFORMERS, None, &json!({"count": 0, "performers": []}));
    cache.write_query(&FIND_SCENES, None, &json!({"count": 0, "scenes": []}));

    let mutation = Mutation::ImageIncrementO { id: "1".to_string() };
    apply_update_with(&mut cache, &mutation, Some(&json!(1)), NO_GC);

    assert!(cache.read_query(&FIND_IMAGES, None).is_missing());
    assert!(cache.read_query(&FIND_PERFORMERS, None).is_missing());
    assert!(!cache.read_query(&FIND_SCENES, None).is_missing());
}

#[test]
fn test_zero_is_a_valid_counter_payload() {
    let mut cache = seed("Scene", 1, 1, 1, 1);

    let mutation = Mutation::SceneDecrementO { id: "1".to_string() };
    apply_update_with(&mut cache, &mutation, Some(&json!(0)), NO_GC);

    assert_eq!(o_counter(&cache, &ObjectRef::new(Typename::Scene, "1")), Some(0));
    assert_eq!(o_counter(&cache, &performer(100)), Some(0));
    assert_eq!(total(&cache), Some(0));
}
