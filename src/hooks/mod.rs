//! Mutation update hooks
//!
//! Each hook runs after its mutation succeeded, synchronously and to
//! completion. The shape is the same for every kind: guard on the payload,
//! apply structural patches (appends, stat bumps, object deletion), then the
//! impacted type-field eviction, then the impacted query eviction. Patches
//! always come before the blanket evictions.

mod entity;
mod gallery;
mod marker;
mod misc;
mod scene;
mod studio;
mod tag;

use serde::Serialize;
use serde_json::Value;
use stash_schema::documents::{FIND_GALLERIES, FIND_IMAGES, FIND_SCENES};
use stash_schema::{EntityFamily, Mutation, MutationFamily, MutationKind, QueryDocument, Typename};
use stash_store::{CacheHandle, ObjectRef};
use tracing::debug;

use crate::counters::{self, CounterOp, CounterTarget};
use crate::evict::{self, EvictOptions, TypeFields};

/// Whether a hook touched the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HookOutcome {
    /// The payload was absent or empty; nothing was written.
    Skipped,
    Applied,
}

/// Run the update hook for `mutation` with the server's result payload.
pub fn apply_update(cache: &mut CacheHandle, mutation: &Mutation, payload: Option<&Value>) -> HookOutcome {
    apply_update_with(cache, mutation, payload, EvictOptions::default())
}

pub fn apply_update_with(
    cache: &mut CacheHandle,
    mutation: &Mutation,
    payload: Option<&Value>,
    options: EvictOptions,
) -> HookOutcome {
    let kind = mutation.kind();
    let Some(payload) = payload.filter(|p| passes_guard(kind, p)) else {
        debug!(mutation = kind.name(), "empty payload, skipping cache update");
        return HookOutcome::Skipped;
    };

    write_payload(cache, kind.family(), payload);
    debug!(mutation = kind.name(), "applying cache update");

    let mut cx = UpdateCx { cache, options };
    dispatch(&mut cx, mutation, payload);
    HookOutcome::Applied
}

/// Counter mutations return the new count, where 0 is meaningful. Every
/// other payload must be present and not `false`.
fn passes_guard(kind: MutationKind, payload: &Value) -> bool {
    if is_counter(kind) {
        return payload.is_i64();
    }
    !matches!(payload, Value::Null | Value::Bool(false))
}

fn is_counter(kind: MutationKind) -> bool {
    matches!(
        kind,
        MutationKind::SceneIncrementO
            | MutationKind::SceneDecrementO
            | MutationKind::SceneResetO
            | MutationKind::ImageIncrementO
            | MutationKind::ImageDecrementO
            | MutationKind::ImageResetO
    )
}

/// Normalize returned objects into the store, the way a result would be
/// written before any hook runs. Objects without `__typename` get the
/// mutation family's type.
fn write_payload(cache: &mut CacheHandle, family: MutationFamily, payload: &Value) {
    let typename = match family {
        MutationFamily::Entity(f) => Some(f.typename()),
        MutationFamily::SavedFilter => Some(Typename::SavedFilter),
        _ => None,
    };

    let objects: Vec<&Value> = match payload {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    for object in objects {
        let Value::Object(map) = object else {
            continue;
        };
        match (typename, map.contains_key("__typename")) {
            (Some(t), false) if map.contains_key("id") => {
                let mut typed = map.clone();
                typed.insert("__typename".to_string(), Value::from(t.as_str()));
                cache.write_object(&Value::Object(typed));
            }
            _ => {
                cache.write_object(object);
            }
        }
    }
}

/// Object reference of a returned entity.
pub(crate) fn payload_ref(typename: Typename, payload: &Value) -> Option<ObjectRef> {
    match payload.get("id")? {
        Value::String(id) => Some(ObjectRef::new(typename, id.clone())),
        Value::Number(id) => Some(ObjectRef::new(typename, id.to_string())),
        _ => None,
    }
}

/// The cache plus the eviction knobs, threaded through every hook.
pub(crate) struct UpdateCx<'a> {
    pub(crate) cache: &'a mut CacheHandle,
    options: EvictOptions,
}

impl UpdateCx<'_> {
    fn evict_queries(&mut self, queries: &[QueryDocument]) {
        evict::evict_queries_with(self.cache, queries, self.options);
    }

    fn evict_type_fields(&mut self, fields: &TypeFields, ignore: Option<&ObjectRef>) {
        evict::evict_type_fields(self.cache, fields, ignore);
    }

    fn evict_field(&mut self, typename: Typename, id: &str, field: &str) {
        self.cache.evict_field(&ObjectRef::new(typename, id), field);
    }

    fn delete_objects(&mut self, typename: Typename, ids: &[String], find_query: Option<&QueryDocument>) {
        for id in ids {
            let obj = ObjectRef::new(typename, id.as_str());
            match find_query {
                Some(doc) => evict::delete_object(self.cache, &obj, doc),
                None => {
                    self.cache.evict_object(&obj);
                }
            }
        }
    }

    fn patch_counter(&mut self, target: CounterTarget, id: &str, op: CounterOp, payload: &Value) {
        if let Some(value) = payload.as_i64() {
            counters::patch_o_counter_with(self.cache, target, id, op, value, self.options);
        }
    }
}

fn dispatch(cx: &mut UpdateCx<'_>, mutation: &Mutation, payload: &Value) {
    use std::slice::from_ref;
    use EntityFamily as F;
    use Mutation as M;

    match mutation {
        // scenes
        M::SceneCreate { file_ids } => scene::create(cx, payload, file_ids),
        M::SceneUpdate { .. } | M::BulkSceneUpdate { .. } | M::ScenesUpdate { .. } => {
            entity::update(cx, F::Scene, None)
        }
        M::SceneDestroy { id } => entity::destroy(cx, F::Scene, from_ref(id)),
        M::ScenesDestroy { ids } => entity::destroy(cx, F::Scene, ids),
        M::SceneSetPrimaryFile { .. } => cx.evict_queries(&[FIND_SCENES]),
        M::SceneAssignFile { scene_id, .. } => scene::assign_file(cx, scene_id),
        M::SceneMerge { source, .. } => scene::merge(cx, source),
        M::SceneSaveActivity {
            id,
            resume_time,
            play_duration,
        } => scene::save_activity(cx, id, *resume_time, *play_duration),
        M::SceneIncrementPlayCount { id } => scene::increment_play_count(cx, id),
        M::SceneIncrementO { id } => cx.patch_counter(CounterTarget::Scene, id, CounterOp::Increment, payload),
        M::SceneDecrementO { id } => cx.patch_counter(CounterTarget::Scene, id, CounterOp::Decrement, payload),
        M::SceneResetO { id } => cx.patch_counter(CounterTarget::Scene, id, CounterOp::Reset, payload),

        // images
        M::ImageUpdate { .. } | M::BulkImageUpdate { .. } => entity::update(cx, F::Image, None),
        M::ImagesDestroy { ids } => entity::destroy(cx, F::Image, ids),
        M::ImageSetPrimaryFile { .. } => cx.evict_queries(&[FIND_IMAGES]),
        M::ImageIncrementO { id } => cx.patch_counter(CounterTarget::Image, id, CounterOp::Increment, payload),
        M::ImageDecrementO { id } => cx.patch_counter(CounterTarget::Image, id, CounterOp::Decrement, payload),
        M::ImageResetO { id } => cx.patch_counter(CounterTarget::Image, id, CounterOp::Reset, payload),

        // movies
        M::MovieCreate { .. } => entity::create(cx, F::Movie, payload, false),
        M::MovieUpdate { .. } | M::BulkMovieUpdate { .. } => entity::update(cx, F::Movie, None),
        M::MovieDestroy { id } => entity::destroy(cx, F::Movie, from_ref(id)),
        M::MoviesDestroy { ids } => entity::destroy(cx, F::Movie, ids),

        // scene markers
        M::SceneMarkerCreate { scene_id } | M::SceneMarkerUpdate { scene_id, .. } => {
            marker::changed(cx, scene_id)
        }
        M::SceneMarkerDestroy { id } => marker::destroy(cx, id),

        // galleries
        M::GalleryCreate { .. } => entity::create(cx, F::Gallery, payload, false),
        M::GalleryUpdate { .. } | M::BulkGalleryUpdate { .. } => entity::update(cx, F::Gallery, None),
        M::GalleryDestroy { ids } => entity::destroy(cx, F::Gallery, ids),
        M::AddGalleryImages { gallery_id, image_ids }
        | M::RemoveGalleryImages { gallery_id, image_ids } => {
            gallery::images_changed(cx, gallery_id, image_ids)
        }
        M::GallerySetPrimaryFile { .. } => cx.evict_queries(&[FIND_GALLERIES]),
        M::GalleryChapterCreate { .. } => entity::create(cx, F::GalleryChapter, payload, false),
        M::GalleryChapterUpdate { .. } => entity::update(cx, F::GalleryChapter, None),
        M::GalleryChapterDestroy { id } => gallery::chapter_destroy(cx, id),

        // performers
        M::PerformerCreate { .. } => entity::create(cx, F::Performer, payload, false),
        M::PerformerUpdate { .. } | M::BulkPerformerUpdate { .. } => {
            entity::update(cx, F::Performer, None)
        }
        M::PerformerDestroy { id } => entity::destroy(cx, F::Performer, from_ref(id)),
        M::PerformersDestroy { ids } => entity::destroy(cx, F::Performer, ids),

        // studios
        M::StudioCreate { parent_id } => studio::create(cx, payload, parent_id.as_deref()),
        M::StudioUpdate { id } => {
            let studio = ObjectRef::new(Typename::Studio, id.as_str());
            entity::update(cx, F::Studio, Some(&studio))
        }
        M::StudioDestroy { id } => entity::destroy(cx, F::Studio, from_ref(id)),
        M::StudiosDestroy { ids } => entity::destroy(cx, F::Studio, ids),

        // tags
        M::TagCreate { .. } => entity::create(cx, F::Tag, payload, true),
        M::TagUpdate { id } => {
            let tag = ObjectRef::new(Typename::Tag, id.as_str());
            entity::update(cx, F::Tag, Some(&tag))
        }
        M::TagDestroy { id } => entity::destroy(cx, F::Tag, from_ref(id)),
        M::TagsDestroy { ids } => entity::destroy(cx, F::Tag, ids),
        M::TagsMerge { source, destination } => tag::merge(cx, source, destination),

        // everything else
        M::SaveFilter { .. } => misc::saved_filter_saved(cx),
        M::SetDefaultFilter { .. } => misc::default_filter_set(cx),
        M::DestroySavedFilter { id } => misc::saved_filter_destroyed(cx, id),
        M::DeleteFiles { ids } => misc::delete_files(cx, ids),
        M::ConfigureGeneral { .. }
        | M::ConfigureInterface { .. }
        | M::ConfigureDefaults { .. }
        | M::ConfigureUi { .. }
        | M::ConfigureScraping { .. }
        | M::ConfigureDlna { .. }
        | M::GenerateApiKey { .. } => misc::configuration_changed(cx),
        M::Setup { .. } | M::Migrate { .. } => misc::setup_changed(cx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stash_schema::documents::FIND_TAG;

    #[test]
    fn test_guard_rules() {
        assert!(!passes_guard(MutationKind::TagDestroy, &Value::Null));
        assert!(!passes_guard(MutationKind::TagDestroy, &json!(false)));
        assert!(passes_guard(MutationKind::TagDestroy, &json!(true)));
        assert!(passes_guard(MutationKind::SceneResetO, &json!(0)));
        assert!(!passes_guard(MutationKind::SceneResetO, &Value::Null));
        assert!(!passes_guard(MutationKind::ImageIncrementO, &json!("3")));
    }

    #[test]
    fn test_counter_kinds() {
        let counters = MutationKind::ALL
            .iter()
            .filter(|k| is_counter(**k))
            .count();
        assert_eq!(counters, 6);
    }

    #[test]
    fn test_payload_without_typename_is_typed() {
        let mut cache = CacheHandle::default();
        cache.write_query(
            &FIND_TAG,
            Some(&json!({"id": "4"})),
            &json!({"__typename": "Tag", "id": "4", "name": "old"}),
        );
        let mutation = Mutation::TagUpdate { id: "4".to_string() };
        let outcome = apply_update(&mut cache, &mutation, Some(&json!({"id": "4", "name": "new"})));

        assert_eq!(outcome, HookOutcome::Applied);
        let tag = cache.get(&ObjectRef::new(Typename::Tag, "4")).unwrap();
        assert_eq!(tag["name"], "new");
    }

    #[test]
    fn test_skipped_leaves_cache_alone() {
        let mut cache = CacheHandle::default();
        cache.write_object(&json!({"__typename": "Tag", "id": "1", "parents": []}));
        let before = cache.extract();

        let mutation = Mutation::TagDestroy { id: "1".to_string() };
        assert_eq!(apply_update(&mut cache, &mutation, None), HookOutcome::Skipped);
        assert_eq!(apply_update(&mut cache, &mutation, Some(&Value::Null)), HookOutcome::Skipped);
        assert_eq!(cache.extract(), before);
    }
}
