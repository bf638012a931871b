use stash_schema::{EntityFamily, Typename};
use stash_store::ObjectRef;

use super::{entity, UpdateCx};

/// A marker was created on, or moved within, `scene_id`.
pub(super) fn changed(cx: &mut UpdateCx<'_>, scene_id: &str) {
    cx.evict_field(Typename::Scene, scene_id, "scene_markers");
    entity::update(cx, EntityFamily::SceneMarker, None);
}

pub(super) fn destroy(cx: &mut UpdateCx<'_>, id: &str) {
    cx.cache.evict_object(&ObjectRef::new(Typename::SceneMarker, id));
    entity::update(cx, EntityFamily::SceneMarker, None);
}
