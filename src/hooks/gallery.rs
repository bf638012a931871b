//! Gallery image membership and chapters.

use stash_schema::documents::{FIND_GALLERIES, FIND_IMAGES};
use stash_schema::{EntityFamily, Typename};
use stash_store::ObjectRef;

use super::{entity, UpdateCx};

/// Images added to or removed from a gallery.
pub(super) fn images_changed(cx: &mut UpdateCx<'_>, gallery_id: &str, image_ids: &[String]) {
    cx.evict_field(Typename::Gallery, gallery_id, "image_count");
    for id in image_ids {
        cx.evict_field(Typename::Image, id, "galleries");
    }
    cx.evict_queries(&[FIND_GALLERIES, FIND_IMAGES]);
}

pub(super) fn chapter_destroy(cx: &mut UpdateCx<'_>, id: &str) {
    cx.cache.evict_object(&ObjectRef::new(Typename::GalleryChapter, id));
    entity::update(cx, EntityFamily::GalleryChapter, None);
}
