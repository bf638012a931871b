//! Saved filters, files, configuration and setup.

use stash_schema::documents::{
    CONFIGURATION, FIND_DEFAULT_FILTER, FIND_GALLERIES, FIND_IMAGES, FIND_SAVED_FILTER,
    FIND_SAVED_FILTERS, FIND_SCENES, STATS, SYSTEM_STATUS,
};
use stash_schema::{Interface, Typename};
use stash_store::ObjectRef;

use super::UpdateCx;

pub(super) fn saved_filter_saved(cx: &mut UpdateCx<'_>) {
    cx.evict_queries(&[FIND_SAVED_FILTERS]);
}

pub(super) fn default_filter_set(cx: &mut UpdateCx<'_>) {
    cx.evict_queries(&[FIND_DEFAULT_FILTER]);
}

pub(super) fn saved_filter_destroyed(cx: &mut UpdateCx<'_>, id: &str) {
    cx.delete_objects(Typename::SavedFilter, &[id.to_string()], Some(&FIND_SAVED_FILTER));
    cx.evict_queries(&[FIND_DEFAULT_FILTER]);
}

/// File ids are unique across file types, so each id is evicted as every
/// concrete file type.
pub(super) fn delete_files(cx: &mut UpdateCx<'_>, ids: &[String]) {
    for id in ids {
        for typename in Interface::BaseFile.possible_types() {
            cx.cache.evict_object(&ObjectRef::new(*typename, id.as_str()));
        }
    }
    cx.evict_queries(&[FIND_SCENES, FIND_IMAGES, FIND_GALLERIES, STATS]);
}

pub(super) fn configuration_changed(cx: &mut UpdateCx<'_>) {
    cx.evict_queries(&[CONFIGURATION]);
}

pub(super) fn setup_changed(cx: &mut UpdateCx<'_>) {
    cx.evict_queries(&[CONFIGURATION, SYSTEM_STATUS]);
}
