//! Derived field registry.
//!
//! A derived field is a field on one object type whose value is computed by
//! the server from rows of another entity family: counts, relationship lists
//! and hierarchy links. When a row of the source family changes, every cached
//! copy of the field may be stale. The registry is the reference list the
//! impact tables are checked against.

use serde::Serialize;

use crate::{EntityFamily, Typename};

/// Which mutations of the source family can make a derived field stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePath {
    /// Create, update and destroy alike.
    AnyChange,
    /// Only removing a source row; edits leave the field alone.
    Destroy,
}

/// A field on `owner` whose value depends on rows of `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DerivedField {
    pub owner: Typename,
    pub field: &'static str,
    pub source: EntityFamily,
    pub path: StalePath,
}

const fn derived(owner: Typename, field: &'static str, source: EntityFamily) -> DerivedField {
    DerivedField { owner, field, source, path: StalePath::AnyChange }
}

const fn on_destroy(owner: Typename, field: &'static str, source: EntityFamily) -> DerivedField {
    DerivedField { owner, field, source, path: StalePath::Destroy }
}

use EntityFamily as F;
use Typename as T;

/// Every derived field the client caches.
pub const DERIVED_FIELDS: &[DerivedField] = &[
    // scenes
    derived(T::Movie, "scenes", F::Scene),
    derived(T::Movie, "scene_count", F::Scene),
    derived(T::Gallery, "scenes", F::Scene),
    derived(T::Performer, "scenes", F::Scene),
    derived(T::Performer, "scene_count", F::Scene),
    derived(T::Performer, "movies", F::Scene),
    derived(T::Performer, "movie_count", F::Scene),
    derived(T::Performer, "performer_count", F::Scene),
    derived(T::Studio, "scene_count", F::Scene),
    derived(T::Studio, "performer_count", F::Scene),
    derived(T::Tag, "scene_count", F::Scene),
    // images
    derived(T::Gallery, "images", F::Image),
    derived(T::Gallery, "image_count", F::Image),
    derived(T::Performer, "image_count", F::Image),
    derived(T::Performer, "performer_count", F::Image),
    derived(T::Studio, "image_count", F::Image),
    derived(T::Studio, "performer_count", F::Image),
    derived(T::Tag, "image_count", F::Image),
    // movies
    derived(T::Studio, "movie_count", F::Movie),
    on_destroy(T::Scene, "movies", F::Movie),
    on_destroy(T::Performer, "movie_count", F::Movie),
    // scene markers
    derived(T::Tag, "scene_marker_count", F::SceneMarker),
    // galleries
    derived(T::Scene, "galleries", F::Gallery),
    derived(T::Performer, "gallery_count", F::Gallery),
    derived(T::Performer, "performer_count", F::Gallery),
    derived(T::Studio, "gallery_count", F::Gallery),
    derived(T::Studio, "performer_count", F::Gallery),
    derived(T::Tag, "gallery_count", F::Gallery),
    // gallery chapters
    derived(T::Gallery, "chapters", F::GalleryChapter),
    // performers
    derived(T::Tag, "performer_count", F::Performer),
    on_destroy(T::Performer, "performer_count", F::Performer),
    on_destroy(T::Studio, "performer_count", F::Performer),
    // studios
    derived(T::Studio, "child_studios", F::Studio),
    // tags
    derived(T::Tag, "parents", F::Tag),
    derived(T::Tag, "children", F::Tag),
];

/// Derived fields fed by the given family.
pub fn derived_from(source: EntityFamily) -> impl Iterator<Item = &'static DerivedField> {
    DERIVED_FIELDS.iter().filter(move |d| d.source == source)
}
