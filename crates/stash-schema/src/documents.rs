//! Query documents.
//!
//! A document is reduced to what the cache cares about: the operation name
//! and the root field its result is stored under. Single-object lookups also
//! name the typename they resolve to.

use serde::Serialize;

use crate::{SchemaError, Typename};

/// Static descriptor of a GraphQL query's root selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct QueryDocument {
    /// Operation name, e.g. `FindScenes`.
    pub name: &'static str,
    /// Root field the result is cached under, e.g. `findScenes`.
    pub root_field: &'static str,
    /// Set for "find by id" documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_object: Option<Typename>,
}

impl QueryDocument {
    const fn list(name: &'static str, root_field: &'static str) -> Self {
        Self { name, root_field, single_object: None }
    }

    const fn single(name: &'static str, root_field: &'static str, typename: Typename) -> Self {
        Self { name, root_field, single_object: Some(typename) }
    }

    /// Look up a document by operation name.
    pub fn by_name(name: &str) -> Result<Self, SchemaError> {
        ALL.iter()
            .copied()
            .find(|d| d.name == name)
            .ok_or_else(|| SchemaError::UnknownDocument(name.to_string()))
    }

    /// Look up a document by the root field it stores.
    pub fn by_root_field(field: &str) -> Option<Self> {
        ALL.iter().copied().find(|d| d.root_field == field)
    }
}

pub const FIND_SCENE: QueryDocument = QueryDocument::single("FindScene", "findScene", Typename::Scene);
pub const FIND_SCENES: QueryDocument = QueryDocument::list("FindScenes", "findScenes");
pub const FIND_IMAGE: QueryDocument = QueryDocument::single("FindImage", "findImage", Typename::Image);
pub const FIND_IMAGES: QueryDocument = QueryDocument::list("FindImages", "findImages");
pub const FIND_MOVIE: QueryDocument = QueryDocument::single("FindMovie", "findMovie", Typename::Movie);
pub const FIND_MOVIES: QueryDocument = QueryDocument::list("FindMovies", "findMovies");
pub const ALL_MOVIES_FOR_FILTER: QueryDocument = QueryDocument::list("AllMoviesForFilter", "allMovies");
pub const FIND_SCENE_MARKERS: QueryDocument = QueryDocument::list("FindSceneMarkers", "findSceneMarkers");
pub const MARKER_STRINGS: QueryDocument = QueryDocument::list("MarkerStrings", "markerStrings");
pub const FIND_SCENE_MARKER_TAGS: QueryDocument = QueryDocument::list("FindSceneMarkerTags", "sceneMarkerTags");
pub const FIND_GALLERY: QueryDocument = QueryDocument::single("FindGallery", "findGallery", Typename::Gallery);
pub const FIND_GALLERIES: QueryDocument = QueryDocument::list("FindGalleries", "findGalleries");
pub const FIND_PERFORMER: QueryDocument = QueryDocument::single("FindPerformer", "findPerformer", Typename::Performer);
pub const FIND_PERFORMERS: QueryDocument = QueryDocument::list("FindPerformers", "findPerformers");
pub const ALL_PERFORMERS_FOR_FILTER: QueryDocument = QueryDocument::list("AllPerformersForFilter", "allPerformers");
pub const FIND_STUDIO: QueryDocument = QueryDocument::single("FindStudio", "findStudio", Typename::Studio);
pub const FIND_STUDIOS: QueryDocument = QueryDocument::list("FindStudios", "findStudios");
pub const ALL_STUDIOS_FOR_FILTER: QueryDocument = QueryDocument::list("AllStudiosForFilter", "allStudios");
pub const FIND_TAG: QueryDocument = QueryDocument::single("FindTag", "findTag", Typename::Tag);
pub const FIND_TAGS: QueryDocument = QueryDocument::list("FindTags", "findTags");
pub const ALL_TAGS_FOR_FILTER: QueryDocument = QueryDocument::list("AllTagsForFilter", "allTags");
pub const FIND_SAVED_FILTER: QueryDocument = QueryDocument::single("FindSavedFilter", "findSavedFilter", Typename::SavedFilter);
pub const FIND_SAVED_FILTERS: QueryDocument = QueryDocument::list("FindSavedFilters", "findSavedFilters");
pub const FIND_DEFAULT_FILTER: QueryDocument = QueryDocument::list("FindDefaultFilter", "findDefaultFilter");
pub const STATS: QueryDocument = QueryDocument::list("Stats", "stats");
pub const CONFIGURATION: QueryDocument = QueryDocument::list("Configuration", "configuration");
pub const SYSTEM_STATUS: QueryDocument = QueryDocument::list("SystemStatus", "systemStatus");

/// Every document known to the cache layer.
pub const ALL: &[QueryDocument] = &[
    FIND_SCENE,
    FIND_SCENES,
    FIND_IMAGE,
    FIND_IMAGES,
    FIND_MOVIE,
    FIND_MOVIES,
    ALL_MOVIES_FOR_FILTER,
    FIND_SCENE_MARKERS,
    MARKER_STRINGS,
    FIND_SCENE_MARKER_TAGS,
    FIND_GALLERY,
    FIND_GALLERIES,
    FIND_PERFORMER,
    FIND_PERFORMERS,
    ALL_PERFORMERS_FOR_FILTER,
    FIND_STUDIO,
    FIND_STUDIOS,
    ALL_STUDIOS_FOR_FILTER,
    FIND_TAG,
    FIND_TAGS,
    ALL_TAGS_FOR_FILTER,
    FIND_SAVED_FILTER,
    FIND_SAVED_FILTERS,
    FIND_DEFAULT_FILTER,
    STATS,
    CONFIGURATION,
    SYSTEM_STATUS,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_root_fields_unique() {
        let fields: HashSet<_> = ALL.iter().map(|d| d.root_field).collect();
        assert_eq!(fields.len(), ALL.len());
    }

    #[test]
    fn test_by_name() {
        assert_eq!(QueryDocument::by_name("FindTags").unwrap(), FIND_TAGS);
        assert!(matches!(
            QueryDocument::by_name("FindNothing"),
            Err(SchemaError::UnknownDocument(_))
        ));
    }

    #[test]
    fn test_single_object_documents() {
        assert_eq!(FIND_TAG.single_object, Some(Typename::Tag));
        assert_eq!(FIND_TAGS.single_object, None);
        assert_eq!(QueryDocument::by_root_field("allStudios"), Some(ALL_STUDIOS_FOR_FILTER));
    }
}
