//! Query impact tables
//!
//! One table per entity family naming what can go stale when a row of that
//! family changes: derived fields on other types, top-level queries, and the
//! global stats the structural patches touch. Tables are data; hooks consult
//! them and never compute them. [`check_completeness`] verifies them against
//! the derived-field registry.

use serde::Serialize;
use stash_schema::documents::*;
use stash_schema::{DerivedField, EntityFamily, QueryDocument, StalePath, Typename};

use crate::evict::TypeFields;

type FieldRows = &'static [(Typename, &'static [&'static str])];

/// Static invalidation rules for one entity family.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ImpactTable {
    pub family: EntityFamily,
    /// Derived fields on other types evicted by every mutation.
    pub type_fields: FieldRows,
    /// Queries evicted by every mutation.
    pub queries: &'static [QueryDocument],
    /// Narrower query set used on create, when one applies.
    pub create_queries: Option<&'static [QueryDocument]>,
    /// Added to `type_fields` on destroy.
    pub destroy_type_fields: FieldRows,
    /// Added to `queries` on destroy.
    pub destroy_queries: &'static [QueryDocument],
    /// Single-object lookup nulled when an object is destroyed.
    pub find_query: Option<QueryDocument>,
    /// Dropdown list a created object is appended to.
    pub for_filter_query: Option<QueryDocument>,
    pub created_stat: Option<&'static str>,
    pub destroyed_stat: Option<&'static str>,
    /// Lists that filter or sort by the O-counter.
    pub counter_queries: &'static [QueryDocument],
}

impl ImpactTable {
    pub fn type_fields(&self) -> TypeFields {
        TypeFields::from_rows(self.type_fields)
    }

    /// Fields evicted on destroy: the normal set plus the destroy extras.
    pub fn destroy_fields(&self) -> TypeFields {
        self.type_fields()
            .merge(&TypeFields::from_rows(self.destroy_type_fields))
    }

    pub fn create_queries(&self) -> &'static [QueryDocument] {
        self.create_queries.unwrap_or(self.queries)
    }

    pub fn destroy_queries(&self) -> Vec<QueryDocument> {
        let mut queries = self.queries.to_vec();
        for doc in self.destroy_queries {
            if !queries.contains(doc) {
                queries.push(*doc);
            }
        }
        queries
    }
}

const SCENE: ImpactTable = ImpactTable {
    family: EntityFamily::Scene,
    type_fields: &[
        (Typename::Movie, &["scenes", "scene_count"]),
        (Typename::Gallery, &["scenes"]),
        (
            Typename::Performer,
            &["scenes", "scene_count", "movies", "movie_count", "performer_count"],
        ),
        (Typename::Studio, &["scene_count", "performer_count"]),
        (Typename::Tag, &["scene_count"]),
    ],
    queries: &[
        FIND_SCENES,
        FIND_MOVIES,
        FIND_GALLERIES,
        FIND_PERFORMERS,
        FIND_STUDIOS,
        FIND_TAGS,
    ],
    create_queries: None,
    destroy_type_fields: &[],
    destroy_queries: &[FIND_SCENE_MARKERS, STATS],
    find_query: Some(FIND_SCENE),
    for_filter_query: None,
    created_stat: Some("scene_count"),
    destroyed_stat: None,
    counter_queries: &[FIND_SCENES, FIND_PERFORMERS],
};

const IMAGE: ImpactTable = ImpactTable {
    family: EntityFamily::Image,
    type_fields: &[
        (Typename::Gallery, &["images", "image_count"]),
        (Typename::Performer, &["image_count", "performer_count"]),
        (Typename::Studio, &["image_count", "performer_count"]),
        (Typename::Tag, &["image_count"]),
    ],
    queries: &[FIND_IMAGES, FIND_GALLERIES, FIND_PERFORMERS, FIND_STUDIOS, FIND_TAGS],
    create_queries: None,
    destroy_type_fields: &[],
    destroy_queries: &[STATS],
    find_query: Some(FIND_IMAGE),
    for_filter_query: None,
    created_stat: None,
    destroyed_stat: None,
    counter_queries: &[FIND_IMAGES, FIND_PERFORMERS],
};

const MOVIE: ImpactTable = ImpactTable {
    family: EntityFamily::Movie,
    type_fields: &[(Typename::Studio, &["movie_count"])],
    queries: &[FIND_MOVIES],
    create_queries: None,
    destroy_type_fields: &[
        (Typename::Scene, &["movies"]),
        (Typename::Performer, &["movie_count"]),
    ],
    destroy_queries: &[FIND_SCENES],
    find_query: Some(FIND_MOVIE),
    for_filter_query: Some(ALL_MOVIES_FOR_FILTER),
    created_stat: Some("movie_count"),
    destroyed_stat: Some("movie_count"),
    counter_queries: &[],
};

const SCENE_MARKER: ImpactTable = ImpactTable {
    family: EntityFamily::SceneMarker,
    type_fields: &[(Typename::Tag, &["scene_marker_count"])],
    queries: &[
        FIND_SCENES,
        FIND_SCENE_MARKERS,
        MARKER_STRINGS,
        FIND_SCENE_MARKER_TAGS,
        FIND_TAGS,
    ],
    create_queries: None,
    destroy_type_fields: &[],
    destroy_queries: &[],
    find_query: None,
    for_filter_query: None,
    created_stat: None,
    destroyed_stat: None,
    counter_queries: &[],
};

const GALLERY: ImpactTable = ImpactTable {
    family: EntityFamily::Gallery,
    type_fields: &[
        (Typename::Scene, &["galleries"]),
        (Typename::Performer, &["gallery_count", "performer_count"]),
        (Typename::Studio, &["gallery_count", "performer_count"]),
        (Typename::Tag, &["gallery_count"]),
    ],
    queries: &[FIND_SCENES, FIND_GALLERIES, FIND_PERFORMERS, FIND_STUDIOS, FIND_TAGS],
    create_queries: None,
    destroy_type_fields: &[],
    destroy_queries: &[FIND_IMAGES, STATS],
    find_query: Some(FIND_GALLERY),
    for_filter_query: None,
    created_stat: Some("gallery_count"),
    destroyed_stat: None,
    counter_queries: &[],
};

const GALLERY_CHAPTER: ImpactTable = ImpactTable {
    family: EntityFamily::GalleryChapter,
    type_fields: &[(Typename::Gallery, &["chapters"])],
    queries: &[FIND_GALLERIES],
    create_queries: None,
    destroy_type_fields: &[],
    destroy_queries: &[],
    find_query: None,
    for_filter_query: None,
    created_stat: None,
    destroyed_stat: None,
    counter_queries: &[],
};

const PERFORMER: ImpactTable = ImpactTable {
    family: EntityFamily::Performer,
    type_fields: &[(Typename::Tag, &["performer_count"])],
    queries: &[FIND_SCENES, FIND_IMAGES, FIND_GALLERIES, FIND_PERFORMERS, FIND_TAGS],
    create_queries: Some(&[FIND_PERFORMERS, FIND_TAGS]),
    destroy_type_fields: &[
        (Typename::Performer, &["performer_count"]),
        (Typename::Studio, &["performer_count"]),
    ],
    destroy_queries: &[FIND_MOVIES, FIND_SCENE_MARKERS],
    find_query: Some(FIND_PERFORMER),
    for_filter_query: Some(ALL_PERFORMERS_FOR_FILTER),
    created_stat: Some("performer_count"),
    destroyed_stat: Some("performer_count"),
    counter_queries: &[],
};

const STUDIO: ImpactTable = ImpactTable {
    family: EntityFamily::Studio,
    type_fields: &[(Typename::Studio, &["child_studios"])],
    queries: &[
        FIND_SCENES,
        FIND_IMAGES,
        FIND_MOVIES,
        FIND_GALLERIES,
        FIND_PERFORMERS,
        FIND_STUDIOS,
    ],
    create_queries: Some(&[FIND_STUDIOS]),
    destroy_type_fields: &[],
    destroy_queries: &[],
    find_query: Some(FIND_STUDIO),
    for_filter_query: Some(ALL_STUDIOS_FOR_FILTER),
    created_stat: Some("studio_count"),
    destroyed_stat: Some("studio_count"),
    counter_queries: &[],
};

const TAG: ImpactTable = ImpactTable {
    family: EntityFamily::Tag,
    type_fields: &[(Typename::Tag, &["parents", "children"])],
    queries: &[FIND_SCENES, FIND_IMAGES, FIND_GALLERIES, FIND_PERFORMERS, FIND_TAGS],
    create_queries: Some(&[FIND_TAGS]),
    destroy_type_fields: &[],
    destroy_queries: &[],
    find_query: Some(FIND_TAG),
    for_filter_query: Some(ALL_TAGS_FOR_FILTER),
    created_stat: Some("tag_count"),
    destroyed_stat: Some("tag_count"),
    counter_queries: &[],
};

/// The impact table for a family.
pub fn impact_table(family: EntityFamily) -> &'static ImpactTable {
    match family {
        EntityFamily::Scene => &SCENE,
        EntityFamily::Image => &IMAGE,
        EntityFamily::Movie => &MOVIE,
        EntityFamily::Gallery => &GALLERY,
        EntityFamily::GalleryChapter => &GALLERY_CHAPTER,
        EntityFamily::Performer => &PERFORMER,
        EntityFamily::Studio => &STUDIO,
        EntityFamily::Tag => &TAG,
        EntityFamily::SceneMarker => &SCENE_MARKER,
    }
}

/// A registered derived field its source family's table does not evict on
/// the path that makes it stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingImpact {
    pub source: EntityFamily,
    pub owner: Typename,
    pub field: &'static str,
    pub path: StalePath,
}

impl std::fmt::Display for MissingImpact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = match self.path {
            StalePath::AnyChange => "",
            StalePath::Destroy => " destroy",
        };
        write!(f, "{}.{} is not evicted by {}{} mutations", self.owner, self.field, self.source, path)
    }
}

/// Check that every derived field is evicted by its source family's table.
/// Fields stale on any change must be in the normal set; destroy-only
/// fields may sit in the destroy set.
pub fn check_completeness(registry: &[DerivedField]) -> Result<(), Vec<MissingImpact>> {
    let missing: Vec<MissingImpact> = registry
        .iter()
        .filter(|d| {
            let table = impact_table(d.source);
            let fields = match d.path {
                StalePath::AnyChange => table.type_fields(),
                StalePath::Destroy => table.destroy_fields(),
            };
            !fields.contains(d.owner, d.field)
        })
        .map(|d| MissingImpact {
            source: d.source,
            owner: d.owner,
            field: d.field,
            path: d.path,
        })
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stash_schema::{MutationFamily, MutationKind, DERIVED_FIELDS};

    #[test]
    fn test_registry_fully_covered() {
        assert_eq!(check_completeness(DERIVED_FIELDS), Ok(()));
    }

    #[test]
    fn test_gap_is_reported() {
        let registry = [DerivedField {
            owner: Typename::Tag,
            field: "studio_count",
            source: EntityFamily::Studio,
            path: StalePath::AnyChange,
        }];
        let missing = check_completeness(&registry).unwrap_err();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].to_string(), "Tag.studio_count is not evicted by studio mutations");
    }

    #[test]
    fn test_destroy_only_eviction_does_not_cover_updates() {
        let entry = |path| DerivedField {
            owner: Typename::Performer,
            field: "performer_count",
            source: EntityFamily::Performer,
            path,
        };

        assert_eq!(check_completeness(&[entry(StalePath::Destroy)]), Ok(()));
        let missing = check_completeness(&[entry(StalePath::AnyChange)]).unwrap_err();
        assert_eq!(
            missing[0].to_string(),
            "Performer.performer_count is not evicted by performer mutations"
        );
    }

    #[test]
    fn test_every_entity_mutation_has_a_table() {
        for kind in MutationKind::ALL {
            if let MutationFamily::Entity(family) = kind.family() {
                assert_eq!(impact_table(family).family, family, "{}", kind.name());
            }
        }
    }

    #[test]
    fn test_every_family_has_its_own_table() {
        for family in EntityFamily::ALL {
            assert_eq!(impact_table(family).family, family);
        }
    }

    #[test]
    fn test_destroy_sets_extend_normal_sets() {
        let movie = impact_table(EntityFamily::Movie);
        let fields = movie.destroy_fields();
        assert!(fields.contains(Typename::Studio, "movie_count"));
        assert!(fields.contains(Typename::Scene, "movies"));
        assert_eq!(movie.destroy_queries(), vec![FIND_MOVIES, FIND_SCENES]);

        let performer = impact_table(EntityFamily::Performer);
        assert_eq!(performer.destroy_queries().len(), 7);
    }

    #[test]
    fn test_create_queries_narrow() {
        assert_eq!(impact_table(EntityFamily::Tag).create_queries(), &[FIND_TAGS]);
        assert_eq!(
            impact_table(EntityFamily::Scene).create_queries(),
            impact_table(EntityFamily::Scene).queries
        );
    }

    #[test]
    fn test_tables_reference_known_documents() {
        for family in EntityFamily::ALL {
            let table = impact_table(family);
            for doc in table.destroy_queries().iter().chain(table.counter_queries) {
                assert_eq!(QueryDocument::by_name(doc.name).map(|d| d.root_field), Ok(doc.root_field));
            }
        }
    }
}
