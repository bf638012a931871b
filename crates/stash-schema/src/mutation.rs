//! Mutation contracts.
//!
//! Each [`Mutation`] variant carries only the variables its cache update
//! consults; the full GraphQL input is the transport's concern. Records are
//! serialized adjacently tagged:
//!
//! ```json
//! {"name": "tagsMerge", "input": {"source": ["3"], "destination": "1"}}
//! ```

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{SchemaError, Typename};

/// Entity families that own an impact table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityFamily {
    Scene,
    Image,
    Movie,
    Gallery,
    GalleryChapter,
    Performer,
    Studio,
    Tag,
    SceneMarker,
}

impl EntityFamily {
    pub const ALL: [EntityFamily; 9] = [
        Self::Scene,
        Self::Image,
        Self::Movie,
        Self::Gallery,
        Self::GalleryChapter,
        Self::Performer,
        Self::Studio,
        Self::Tag,
        Self::SceneMarker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scene => "scene",
            Self::Image => "image",
            Self::Movie => "movie",
            Self::Gallery => "gallery",
            Self::GalleryChapter => "gallery_chapter",
            Self::Performer => "performer",
            Self::Studio => "studio",
            Self::Tag => "tag",
            Self::SceneMarker => "scene_marker",
        }
    }
}

impl EntityFamily {
    /// The object type rows of this family are cached as.
    pub fn typename(&self) -> Typename {
        match self {
            Self::Scene => Typename::Scene,
            Self::Image => Typename::Image,
            Self::Movie => Typename::Movie,
            Self::Gallery => Typename::Gallery,
            Self::GalleryChapter => Typename::GalleryChapter,
            Self::Performer => Typename::Performer,
            Self::Studio => Typename::Studio,
            Self::Tag => Typename::Tag,
            Self::SceneMarker => Typename::SceneMarker,
        }
    }
}

impl fmt::Display for EntityFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityFamily {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownFamily(s.to_string()))
    }
}

/// What a mutation touches, for routing to its invalidation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationFamily {
    /// Governed by the family's impact table.
    Entity(EntityFamily),
    SavedFilter,
    File,
    Configuration,
    /// First-run setup and database migration.
    Setup,
}

/// A mutation together with the variables its cache update needs.
///
/// Inputs carry more than the hook reads; unknown input fields are ignored
/// and a missing or `null` input reads as `{}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", tag = "name", content = "input", rename_all = "camelCase")]
pub enum Mutation {
    SceneCreate {
        #[serde(default)]
        file_ids: Vec<String>,
    },
    SceneUpdate {
        id: String,
    },
    BulkSceneUpdate {
        #[serde(default)]
        ids: Vec<String>,
    },
    ScenesUpdate {
        #[serde(default)]
        ids: Vec<String>,
    },
    SceneDestroy {
        id: String,
    },
    ScenesDestroy {
        ids: Vec<String>,
    },
    SceneIncrementO {
        id: String,
    },
    SceneDecrementO {
        id: String,
    },
    SceneResetO {
        id: String,
    },
    SceneSetPrimaryFile {
        id: String,
        file_id: String,
    },
    SceneAssignFile {
        scene_id: String,
        file_id: String,
    },
    SceneMerge {
        destination: String,
        source: Vec<String>,
    },
    SceneSaveActivity {
        id: String,
        #[serde(default)]
        resume_time: Option<f64>,
        #[serde(default)]
        play_duration: Option<f64>,
    },
    SceneIncrementPlayCount {
        id: String,
    },
    ImageUpdate {
        id: String,
    },
    BulkImageUpdate {
        #[serde(default)]
        ids: Vec<String>,
    },
    ImagesDestroy {
        ids: Vec<String>,
    },
    ImageIncrementO {
        id: String,
    },
    ImageDecrementO {
        id: String,
    },
    ImageResetO {
        id: String,
    },
    ImageSetPrimaryFile {
        id: String,
        file_id: String,
    },
    MovieCreate {},
    MovieUpdate {
        id: String,
    },
    BulkMovieUpdate {
        #[serde(default)]
        ids: Vec<String>,
    },
    MovieDestroy {
        id: String,
    },
    MoviesDestroy {
        ids: Vec<String>,
    },
    SceneMarkerCreate {
        scene_id: String,
    },
    SceneMarkerUpdate {
        id: String,
        scene_id: String,
    },
    SceneMarkerDestroy {
        id: String,
    },
    GalleryCreate {},
    GalleryUpdate {
        id: String,
    },
    BulkGalleryUpdate {
        #[serde(default)]
        ids: Vec<String>,
    },
    GalleryDestroy {
        ids: Vec<String>,
    },
    AddGalleryImages {
        gallery_id: String,
        image_ids: Vec<String>,
    },
    RemoveGalleryImages {
        gallery_id: String,
        image_ids: Vec<String>,
    },
    GallerySetPrimaryFile {
        id: String,
        file_id: String,
    },
    GalleryChapterCreate {
        gallery_id: String,
    },
    GalleryChapterUpdate {
        id: String,
    },
    GalleryChapterDestroy {
        id: String,
    },
    PerformerCreate {},
    PerformerUpdate {
        id: String,
    },
    BulkPerformerUpdate {
        #[serde(default)]
        ids: Vec<String>,
    },
    PerformerDestroy {
        id: String,
    },
    PerformersDestroy {
        ids: Vec<String>,
    },
    StudioCreate {
        #[serde(default)]
        parent_id: Option<String>,
    },
    StudioUpdate {
        id: String,
    },
    StudioDestroy {
        id: String,
    },
    StudiosDestroy {
        ids: Vec<String>,
    },
    TagCreate {},
    TagUpdate {
        id: String,
    },
    TagDestroy {
        id: String,
    },
    TagsDestroy {
        ids: Vec<String>,
    },
    TagsMerge {
        source: Vec<String>,
        destination: String,
    },
    SaveFilter {},
    SetDefaultFilter {},
    DestroySavedFilter {
        id: String,
    },
    DeleteFiles {
        ids: Vec<String>,
    },
    ConfigureGeneral {},
    ConfigureInterface {},
    ConfigureDefaults {},
    #[serde(rename = "configureUI")]
    ConfigureUi {},
    ConfigureScraping {},
    #[serde(rename = "configureDLNA")]
    ConfigureDlna {},
    #[serde(rename = "generateAPIKey")]
    GenerateApiKey {},
    Setup {},
    Migrate {},
}

impl Serialize for Mutation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Mutation::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Mutation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut raw = Value::deserialize(deserializer)?;
        if let Value::Object(map) = &mut raw {
            if map.get("input").map_or(true, Value::is_null) {
                map.insert("input".to_string(), Value::Object(Map::new()));
            }
        }
        Mutation::deserialize(raw).map_err(de::Error::custom)
    }
}

impl Mutation {
    /// The kind of this mutation.
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::SceneCreate { .. } => MutationKind::SceneCreate,
            Self::SceneUpdate { .. } => MutationKind::SceneUpdate,
            Self::BulkSceneUpdate { .. } => MutationKind::BulkSceneUpdate,
            Self::ScenesUpdate { .. } => MutationKind::ScenesUpdate,
            Self::SceneDestroy { .. } => MutationKind::SceneDestroy,
            Self::ScenesDestroy { .. } => MutationKind::ScenesDestroy,
            Self::SceneIncrementO { .. } => MutationKind::SceneIncrementO,
            Self::SceneDecrementO { .. } => MutationKind::SceneDecrementO,
            Self::SceneResetO { .. } => MutationKind::SceneResetO,
            Self::SceneSetPrimaryFile { .. } => MutationKind::SceneSetPrimaryFile,
            Self::SceneAssignFile { .. } => MutationKind::SceneAssignFile,
            Self::SceneMerge { .. } => MutationKind::SceneMerge,
            Self::SceneSaveActivity { .. } => MutationKind::SceneSaveActivity,
            Self::SceneIncrementPlayCount { .. } => MutationKind::SceneIncrementPlayCount,
            Self::ImageUpdate { .. } => MutationKind::ImageUpdate,
            Self::BulkImageUpdate { .. } => MutationKind::BulkImageUpdate,
            Self::ImagesDestroy { .. } => MutationKind::ImagesDestroy,
            Self::ImageIncrementO { .. } => MutationKind::ImageIncrementO,
            Self::ImageDecrementO { .. } => MutationKind::ImageDecrementO,
            Self::ImageResetO { .. } => MutationKind::ImageResetO,
            Self::ImageSetPrimaryFile { .. } => MutationKind::ImageSetPrimaryFile,
            Self::MovieCreate { .. } => MutationKind::MovieCreate,
            Self::MovieUpdate { .. } => MutationKind::MovieUpdate,
            Self::BulkMovieUpdate { .. } => MutationKind::BulkMovieUpdate,
            Self::MovieDestroy { .. } => MutationKind::MovieDestroy,
            Self::MoviesDestroy { .. } => MutationKind::MoviesDestroy,
            Self::SceneMarkerCreate { .. } => MutationKind::SceneMarkerCreate,
            Self::SceneMarkerUpdate { .. } => MutationKind::SceneMarkerUpdate,
            Self::SceneMarkerDestroy { .. } => MutationKind::SceneMarkerDestroy,
            Self::GalleryCreate { .. } => MutationKind::GalleryCreate,
            Self::GalleryUpdate { .. } => MutationKind::GalleryUpdate,
            Self::BulkGalleryUpdate { .. } => MutationKind::BulkGalleryUpdate,
            Self::GalleryDestroy { .. } => MutationKind::GalleryDestroy,
            Self::AddGalleryImages { .. } => MutationKind::AddGalleryImages,
            Self::RemoveGalleryImages { .. } => MutationKind::RemoveGalleryImages,
            Self::GallerySetPrimaryFile { .. } => MutationKind::GallerySetPrimaryFile,
            Self::GalleryChapterCreate { .. } => MutationKind::GalleryChapterCreate,
            Self::GalleryChapterUpdate { .. } => MutationKind::GalleryChapterUpdate,
            Self::GalleryChapterDestroy { .. } => MutationKind::GalleryChapterDestroy,
            Self::PerformerCreate { .. } => MutationKind::PerformerCreate,
            Self::PerformerUpdate { .. } => MutationKind::PerformerUpdate,
            Self::BulkPerformerUpdate { .. } => MutationKind::BulkPerformerUpdate,
            Self::PerformerDestroy { .. } => MutationKind::PerformerDestroy,
            Self::PerformersDestroy { .. } => MutationKind::PerformersDestroy,
            Self::StudioCreate { .. } => MutationKind::StudioCreate,
            Self::StudioUpdate { .. } => MutationKind::StudioUpdate,
            Self::StudioDestroy { .. } => MutationKind::StudioDestroy,
            Self::StudiosDestroy { .. } => MutationKind::StudiosDestroy,
            Self::TagCreate { .. } => MutationKind::TagCreate,
            Self::TagUpdate { .. } => MutationKind::TagUpdate,
            Self::TagDestroy { .. } => MutationKind::TagDestroy,
            Self::TagsDestroy { .. } => MutationKind::TagsDestroy,
            Self::TagsMerge { .. } => MutationKind::TagsMerge,
            Self::SaveFilter { .. } => MutationKind::SaveFilter,
            Self::SetDefaultFilter { .. } => MutationKind::SetDefaultFilter,
            Self::DestroySavedFilter { .. } => MutationKind::DestroySavedFilter,
            Self::DeleteFiles { .. } => MutationKind::DeleteFiles,
            Self::ConfigureGeneral { .. } => MutationKind::ConfigureGeneral,
            Self::ConfigureInterface { .. } => MutationKind::ConfigureInterface,
            Self::ConfigureDefaults { .. } => MutationKind::ConfigureDefaults,
            Self::ConfigureUi { .. } => MutationKind::ConfigureUi,
            Self::ConfigureScraping { .. } => MutationKind::ConfigureScraping,
            Self::ConfigureDlna { .. } => MutationKind::ConfigureDlna,
            Self::GenerateApiKey { .. } => MutationKind::GenerateApiKey,
            Self::Setup { .. } => MutationKind::Setup,
            Self::Migrate { .. } => MutationKind::Migrate,
        }
    }

    /// GraphQL mutation field name.
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// Field-less mirror of [`Mutation`], one entry per mutation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationKind {
    SceneCreate,
    SceneUpdate,
    BulkSceneUpdate,
    ScenesUpdate,
    SceneDestroy,
    ScenesDestroy,
    SceneIncrementO,
    SceneDecrementO,
    SceneResetO,
    SceneSetPrimaryFile,
    SceneAssignFile,
    SceneMerge,
    SceneSaveActivity,
    SceneIncrementPlayCount,
    ImageUpdate,
    BulkImageUpdate,
    ImagesDestroy,
    ImageIncrementO,
    ImageDecrementO,
    ImageResetO,
    ImageSetPrimaryFile,
    MovieCreate,
    MovieUpdate,
    BulkMovieUpdate,
    MovieDestroy,
    MoviesDestroy,
    SceneMarkerCreate,
    SceneMarkerUpdate,
    SceneMarkerDestroy,
    GalleryCreate,
    GalleryUpdate,
    BulkGalleryUpdate,
    GalleryDestroy,
    AddGalleryImages,
    RemoveGalleryImages,
    GallerySetPrimaryFile,
    GalleryChapterCreate,
    GalleryChapterUpdate,
    GalleryChapterDestroy,
    PerformerCreate,
    PerformerUpdate,
    BulkPerformerUpdate,
    PerformerDestroy,
    PerformersDestroy,
    StudioCreate,
    StudioUpdate,
    StudioDestroy,
    StudiosDestroy,
    TagCreate,
    TagUpdate,
    TagDestroy,
    TagsDestroy,
    TagsMerge,
    SaveFilter,
    SetDefaultFilter,
    DestroySavedFilter,
    DeleteFiles,
    ConfigureGeneral,
    ConfigureInterface,
    ConfigureDefaults,
    #[serde(rename = "configureUI")]
    ConfigureUi,
    ConfigureScraping,
    #[serde(rename = "configureDLNA")]
    ConfigureDlna,
    #[serde(rename = "generateAPIKey")]
    GenerateApiKey,
    Setup,
    Migrate,
}

impl MutationKind {
    /// Every mutation kind with a cache update.
    pub const ALL: &'static [MutationKind] = &[
        Self::SceneCreate,
        Self::SceneUpdate,
        Self::BulkSceneUpdate,
        Self::ScenesUpdate,
        Self::SceneDestroy,
        Self::ScenesDestroy,
        Self::SceneIncrementO,
        Self::SceneDecrementO,
        Self::SceneResetO,
        Self::SceneSetPrimaryFile,
        Self::SceneAssignFile,
        Self::SceneMerge,
        Self::SceneSaveActivity,
        Self::SceneIncrementPlayCount,
        Self::ImageUpdate,
        Self::BulkImageUpdate,
        Self::ImagesDestroy,
        Self::ImageIncrementO,
        Self::ImageDecrementO,
        Self::ImageResetO,
        Self::ImageSetPrimaryFile,
        Self::MovieCreate,
        Self::MovieUpdate,
        Self::BulkMovieUpdate,
        Self::MovieDestroy,
        Self::MoviesDestroy,
        Self::SceneMarkerCreate,
        Self::SceneMarkerUpdate,
        Self::SceneMarkerDestroy,
        Self::GalleryCreate,
        Self::GalleryUpdate,
        Self::BulkGalleryUpdate,
        Self::GalleryDestroy,
        Self::AddGalleryImages,
        Self::RemoveGalleryImages,
        Self::GallerySetPrimaryFile,
        Self::GalleryChapterCreate,
        Self::GalleryChapterUpdate,
        Self::GalleryChapterDestroy,
        Self::PerformerCreate,
        Self::PerformerUpdate,
        Self::BulkPerformerUpdate,
        Self::PerformerDestroy,
        Self::PerformersDestroy,
        Self::StudioCreate,
        Self::StudioUpdate,
        Self::StudioDestroy,
        Self::StudiosDestroy,
        Self::TagCreate,
        Self::TagUpdate,
        Self::TagDestroy,
        Self::TagsDestroy,
        Self::TagsMerge,
        Self::SaveFilter,
        Self::SetDefaultFilter,
        Self::DestroySavedFilter,
        Self::DeleteFiles,
        Self::ConfigureGeneral,
        Self::ConfigureInterface,
        Self::ConfigureDefaults,
        Self::ConfigureUi,
        Self::ConfigureScraping,
        Self::ConfigureDlna,
        Self::GenerateApiKey,
        Self::Setup,
        Self::Migrate,
    ];

    /// GraphQL mutation field name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SceneCreate => "sceneCreate",
            Self::SceneUpdate => "sceneUpdate",
            Self::BulkSceneUpdate => "bulkSceneUpdate",
            Self::ScenesUpdate => "scenesUpdate",
            Self::SceneDestroy => "sceneDestroy",
            Self::ScenesDestroy => "scenesDestroy",
            Self::SceneIncrementO => "sceneIncrementO",
            Self::SceneDecrementO => "sceneDecrementO",
            Self::SceneResetO => "sceneResetO",
            Self::SceneSetPrimaryFile => "sceneSetPrimaryFile",
            Self::SceneAssignFile => "sceneAssignFile",
            Self::SceneMerge => "sceneMerge",
            Self::SceneSaveActivity => "sceneSaveActivity",
            Self::SceneIncrementPlayCount => "sceneIncrementPlayCount",
            Self::ImageUpdate => "imageUpdate",
            Self::BulkImageUpdate => "bulkImageUpdate",
            Self::ImagesDestroy => "imagesDestroy",
            Self::ImageIncrementO => "imageIncrementO",
            Self::ImageDecrementO => "imageDecrementO",
            Self::ImageResetO => "imageResetO",
            Self::ImageSetPrimaryFile => "imageSetPrimaryFile",
            Self::MovieCreate => "movieCreate",
            Self::MovieUpdate => "movieUpdate",
            Self::BulkMovieUpdate => "bulkMovieUpdate",
            Self::MovieDestroy => "movieDestroy",
            Self::MoviesDestroy => "moviesDestroy",
            Self::SceneMarkerCreate => "sceneMarkerCreate",
            Self::SceneMarkerUpdate => "sceneMarkerUpdate",
            Self::SceneMarkerDestroy => "sceneMarkerDestroy",
            Self::GalleryCreate => "galleryCreate",
            Self::GalleryUpdate => "galleryUpdate",
            Self::BulkGalleryUpdate => "bulkGalleryUpdate",
            Self::GalleryDestroy => "galleryDestroy",
            Self::AddGalleryImages => "addGalleryImages",
            Self::RemoveGalleryImages => "removeGalleryImages",
            Self::GallerySetPrimaryFile => "gallerySetPrimaryFile",
            Self::GalleryChapterCreate => "galleryChapterCreate",
            Self::GalleryChapterUpdate => "galleryChapterUpdate",
            Self::GalleryChapterDestroy => "galleryChapterDestroy",
            Self::PerformerCreate => "performerCreate",
            Self::PerformerUpdate => "performerUpdate",
            Self::BulkPerformerUpdate => "bulkPerformerUpdate",
            Self::PerformerDestroy => "performerDestroy",
            Self::PerformersDestroy => "performersDestroy",
            Self::StudioCreate => "studioCreate",
            Self::StudioUpdate => "studioUpdate",
            Self::StudioDestroy => "studioDestroy",
            Self::StudiosDestroy => "studiosDestroy",
            Self::TagCreate => "tagCreate",
            Self::TagUpdate => "tagUpdate",
            Self::TagDestroy => "tagDestroy",
            Self::TagsDestroy => "tagsDestroy",
            Self::TagsMerge => "tagsMerge",
            Self::SaveFilter => "saveFilter",
            Self::SetDefaultFilter => "setDefaultFilter",
            Self::DestroySavedFilter => "destroySavedFilter",
            Self::DeleteFiles => "deleteFiles",
            Self::ConfigureGeneral => "configureGeneral",
            Self::ConfigureInterface => "configureInterface",
            Self::ConfigureDefaults => "configureDefaults",
            Self::ConfigureUi => "configureUI",
            Self::ConfigureScraping => "configureScraping",
            Self::ConfigureDlna => "configureDLNA",
            Self::GenerateApiKey => "generateAPIKey",
            Self::Setup => "setup",
            Self::Migrate => "migrate",
        }
    }

    /// The family whose impact table governs this mutation.
    pub fn family(&self) -> MutationFamily {
        match self {
            Self::SceneCreate => MutationFamily::Entity(EntityFamily::Scene),
            Self::SceneUpdate => MutationFamily::Entity(EntityFamily::Scene),
            Self::BulkSceneUpdate => MutationFamily::Entity(EntityFamily::Scene),
            Self::ScenesUpdate => MutationFamily::Entity(EntityFamily::Scene),
            Self::SceneDestroy => MutationFamily::Entity(EntityFamily::Scene),
            Self::ScenesDestroy => MutationFamily::Entity(EntityFamily::Scene),
            Self::SceneIncrementO => MutationFamily::Entity(EntityFamily::Scene),
            Self::SceneDecrementO => MutationFamily::Entity(EntityFamily::Scene),
            Self::SceneResetO => MutationFamily::Entity(EntityFamily::Scene),
            Self::SceneSetPrimaryFile => MutationFamily::Entity(EntityFamily::Scene),
            Self::SceneAssignFile => MutationFamily::Entity(EntityFamily::Scene),
            Self::SceneMerge => MutationFamily::Entity(EntityFamily::Scene),
            Self::SceneSaveActivity => MutationFamily::Entity(EntityFamily::Scene),
            Self::SceneIncrementPlayCount => MutationFamily::Entity(EntityFamily::Scene),
            Self::ImageUpdate => MutationFamily::Entity(EntityFamily::Image),
            Self::BulkImageUpdate => MutationFamily::Entity(EntityFamily::Image),
            Self::ImagesDestroy => MutationFamily::Entity(EntityFamily::Image),
            Self::ImageIncrementO => MutationFamily::Entity(EntityFamily::Image),
            Self::ImageDecrementO => MutationFamily::Entity(EntityFamily::Image),
            Self::ImageResetO => MutationFamily::Entity(EntityFamily::Image),
            Self::ImageSetPrimaryFile => MutationFamily::Entity(EntityFamily::Image),
            Self::MovieCreate => MutationFamily::Entity(EntityFamily::Movie),
            Self::MovieUpdate => MutationFamily::Entity(EntityFamily::Movie),
            Self::BulkMovieUpdate => MutationFamily::Entity(EntityFamily::Movie),
            Self::MovieDestroy => MutationFamily::Entity(EntityFamily::Movie),
            Self::MoviesDestroy => MutationFamily::Entity(EntityFamily::Movie),
            Self::SceneMarkerCreate => MutationFamily::Entity(EntityFamily::SceneMarker),
            Self::SceneMarkerUpdate => MutationFamily::Entity(EntityFamily::SceneMarker),
            Self::SceneMarkerDestroy => MutationFamily::Entity(EntityFamily::SceneMarker),
            Self::GalleryCreate => MutationFamily::Entity(EntityFamily::Gallery),
            Self::GalleryUpdate => MutationFamily::Entity(EntityFamily::Gallery),
            Self::BulkGalleryUpdate => MutationFamily::Entity(EntityFamily::Gallery),
            Self::GalleryDestroy => MutationFamily::Entity(EntityFamily::Gallery),
            Self::AddGalleryImages => MutationFamily::Entity(EntityFamily::Gallery),
            Self::RemoveGalleryImages => MutationFamily::Entity(EntityFamily::Gallery),
            Self::GallerySetPrimaryFile => MutationFamily::Entity(EntityFamily::Gallery),
            Self::GalleryChapterCreate => MutationFamily::Entity(EntityFamily::GalleryChapter),
            Self::GalleryChapterUpdate => MutationFamily::Entity(EntityFamily::GalleryChapter),
            Self::GalleryChapterDestroy => MutationFamily::Entity(EntityFamily::GalleryChapter),
            Self::PerformerCreate => MutationFamily::Entity(EntityFamily::Performer),
            Self::PerformerUpdate => MutationFamily::Entity(EntityFamily::Performer),
            Self::BulkPerformerUpdate => MutationFamily::Entity(EntityFamily::Performer),
            Self::PerformerDestroy => MutationFamily::Entity(EntityFamily::Performer),
            Self::PerformersDestroy => MutationFamily::Entity(EntityFamily::Performer),
            Self::StudioCreate => MutationFamily::Entity(EntityFamily::Studio),
            Self::StudioUpdate => MutationFamily::Entity(EntityFamily::Studio),
            Self::StudioDestroy => MutationFamily::Entity(EntityFamily::Studio),
            Self::StudiosDestroy => MutationFamily::Entity(EntityFamily::Studio),
            Self::TagCreate => MutationFamily::Entity(EntityFamily::Tag),
            Self::TagUpdate => MutationFamily::Entity(EntityFamily::Tag),
            Self::TagDestroy => MutationFamily::Entity(EntityFamily::Tag),
            Self::TagsDestroy => MutationFamily::Entity(EntityFamily::Tag),
            Self::TagsMerge => MutationFamily::Entity(EntityFamily::Tag),
            Self::SaveFilter => MutationFamily::SavedFilter,
            Self::SetDefaultFilter => MutationFamily::SavedFilter,
            Self::DestroySavedFilter => MutationFamily::SavedFilter,
            Self::DeleteFiles => MutationFamily::File,
            Self::ConfigureGeneral => MutationFamily::Configuration,
            Self::ConfigureInterface => MutationFamily::Configuration,
            Self::ConfigureDefaults => MutationFamily::Configuration,
            Self::ConfigureUi => MutationFamily::Configuration,
            Self::ConfigureScraping => MutationFamily::Configuration,
            Self::ConfigureDlna => MutationFamily::Configuration,
            Self::GenerateApiKey => MutationFamily::Configuration,
            Self::Setup => MutationFamily::Setup,
            Self::Migrate => MutationFamily::Setup,
        }
    }
}

/// One completed mutation: what was sent and what the server returned.
///
/// `result` is the mutation's root field value; `None` and JSON `null` both
/// mean the server returned nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationRecord {
    pub mutation: Mutation,
    #[serde(default)]
    pub result: Option<Value>,
}
