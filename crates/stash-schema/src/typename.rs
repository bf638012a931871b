//! Cacheable object typenames.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::SchemaError;

/// GraphQL object types that carry an `id` and are normalized by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Typename {
    Scene,
    Image,
    Gallery,
    GalleryChapter,
    Performer,
    Studio,
    Tag,
    Movie,
    SceneMarker,
    SavedFilter,
    VideoFile,
    ImageFile,
    GalleryFile,
}

impl Typename {
    /// Every normalized typename.
    pub const ALL: [Typename; 13] = [
        Self::Scene,
        Self::Image,
        Self::Gallery,
        Self::GalleryChapter,
        Self::Performer,
        Self::Studio,
        Self::Tag,
        Self::Movie,
        Self::SceneMarker,
        Self::SavedFilter,
        Self::VideoFile,
        Self::ImageFile,
        Self::GalleryFile,
    ];

    /// The GraphQL `__typename` string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scene => "Scene",
            Self::Image => "Image",
            Self::Gallery => "Gallery",
            Self::GalleryChapter => "GalleryChapter",
            Self::Performer => "Performer",
            Self::Studio => "Studio",
            Self::Tag => "Tag",
            Self::Movie => "Movie",
            Self::SceneMarker => "SceneMarker",
            Self::SavedFilter => "SavedFilter",
            Self::VideoFile => "VideoFile",
            Self::ImageFile => "ImageFile",
            Self::GalleryFile => "GalleryFile",
        }
    }

    /// Parse a `__typename` string.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    /// Whether this type is a member of the given interface.
    pub fn implements(&self, interface: Interface) -> bool {
        interface.possible_types().contains(self)
    }
}

impl fmt::Display for Typename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Typename {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| SchemaError::UnknownTypename(s.to_string()))
    }
}

/// Abstract file interfaces. Fragments on an interface match any of its
/// possible types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interface {
    BaseFile,
    VisualFile,
}

impl Interface {
    /// Concrete types implementing this interface.
    pub fn possible_types(&self) -> &'static [Typename] {
        match self {
            Self::BaseFile => &[Typename::VideoFile, Typename::ImageFile, Typename::GalleryFile],
            Self::VisualFile => &[Typename::VideoFile, Typename::ImageFile],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrips_every_typename() {
        for t in Typename::ALL {
            assert_eq!(Typename::parse(t.as_str()), Some(t));
        }
        assert_eq!(Typename::parse("Stats"), None);
    }

    #[test]
    fn test_from_str_error() {
        let err = "scene".parse::<Typename>().unwrap_err();
        assert_eq!(err, SchemaError::UnknownTypename("scene".to_string()));
    }

    #[test]
    fn test_serde_uses_graphql_name() {
        let json = serde_json::to_string(&Typename::SceneMarker).unwrap();
        assert_eq!(json, "\"SceneMarker\"");
    }

    #[test]
    fn test_possible_types() {
        assert!(Typename::GalleryFile.implements(Interface::BaseFile));
        assert!(!Typename::GalleryFile.implements(Interface::VisualFile));
        assert!(Typename::VideoFile.implements(Interface::VisualFile));
        assert!(!Typename::Scene.implements(Interface::BaseFile));
    }
}
