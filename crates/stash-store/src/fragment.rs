//! Fragments read directly off a cached object.

use stash_schema::Typename;

/// A named set of fields on one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub name: &'static str,
    pub on: Typename,
    pub fields: &'static [&'static str],
}

/// The slice of scene data the O-counter update needs.
pub const SLIM_SCENE_DATA: Fragment = Fragment {
    name: "SlimSceneData",
    on: Typename::Scene,
    fields: &["id", "o_counter", "performers"],
};

/// The slice of image data the O-counter update needs.
pub const SLIM_IMAGE_DATA: Fragment = Fragment {
    name: "SlimImageData",
    on: Typename::Image,
    fields: &["id", "o_counter", "performers"],
};
