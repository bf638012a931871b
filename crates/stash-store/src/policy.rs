//! Field read policies.
//!
//! Policies adjust how a stored value is read back:
//!
//! - **read-reference**: a single-object root field whose entry is absent or
//!   dangling falls back to the object with the requested id, if resident.
//!   A detail page opened from a list then needs no network round trip.
//! - **dangling-null**: a reference to an object no longer in the store reads
//!   as `null`, because a dangling reference means the object was deleted.

use std::collections::HashMap;

use stash_schema::Typename;

/// How a single field is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    ReadReference(Typename),
    DanglingNull,
}

/// Read policies for root fields and object fields.
#[derive(Debug, Clone)]
pub struct TypePolicies {
    root: HashMap<String, FieldPolicy>,
    fields: HashMap<(Typename, String), FieldPolicy>,
}

impl TypePolicies {
    /// No policies at all.
    pub fn empty() -> Self {
        Self {
            root: HashMap::new(),
            fields: HashMap::new(),
        }
    }

    /// Set the policy of a root query field.
    pub fn with_root(mut self, field: &str, policy: FieldPolicy) -> Self {
        self.root.insert(field.to_string(), policy);
        self
    }

    /// Set the policy of a field on objects of `typename`.
    pub fn with_field(mut self, typename: Typename, field: &str, policy: FieldPolicy) -> Self {
        self.fields.insert((typename, field.to_string()), policy);
        self
    }

    pub fn root_policy(&self, field: &str) -> Option<FieldPolicy> {
        self.root.get(field).copied()
    }

    pub fn field_policy(&self, typename: Typename, field: &str) -> Option<FieldPolicy> {
        self.fields.get(&(typename, field.to_string())).copied()
    }
}

impl Default for TypePolicies {
    fn default() -> Self {
        use FieldPolicy::{DanglingNull, ReadReference};

        Self::empty()
            .with_root("findImage", ReadReference(Typename::Image))
            .with_root("findPerformer", ReadReference(Typename::Performer))
            .with_root("findStudio", ReadReference(Typename::Studio))
            .with_root("findMovie", ReadReference(Typename::Movie))
            .with_root("findGallery", ReadReference(Typename::Gallery))
            .with_root("findScene", ReadReference(Typename::Scene))
            .with_root("findTag", ReadReference(Typename::Tag))
            .with_root("findSavedFilter", ReadReference(Typename::SavedFilter))
            .with_root("findDefaultFilter", DanglingNull)
            .with_field(Typename::Scene, "studio", DanglingNull)
            .with_field(Typename::Image, "studio", DanglingNull)
            .with_field(Typename::Movie, "studio", DanglingNull)
            .with_field(Typename::Gallery, "studio", DanglingNull)
            .with_field(Typename::Studio, "parent_studio", DanglingNull)
    }
}
