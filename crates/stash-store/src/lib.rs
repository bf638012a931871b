//! Stash Normalized Store
//!
//! An in-memory cache keyed by object identity rather than by query shape.
//! Every object with a `__typename` and an `id` is stored once under its
//! cache id (`Scene:12`) and referenced from query results as
//! `{"__ref": "Scene:12"}`.
//!
//! ## Layout
//!
//! - `ROOT_QUERY` holds root fields keyed by store field name
//!   (`findScene({"id":"12"})`, `stats`)
//! - every other entry is a normalized object
//! - a typename index maps each [`Typename`](stash_schema::Typename) to the
//!   cache ids currently resident, so type-wide eviction never scans the
//!   whole store
//!
//! ## Reads
//!
//! Each root field remembers the shape of the data last written to it. A
//! read walks that shape and reports [`ReadOutcome::Missing`] as soon as a
//! field has been evicted, which is what tells the caller to refetch.

mod error;
mod fragment;
mod gc;
mod policy;
mod reference;
mod shape;
mod snapshot;
mod store;

pub use error::{StoreError, StoreResult};
pub use fragment::{Fragment, SLIM_IMAGE_DATA, SLIM_SCENE_DATA};
pub use gc::GcResult;
pub use policy::{FieldPolicy, TypePolicies};
pub use reference::{base_field_name, reference, reference_id, store_field_name, ObjectRef, ROOT_QUERY};
pub use shape::Shape;
pub use snapshot::Snapshot;
pub use store::{CacheHandle, FieldUpdate, ReadOutcome, StoreObject};
