//! Stash Schema Contracts
//!
//! Typenames, query documents and mutation inputs shared by the normalized
//! store and the cache consistency layer. These mirror the server's GraphQL
//! schema; they are data contracts, not behaviour.

pub mod derived;
pub mod documents;
pub mod error;
pub mod event;
pub mod mutation;
pub mod typename;

pub use derived::{DerivedField, StalePath, DERIVED_FIELDS};
pub use documents::QueryDocument;
pub use error::SchemaError;
pub use event::ServerEvent;
pub use mutation::{EntityFamily, Mutation, MutationFamily, MutationKind, MutationRecord};
pub use typename::{Interface, Typename};
