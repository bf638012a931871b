//! Stash Cache Consistency Layer
//!
//! Keeps a normalized client-side cache coherent with the server after
//! mutations. Each mutation kind has an update hook that patches what it can
//! compute locally and evicts everything else its impact table names, so
//! the next read refetches.
//!
//! - [`evict`]: eviction and patch primitives over a [`CacheHandle`]
//! - [`impact`]: per-family impact tables and the completeness check
//! - [`hooks`]: the update hook for every mutation kind
//! - [`counters`]: O-counter propagation to performers and stats
//! - [`client`]: transport abstraction and the cache-backed service
//! - [`config`]: layered configuration

pub mod client;
pub mod config;
pub mod counters;
pub mod evict;
pub mod hooks;
pub mod impact;

pub use client::{EventReport, MockTransport, MutationReport, ServiceError, StashService, Transport, TransportError, WatchId};
pub use config::{ClientSettings, ConfigError, EffectiveConfig, PlatformUrl};
pub use counters::{patch_o_counter, CounterOp, CounterPatch, CounterTarget};
pub use evict::{EvictOptions, TypeFields};
pub use hooks::{apply_update, apply_update_with, HookOutcome};
pub use impact::{check_completeness, impact_table, ImpactTable, MissingImpact};
pub use stash_store::CacheHandle;
