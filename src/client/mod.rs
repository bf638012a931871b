//! Service Layer
//!
//! Sits between call-sites and the server. Provides:
//! - Transport trait: how queries and mutations reach the server
//! - MockTransport: scripted in-process server for tests and offline replay
//! - StashService: cache-first reads, mutations with their update hooks,
//!   watched queries and server events

pub mod service;
pub mod transport;

pub use service::{EventReport, MutationReport, ServiceError, StashService, WatchId};
pub use transport::{MockTransport, Transport, TransportCall, TransportError};
