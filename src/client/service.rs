//! The client service: one cache, one transport, hooks after every
//! successful mutation.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use stash_schema::{Mutation, QueryDocument, ServerEvent};
use stash_store::{CacheHandle, ReadOutcome};
use thiserror::Error;
use tracing::{debug, warn};

use super::transport::{Transport, TransportError};
use crate::evict::EvictOptions;
use crate::hooks::{self, HookOutcome};

/// Errors from service calls.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("unknown watch {0}")]
    UnknownWatch(WatchId),
}

/// Handle of a watched query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WatchId(u64);

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Watch {
    doc: QueryDocument,
    args: Option<Value>,
}

/// What a mutation did to the cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationReport {
    pub outcome: HookOutcome,
    /// Watches whose query went missing and was fetched again.
    pub refetched: Vec<WatchId>,
    /// Watches whose refetch failed; they stay missing until the next read.
    pub stale: Vec<WatchId>,
}

/// What a server event did to the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventReport {
    pub reset: bool,
    pub refetched: Vec<WatchId>,
    pub stale: Vec<WatchId>,
}

/// Cache-backed GraphQL client.
pub struct StashService<T: Transport> {
    transport: T,
    cache: CacheHandle,
    options: EvictOptions,
    watches: BTreeMap<WatchId, Watch>,
    next_watch: u64,
}

impl<T: Transport> StashService<T> {
    pub fn new(transport: T, cache: CacheHandle) -> Self {
        Self {
            transport,
            cache,
            options: EvictOptions::default(),
            watches: BTreeMap::new(),
            next_watch: 1,
        }
    }

    pub fn with_options(mut self, options: EvictOptions) -> Self {
        self.options = options;
        self
    }

    pub fn cache(&self) -> &CacheHandle {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut CacheHandle {
        &mut self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Read from the cache, fetching only when the query is missing.
    pub fn query(&mut self, doc: &QueryDocument, args: Option<&Value>) -> Result<Value, ServiceError> {
        match self.cache.read_query(doc, args) {
            ReadOutcome::Hit(data) => Ok(data),
            ReadOutcome::Missing => self.fetch(doc, args),
        }
    }

    /// Always ask the server. The result still lands in the cache.
    pub fn query_network_only(
        &mut self,
        doc: &QueryDocument,
        args: Option<&Value>,
    ) -> Result<Value, ServiceError> {
        self.fetch(doc, args)
    }

    fn fetch(&mut self, doc: &QueryDocument, args: Option<&Value>) -> Result<Value, ServiceError> {
        debug!(query = doc.name, "fetching");
        let data = self.transport.query(doc, args)?;
        self.cache.write_query(doc, args, &data);
        Ok(data)
    }

    /// Watch a query. The current result is loaded (fetching if needed) and
    /// kept fresh after every mutation.
    pub fn watch(&mut self, doc: &QueryDocument, args: Option<Value>) -> Result<(WatchId, Value), ServiceError> {
        let data = self.query(doc, args.as_ref())?;
        let id = WatchId(self.next_watch);
        self.next_watch += 1;
        self.watches.insert(id, Watch { doc: *doc, args });
        Ok((id, data))
    }

    pub fn unwatch(&mut self, id: WatchId) -> Result<(), ServiceError> {
        self.watches.remove(&id).map(|_| ()).ok_or(ServiceError::UnknownWatch(id))
    }

    /// Send a mutation, then run its update hook. A transport error leaves
    /// the cache untouched.
    pub fn mutate(&mut self, mutation: &Mutation) -> Result<MutationReport, ServiceError> {
        let result = self.transport.mutate(mutation).map_err(|err| {
            if matches!(err, TransportError::Unauthorized) {
                warn!(mutation = mutation.name(), "session expired, login required");
            }
            err
        })?;
        let payload = (!result.is_null()).then_some(&result);
        let outcome = hooks::apply_update_with(&mut self.cache, mutation, payload, self.options);

        let (refetched, stale) = self.refresh_watches();
        Ok(MutationReport {
            outcome,
            refetched,
            stale,
        })
    }

    /// Apply a server-pushed event. Scan completion drops the whole cache and
    /// refetches every watch; a failed refetch is reported, not fatal.
    pub fn handle_event(&mut self, event: &ServerEvent) -> EventReport {
        if !event.resets_cache() {
            return EventReport::default();
        }
        debug!(watches = self.watches.len(), "scan complete, resetting cache");
        self.cache.reset();

        let (refetched, stale) = self.refresh_watches();
        EventReport {
            reset: true,
            refetched,
            stale,
        }
    }

    fn refresh_watches(&mut self) -> (Vec<WatchId>, Vec<WatchId>) {
        let mut refetched = Vec::new();
        let mut stale = Vec::new();

        let missing: Vec<(WatchId, Watch)> = self
            .watches
            .iter()
            .filter(|(_, w)| self.cache.read_query(&w.doc, w.args.as_ref()).is_missing())
            .map(|(id, w)| (*id, w.clone()))
            .collect();

        for (id, watch) in missing {
            match self.fetch(&watch.doc, watch.args.as_ref()) {
                Ok(_) => refetched.push(id),
                Err(err) => {
                    warn!(watch = %id, query = watch.doc.name, error = %err, "refetch failed");
                    stale.push(id);
                }
            }
        }
        (refetched, stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTransport;
    use serde_json::json;
    use stash_schema::documents::FIND_TAGS;

    fn tags() -> Value {
        json!({"count": 1, "tags": [{"__typename": "Tag", "id": "1", "name": "a"}]})
    }

    #[test]
    fn test_query_is_cache_first() {
        let mock = MockTransport::new();
        mock.respond(&FIND_TAGS, None, tags());
        let mut service = StashService::new(mock, CacheHandle::default());

        service.query(&FIND_TAGS, None).unwrap();
        service.query(&FIND_TAGS, None).unwrap();
        assert_eq!(service.transport().query_count(&FIND_TAGS), 1);

        service.query_network_only(&FIND_TAGS, None).unwrap();
        assert_eq!(service.transport().query_count(&FIND_TAGS), 2);
    }

    #[test]
    fn test_unwatch_unknown() {
        let mut service = StashService::new(MockTransport::new(), CacheHandle::default());
        assert!(matches!(
            service.unwatch(WatchId(9)),
            Err(ServiceError::UnknownWatch(WatchId(9)))
        ));
    }
}
