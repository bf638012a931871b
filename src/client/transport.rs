//! Transport layer for the GraphQL client.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use serde_json::Value;
use stash_schema::{Mutation, QueryDocument};
use stash_store::{base_field_name, store_field_name};

/// Transport trait for server communication
pub trait Transport: Send + Sync {
    /// Run a query and return its `data` payload.
    fn query(&self, doc: &QueryDocument, args: Option<&Value>) -> Result<Value, TransportError>;

    /// Run a mutation and return its result payload (`null` when the server
    /// returned nothing).
    fn mutate(&self, mutation: &Mutation) -> Result<Value, TransportError>;
}

/// Transport errors
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The server answered 401; the caller should send the user to login.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("GraphQL error: {0}")]
    Graphql(String),
}

/// A request seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportCall {
    /// Store field name of the query, e.g. `findScene({"id":"1"})`.
    Query { field: String },
    Mutate { name: &'static str },
}

#[derive(Default)]
struct MockState {
    signed_out: bool,
    responses: HashMap<String, Value>,
    mutation_results: VecDeque<Result<Value, String>>,
    calls: Vec<TransportCall>,
}

/// Mock transport for testing.
///
/// Query responses are keyed by store field name and can be answered any
/// number of times. Mutation results are consumed in order; an empty queue
/// answers `null`.
#[derive(Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // a panicking test thread must not hide the recorded calls
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Script the response for `doc` called with `args`.
    pub fn respond(&self, doc: &QueryDocument, args: Option<&Value>, data: Value) {
        let field = store_field_name(doc.root_field, args);
        self.lock().responses.insert(field, data);
    }

    /// Queue the result of the next mutation.
    pub fn push_mutation_result(&self, result: Value) {
        self.lock().mutation_results.push_back(Ok(result));
    }

    /// Make the next mutation fail with a connection error.
    pub fn fail_next_mutation(&self, message: &str) {
        self.lock().mutation_results.push_back(Err(message.to_string()));
    }

    /// Answer every following call with 401 until signed back in.
    pub fn sign_out(&self) {
        self.lock().signed_out = true;
    }

    pub fn sign_in(&self) {
        self.lock().signed_out = false;
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<TransportCall> {
        self.lock().calls.clone()
    }

    /// How many times `doc` was queried, across all arguments.
    pub fn query_count(&self, doc: &QueryDocument) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| match call {
                TransportCall::Query { field } => base_field_name(field) == doc.root_field,
                TransportCall::Mutate { .. } => false,
            })
            .count()
    }
}

impl Transport for MockTransport {
    fn query(&self, doc: &QueryDocument, args: Option<&Value>) -> Result<Value, TransportError> {
        let field = store_field_name(doc.root_field, args);
        let mut state = self.lock();
        state.calls.push(TransportCall::Query { field: field.clone() });
        if state.signed_out {
            return Err(TransportError::Unauthorized);
        }
        state
            .responses
            .get(&field)
            .cloned()
            .ok_or_else(|| TransportError::Graphql(format!("no response scripted for {}", field)))
    }

    fn mutate(&self, mutation: &Mutation) -> Result<Value, TransportError> {
        let mut state = self.lock();
        state.calls.push(TransportCall::Mutate { name: mutation.name() });
        if state.signed_out {
            return Err(TransportError::Unauthorized);
        }
        match state.mutation_results.pop_front() {
            Some(Ok(result)) => Ok(result),
            Some(Err(message)) => Err(TransportError::ConnectionFailed(message)),
            None => Ok(Value::Null),
        }
    }
}
