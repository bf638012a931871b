//! Service layer tests against the scripted mock transport.

use serde_json::{json, Value};

use stash_cache::{EventReport, HookOutcome, MockTransport, ServiceError, StashService, TransportError};
use stash_schema::documents::{FIND_PERFORMERS, FIND_TAGS, STATS};
use stash_schema::{Mutation, ServerEvent, Typename};
use stash_store::{CacheHandle, ObjectRef};

fn tags_page() -> Value {
    json!({"count": 1, "tags": [{"__typename": "Tag", "id": "1", "name": "a", "parents": [], "children": []}]})
}

fn service() -> StashService<MockTransport> {
    let mock = MockTransport::new();
    mock.respond(&FIND_TAGS, None, tags_page());
    mock.respond(&STATS, None, json!({"tag_count": 1}));
    StashService::new(mock, CacheHandle::default())
}

#[test]
fn test_transport_error_leaves_cache_untouched() {
    let mut service = service();
    service.query(&FIND_TAGS, None).unwrap();
    let before = service.cache().extract();

    service.transport().fail_next_mutation("connection reset");
    let err = service
        .mutate(&Mutation::TagDestroy { id: "1".to_string() })
        .unwrap_err();

    assert!(matches!(err, ServiceError::Transport(TransportError::ConnectionFailed(_))));
    assert_eq!(service.cache().extract(), before);
}

#[test]
fn test_unauthorized_mutation_leaves_cache_untouched() {
    let mut service = service();
    service.query(&FIND_TAGS, None).unwrap();
    let before = service.cache().extract();

    service.transport().sign_out();
    let err = service.mutate(&Mutation::TagCreate {}).unwrap_err();

    assert!(matches!(err, ServiceError::Transport(TransportError::Unauthorized)));
    assert_eq!(service.cache().extract(), before);
}

#[test]
fn test_null_result_skips_hook() {
    let mut service = service();
    service.query(&FIND_TAGS, None).unwrap();

    let report = service.mutate(&Mutation::TagDestroy { id: "1".to_string() }).unwrap();

    assert_eq!(report.outcome, HookOutcome::Skipped);
    assert!(report.refetched.is_empty());
    assert!(service.cache().contains(&ObjectRef::new(Typename::Tag, "1")));
}

#[test]
fn test_mutation_refetches_evicted_watches() {
    let mut service = service();
    let (tags, data) = service.watch(&FIND_TAGS, None).unwrap();
    let (stats, _) = service.watch(&STATS, None).unwrap();
    assert_eq!(data["count"], 1);

    service
        .transport()
        .push_mutation_result(json!({"__typename": "Tag", "id": "2", "name": "b"}));
    let report = service.mutate(&Mutation::TagCreate {}).unwrap();

    assert_eq!(report.outcome, HookOutcome::Applied);
    // tag_count was patched in place, so only the tag list went missing
    assert_eq!(report.refetched, vec![tags]);
    assert!(!report.refetched.contains(&stats));
    assert_eq!(service.transport().query_count(&FIND_TAGS), 2);
    assert_eq!(service.transport().query_count(&STATS), 1);
    assert_eq!(service.query(&STATS, None).unwrap()["tag_count"], 2);
}

#[test]
fn test_failed_refetch_reported_stale() {
    // seeded cache, so the watch is served without a transport call
    let mut cache = CacheHandle::default();
    cache.write_query(&FIND_PERFORMERS, None, &json!({"count": 0, "performers": []}));
    let mut service = StashService::new(MockTransport::new(), cache);
    let (id, _) = service.watch(&FIND_PERFORMERS, None).unwrap();

    service
        .transport()
        .push_mutation_result(json!({"__typename": "Performer", "id": "5", "name": "p"}));
    let report = service.mutate(&Mutation::PerformerCreate {}).unwrap();

    assert_eq!(report.outcome, HookOutcome::Applied);
    assert!(report.refetched.is_empty());
    assert_eq!(report.stale, vec![id]);
}

#[test]
fn test_unwatch_stops_refetch() {
    let mut service = service();
    let (id, _) = service.watch(&FIND_TAGS, None).unwrap();
    service.unwatch(id).unwrap();

    service
        .transport()
        .push_mutation_result(json!({"__typename": "Tag", "id": "2", "name": "b"}));
    let report = service.mutate(&Mutation::TagCreate {}).unwrap();

    assert!(report.refetched.is_empty());
    assert_eq!(service.transport().query_count(&FIND_TAGS), 1);
    assert!(service.unwatch(id).is_err());
}

#[test]
fn test_scan_complete_resets_and_refetches() {
    let mut service = service();
    let (id, _) = service.watch(&FIND_TAGS, None).unwrap();
    service
        .cache_mut()
        .write_object(&json!({"__typename": "Scene", "id": "8", "title": "stray"}));

    let job = ServerEvent::JobUpdate {
        job_id: "1".to_string(),
        status: "RUNNING".to_string(),
        progress: None,
    };
    assert_eq!(service.handle_event(&job), EventReport::default());
    assert!(service.cache().contains(&ObjectRef::new(Typename::Scene, "8")));

    let report = service.handle_event(&ServerEvent::ScanComplete);

    assert!(report.reset);
    assert_eq!(report.refetched, vec![id]);
    assert!(report.stale.is_empty());
    assert!(!service.cache().contains(&ObjectRef::new(Typename::Scene, "8")));
    assert!(service.cache().contains(&ObjectRef::new(Typename::Tag, "1")));
    assert_eq!(service.transport().query_count(&FIND_TAGS), 2);
}

#[test]
fn test_scan_complete_keeps_going_after_failed_refetch() {
    let mut service = service();
    // unscripted, so only the seeded cache can answer it
    service
        .cache_mut()
        .write_query(&FIND_PERFORMERS, None, &json!({"count": 0, "performers": []}));
    let (performers, _) = service.watch(&FIND_PERFORMERS, None).unwrap();
    let (tags, _) = service.watch(&FIND_TAGS, None).unwrap();

    let report = service.handle_event(&ServerEvent::ScanComplete);

    assert_eq!(report.stale, vec![performers]);
    assert_eq!(report.refetched, vec![tags]);
    assert!(service.cache().contains(&ObjectRef::new(Typename::Tag, "1")));
}
