mod common;

use std::sync::Arc;

use switchboard_agent::{
    Binding, PatternExtractor, PersonaCatalog, RouteRequest, ThreadRouter, BASE_PROMPT,
};
use switchboard_agent::{ChatError, ErrorCategory};
use switchboard_persist::{MemoryPersistenceClient, PersistenceClient};

use common::FailingStore;

fn router_over(store: Arc<dyn PersistenceClient>) -> ThreadRouter {
    ThreadRouter::new(store, Arc::new(PatternExtractor::new()), PersonaCatalog::default())
}

#[tokio::test]
async fn test_explicit_name_creates_with_base_prompt() {
    let store = Arc::new(MemoryPersistenceClient::new());
    let router = router_over(store.clone());

    let binding = router
        .route(RouteRequest::new("alice", "act like my investor").thread_name(Some("mentor")))
        .await
        .unwrap();

    assert_eq!(binding.thread_name, "mentor");
    // Explicit names never consult the catalog
    assert_eq!(binding.persona_prompt, BASE_PROMPT);
    assert!(store.find_thread("alice", "investor").await.unwrap().is_none());
}

#[tokio::test]
async fn test_explicit_name_reuses_stored_prompt() {
    let store = Arc::new(MemoryPersistenceClient::new());
    let existing = store.create_thread("alice", "Work Stuff", "custom prompt").await.unwrap();
    let router = router_over(store.clone());

    let binding = router
        .route(RouteRequest::new("alice", "hi").thread_name(Some("Work Stuff")))
        .await
        .unwrap();

    assert_eq!(binding.thread_id, existing.id);
    assert_eq!(binding.persona_prompt, "custom prompt");
}

#[tokio::test]
async fn test_persona_creates_normalized_thread_with_template() {
    let store = Arc::new(MemoryPersistenceClient::new());
    let router = router_over(store.clone());

    let binding = router
        .route(RouteRequest::new("alice", "Act like my Mentor"))
        .await
        .unwrap();

    assert_eq!(binding.thread_name, "mentor");
    assert_eq!(
        binding.persona_prompt,
        PersonaCatalog::default().resolve_prompt("mentor", None)
    );
    assert_eq!(store.list_threads("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_persona_gets_generic_prompt() {
    let store = Arc::new(MemoryPersistenceClient::new());
    let router = router_over(store);

    let binding = router
        .route(RouteRequest::new("alice", "be a skeptic"))
        .await
        .unwrap();

    assert_eq!(binding.thread_name, "skeptic");
    assert!(binding.persona_prompt.contains("acting as a skeptic"));
}

#[tokio::test]
async fn test_persona_switches_to_existing_thread() {
    let store = Arc::new(MemoryPersistenceClient::new());
    let mentor = store.create_thread("alice", "mentor", "old mentor prompt").await.unwrap();
    store.create_thread("alice", "investor", "investor prompt").await.unwrap();
    let router = router_over(store.clone());

    let binding = router
        .route(RouteRequest::new("alice", "back to my mentor"))
        .await
        .unwrap();

    assert_eq!(binding.thread_id, mentor.id);
    assert_eq!(binding.persona_prompt, "old mentor prompt");
    assert_eq!(store.list_threads("alice").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_first_contact_creates_default() {
    let store = Arc::new(MemoryPersistenceClient::new());
    let router = router_over(store.clone());

    let binding = router.route(RouteRequest::new("alice", "hello")).await.unwrap();

    assert_eq!(binding.thread_name, "default");
    assert_eq!(binding.persona_prompt, BASE_PROMPT);
    assert_eq!(store.list_threads("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_most_recent_fallback() {
    let store = Arc::new(MemoryPersistenceClient::new());
    let older = store.create_thread("alice", "mentor", "m").await.unwrap();
    let newer = store.create_thread("alice", "investor", "i").await.unwrap();
    let router = router_over(store.clone());

    let binding = router.route(RouteRequest::new("alice", "hello")).await.unwrap();
    assert_eq!(binding.thread_id, newer.id);

    // Activity on the older thread makes it the most recent
    store
        .append_message(&older.id, switchboard_persist::MessageRole::User, "ping")
        .await
        .unwrap();
    let binding = router.route(RouteRequest::new("alice", "hello")).await.unwrap();
    assert_eq!(binding.thread_id, older.id);
}

#[tokio::test]
async fn test_keep_current_stays_on_bound_thread() {
    let store = Arc::new(MemoryPersistenceClient::new());
    let older = store.create_thread("alice", "mentor", "mentor prompt").await.unwrap();
    store.create_thread("alice", "investor", "i").await.unwrap();
    let router = router_over(store.clone());
    let current = Binding::new(&older.id, "mentor", "mentor prompt");

    let binding = router
        .route(RouteRequest::new("alice", "tell me more").current(Some(&current)))
        .await
        .unwrap();

    // Newer thread exists, but the bound one wins
    assert_eq!(binding, current);
    assert_eq!(store.list_threads("alice").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_foreign_binding_is_not_honored() {
    let store = Arc::new(MemoryPersistenceClient::new());
    let alice_thread = store.create_thread("alice", "mentor", "secret prompt").await.unwrap();
    let router = router_over(store.clone());
    let stolen = Binding::new(&alice_thread.id, "mentor", "secret prompt");

    let binding = router
        .route(RouteRequest::new("bob", "tell me more").current(Some(&stolen)))
        .await
        .unwrap();

    assert_ne!(binding.thread_id, alice_thread.id);
    assert_eq!(binding.thread_name, "default");
    assert_eq!(binding.persona_prompt, BASE_PROMPT);
    let bob_threads = store.list_threads("bob").await.unwrap();
    assert_eq!(bob_threads.len(), 1);
    assert_eq!(bob_threads[0].id, binding.thread_id);
}

#[tokio::test]
async fn test_stale_binding_falls_back_to_most_recent() {
    let store = Arc::new(MemoryPersistenceClient::new());
    let doomed = store.create_thread("alice", "mentor", "m").await.unwrap();
    let survivor = store.create_thread("alice", "coach", "c").await.unwrap();
    let router = router_over(store.clone());
    let current = Binding::new(&doomed.id, "mentor", "m");

    store.delete_thread(&doomed.id, "alice").await.unwrap();
    let binding = router
        .route(RouteRequest::new("alice", "still there?").current(Some(&current)))
        .await
        .unwrap();

    assert_eq!(binding.thread_id, survivor.id);
}

#[tokio::test]
async fn test_stale_binding_with_no_threads_creates_default() {
    let store = Arc::new(MemoryPersistenceClient::new());
    let router = router_over(store.clone());
    let current = Binding::new("gone", "mentor", "m");

    let binding = router
        .route(RouteRequest::new("alice", "hello").current(Some(&current)))
        .await
        .unwrap();

    assert_eq!(binding.thread_name, "default");
    assert_eq!(store.list_threads("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_keep_current_read_failure_propagates() {
    let router = router_over(Arc::new(FailingStore::failing_reads()));
    let current = Binding::new("t-1", "mentor", "prompt");

    let err = router
        .route(RouteRequest::new("alice", "tell me more").current(Some(&current)))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Storage);
}

#[tokio::test]
async fn test_routing_is_deterministic() {
    let store = Arc::new(MemoryPersistenceClient::new());
    store.create_thread("alice", "mentor", "m").await.unwrap();
    store.create_thread("alice", "coach", "c").await.unwrap();
    let router = router_over(store);

    for text in ["hello", "act like my mentor", "switch to the coach"] {
        let first = router.route(RouteRequest::new("alice", text)).await.unwrap();
        let second = router.route(RouteRequest::new("alice", text)).await.unwrap();
        assert_eq!(first, second, "routing differed for {text:?}");
    }
}

#[tokio::test]
async fn test_concurrent_persona_creation_converges() {
    let store = Arc::new(MemoryPersistenceClient::new());
    let router = Arc::new(router_over(store.clone()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let router = Arc::clone(&router);
        handles.push(tokio::spawn(async move {
            router.route(RouteRequest::new("alice", "act like my coach")).await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().thread_id);
    }
    ids.dedup();
    assert_eq!(ids.len(), 1);
    assert_eq!(store.list_threads("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_storage_failure_propagates() {
    let router = router_over(Arc::new(FailingStore::failing_create()));

    let err = router.route(RouteRequest::new("alice", "hello")).await.unwrap_err();

    assert!(matches!(err, ChatError::Storage(_)));
    assert_eq!(err.category(), ErrorCategory::Storage);
}
