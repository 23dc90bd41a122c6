use std::sync::Arc;

use switchboard_persist::{MemoryPersistenceClient, MessageRole, PersistError, PersistenceClient};

#[tokio::test]
async fn test_create_and_find_thread() {
    let store = MemoryPersistenceClient::new();
    let created = store.create_thread("alice", "mentor", "You are a mentor").await.unwrap();

    let found = store.find_thread("alice", "mentor").await.unwrap().unwrap();
    assert_eq!(found, created);
    assert_eq!(found.created_at, found.updated_at);

    assert!(store.find_thread("bob", "mentor").await.unwrap().is_none());
    assert_eq!(store.get_thread(&created.id).await.unwrap(), Some(created));
}

#[tokio::test]
async fn test_duplicate_thread_rejected() {
    let store = MemoryPersistenceClient::new();
    store.create_thread("alice", "mentor", "first").await.unwrap();

    let err = store.create_thread("alice", "mentor", "second").await.unwrap_err();
    assert!(matches!(err, PersistError::DuplicateThread { .. }));

    // Same name for another user is fine
    store.create_thread("bob", "mentor", "first").await.unwrap();
}

#[tokio::test]
async fn test_concurrent_creation_yields_one_thread() {
    let store = Arc::new(MemoryPersistenceClient::new());
    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.create_thread("alice", "investor", "prompt").await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(PersistError::DuplicateThread { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(store.list_threads("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_append_bumps_updated_at_and_recency() {
    let store = MemoryPersistenceClient::new();
    let mentor = store.create_thread("alice", "mentor", "m").await.unwrap();
    let investor = store.create_thread("alice", "investor", "i").await.unwrap();

    let recent = store.most_recent_thread("alice").await.unwrap().unwrap();
    assert_eq!(recent.id, investor.id);

    let message = store.append_message(&mentor.id, MessageRole::User, "hello").await.unwrap();
    let mentor_after = store.get_thread(&mentor.id).await.unwrap().unwrap();
    assert_eq!(mentor_after.updated_at, message.created_at);
    assert!(mentor_after.updated_at > mentor.updated_at);

    let recent = store.most_recent_thread("alice").await.unwrap().unwrap();
    assert_eq!(recent.id, mentor.id);

    let listed: Vec<String> = store
        .list_threads("alice")
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.thread_name)
        .collect();
    assert_eq!(listed, vec!["mentor", "investor"]);
}

#[tokio::test]
async fn test_most_recent_for_unknown_user_is_none() {
    let store = MemoryPersistenceClient::new();
    assert!(store.most_recent_thread("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_messages_come_back_in_insertion_order() {
    let store = MemoryPersistenceClient::new();
    let thread = store.create_thread("alice", "default", "base").await.unwrap();

    for i in 0..5 {
        store.append_message(&thread.id, MessageRole::User, &format!("q{i}")).await.unwrap();
        store.append_message(&thread.id, MessageRole::Assistant, &format!("a{i}")).await.unwrap();
    }

    let messages = store.list_messages(&thread.id).await.unwrap();
    assert_eq!(messages.len(), 10);
    assert!(messages.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    assert_eq!(messages[0].content, "q0");
    assert_eq!(messages[1].role, MessageRole::Assistant);
    assert_eq!(messages[9].content, "a4");
}

#[tokio::test]
async fn test_delete_thread_cascades_to_messages() {
    let store = MemoryPersistenceClient::new();
    let thread = store.create_thread("alice", "coach", "c").await.unwrap();
    store.append_message(&thread.id, MessageRole::User, "hi").await.unwrap();

    // Only the owner may delete
    assert!(store.delete_thread(&thread.id, "mallory").await.is_err());

    store.delete_thread(&thread.id, "alice").await.unwrap();
    assert!(store.get_thread(&thread.id).await.unwrap().is_none());
    assert!(store.list_messages(&thread.id).await.unwrap().is_empty());

    // The name is free again
    store.create_thread("alice", "coach", "c2").await.unwrap();
}
