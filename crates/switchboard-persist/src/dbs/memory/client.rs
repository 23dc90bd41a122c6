use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::error::{PersistError, Result};
use crate::models::{DBMessage, MessageRole, Thread};
use crate::trait_client::PersistenceClient;

struct ThreadRecord {
    thread: Thread,
    /// Creation order, used to break `updated_at` ties
    seq: u64,
    messages: Vec<DBMessage>,
}

#[derive(Default)]
struct MemoryState {
    threads: HashMap<String, ThreadRecord>,
    next_seq: u64,
    last_timestamp: Option<DateTime<Utc>>,
}

impl MemoryState {
    /// Wall clock, forced strictly increasing so ordering never depends on
    /// clock resolution
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }

    fn user_threads<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a ThreadRecord> + 'a {
        self.threads
            .values()
            .filter(move |record| record.thread.user_id == user_id)
    }
}

/// Process-local store, used for development and tests
///
/// Every write happens under a single lock, so thread creation is
/// check-and-insert atomic and an append updates the message list and the
/// thread timestamp together.
#[derive(Default)]
pub struct MemoryPersistenceClient {
    state: RwLock<MemoryState>,
}

impl MemoryPersistenceClient {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(a: &ThreadRecord, b: &ThreadRecord) -> std::cmp::Ordering {
    b.thread
        .updated_at
        .cmp(&a.thread.updated_at)
        .then_with(|| b.seq.cmp(&a.seq))
}

#[async_trait]
impl PersistenceClient for MemoryPersistenceClient {
    async fn create_thread(
        &self,
        user_id: &str,
        thread_name: &str,
        persona_prompt: &str,
    ) -> Result<Thread> {
        let mut state = self.state.write().await;

        if state
            .user_threads(user_id)
            .any(|record| record.thread.thread_name == thread_name)
        {
            return Err(PersistError::DuplicateThread {
                user_id: user_id.to_string(),
                thread_name: thread_name.to_string(),
            });
        }

        let now = state.tick();
        let seq = state.next_seq;
        state.next_seq += 1;

        let thread = Thread {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            thread_name: thread_name.to_string(),
            persona_prompt: persona_prompt.to_string(),
            created_at: now,
            updated_at: now,
        };

        state.threads.insert(
            thread.id.clone(),
            ThreadRecord {
                thread: thread.clone(),
                seq,
                messages: Vec::new(),
            },
        );

        Ok(thread)
    }

    async fn find_thread(&self, user_id: &str, thread_name: &str) -> Result<Option<Thread>> {
        let state = self.state.read().await;
        let thread = state
            .user_threads(user_id)
            .find(|record| record.thread.thread_name == thread_name)
            .map(|record| record.thread.clone());
        Ok(thread)
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        let state = self.state.read().await;
        let thread = state.threads.get(thread_id).map(|record| record.thread.clone());
        Ok(thread)
    }

    async fn most_recent_thread(&self, user_id: &str) -> Result<Option<Thread>> {
        let state = self.state.read().await;
        let thread = state
            .user_threads(user_id)
            .min_by(|a, b| newest_first(a, b))
            .map(|record| record.thread.clone());
        Ok(thread)
    }

    async fn list_threads(&self, user_id: &str) -> Result<Vec<Thread>> {
        let state = self.state.read().await;
        let mut records: Vec<&ThreadRecord> = state.user_threads(user_id).collect();
        records.sort_by(|a, b| newest_first(a, b));
        let threads = records.into_iter().map(|record| record.thread.clone()).collect();
        Ok(threads)
    }

    async fn append_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<DBMessage> {
        let mut state = self.state.write().await;
        if !state.threads.contains_key(thread_id) {
            return Err(PersistError::ThreadNotFound(thread_id.to_string()));
        }

        let now = state.tick();
        let mut message = DBMessage::new(thread_id, role, content);
        message.created_at = now;

        let record = state
            .threads
            .get_mut(thread_id)
            .ok_or_else(|| PersistError::ThreadNotFound(thread_id.to_string()))?;
        record.messages.push(message.clone());
        record.thread.updated_at = now;

        Ok(message)
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<DBMessage>> {
        let state = self.state.read().await;
        let mut messages = state
            .threads
            .get(thread_id)
            .map(|record| record.messages.clone())
            .unwrap_or_default();
        // Stable sort keeps insertion order for equal timestamps
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }

    async fn delete_thread(&self, thread_id: &str, user_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let owned = state
            .threads
            .get(thread_id)
            .is_some_and(|record| record.thread.user_id == user_id);
        if !owned {
            return Err(PersistError::ThreadNotFound(thread_id.to_string()));
        }
        state.threads.remove(thread_id);
        Ok(())
    }
}
