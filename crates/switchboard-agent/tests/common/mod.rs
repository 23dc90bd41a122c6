#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::bail;
use async_trait::async_trait;
use switchboard_agent::{ChatAgent, PersonaCatalog};
use switchboard_llm::{ChatClient, ChatRequest, ChatResponse};
use switchboard_persist::{
    DBMessage, MemoryPersistenceClient, MessageRole, PersistError, PersistenceClient, Thread,
};

/// Replies "reply N" (1-based) and records every request
#[derive(Default)]
pub struct RecordingClient {
    requests: Mutex<Vec<ChatRequest>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ChatRequest {
        self.requests().pop().expect("no request recorded")
    }
}

#[async_trait]
impl ChatClient for RecordingClient {
    async fn chat(&self, request: ChatRequest) -> anyhow::Result<ChatResponse> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request);
        Ok(ChatResponse::text(format!("reply {}", requests.len())))
    }
}

/// Always fails
pub struct FailingClient;

#[async_trait]
impl ChatClient for FailingClient {
    async fn chat(&self, _request: ChatRequest) -> anyhow::Result<ChatResponse> {
        bail!("upstream unavailable")
    }
}

/// Answers with whitespace only
pub struct BlankClient;

#[async_trait]
impl ChatClient for BlankClient {
    async fn chat(&self, _request: ChatRequest) -> anyhow::Result<ChatResponse> {
        Ok(ChatResponse::text("   "))
    }
}

/// Never answers
pub struct StalledClient;

#[async_trait]
impl ChatClient for StalledClient {
    async fn chat(&self, _request: ChatRequest) -> anyhow::Result<ChatResponse> {
        std::future::pending().await
    }
}

/// In-memory store that can be told to fail specific writes
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryPersistenceClient,
    /// 1-based index of the append that fails
    fail_append_at: Option<usize>,
    fail_create: bool,
    fail_reads: bool,
    appends: AtomicUsize,
}

impl FailingStore {
    pub fn failing_append(n: usize) -> Self {
        Self {
            fail_append_at: Some(n),
            ..Self::default()
        }
    }

    pub fn failing_create() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn inner(&self) -> &MemoryPersistenceClient {
        &self.inner
    }

    fn read_guard(&self) -> Result<(), PersistError> {
        if self.fail_reads {
            return Err(PersistError::Connection("store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PersistenceClient for FailingStore {
    async fn create_thread(
        &self,
        user_id: &str,
        thread_name: &str,
        persona_prompt: &str,
    ) -> Result<Thread, PersistError> {
        if self.fail_create {
            return Err(PersistError::Connection("insert refused".into()));
        }
        self.inner.create_thread(user_id, thread_name, persona_prompt).await
    }

    async fn find_thread(&self, user_id: &str, thread_name: &str) -> Result<Option<Thread>, PersistError> {
        self.read_guard()?;
        self.inner.find_thread(user_id, thread_name).await
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Option<Thread>, PersistError> {
        self.read_guard()?;
        self.inner.get_thread(thread_id).await
    }

    async fn most_recent_thread(&self, user_id: &str) -> Result<Option<Thread>, PersistError> {
        self.read_guard()?;
        self.inner.most_recent_thread(user_id).await
    }

    async fn list_threads(&self, user_id: &str) -> Result<Vec<Thread>, PersistError> {
        self.read_guard()?;
        self.inner.list_threads(user_id).await
    }

    async fn append_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<DBMessage, PersistError> {
        let n = self.appends.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_append_at == Some(n) {
            return Err(PersistError::Connection("write timed out".into()));
        }
        self.inner.append_message(thread_id, role, content).await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<DBMessage>, PersistError> {
        self.read_guard()?;
        self.inner.list_messages(thread_id).await
    }

    async fn delete_thread(&self, thread_id: &str, user_id: &str) -> Result<(), PersistError> {
        self.inner.delete_thread(thread_id, user_id).await
    }
}

pub fn agent_with(store: Arc<dyn PersistenceClient>, client: Arc<dyn ChatClient>) -> ChatAgent {
    ChatAgent::builder()
        .store(store)
        .chat_client(client)
        .build()
        .expect("agent builds")
}

pub fn agent_with_catalog(
    store: Arc<dyn PersistenceClient>,
    client: Arc<dyn ChatClient>,
    catalog: PersonaCatalog,
) -> ChatAgent {
    ChatAgent::builder()
        .store(store)
        .chat_client(client)
        .catalog(catalog)
        .build()
        .expect("agent builds")
}
