use std::sync::Arc;

use switchboard_persist::{PersistenceClient, Thread};
use switchboard_types::{Binding, ChatTurn, HistoryMessage, ThreadHistory, UserHistory};
use tracing::{error, info, warn};

use crate::assembler::ConversationAssembler;
use crate::builder::ChatAgentBuilder;
use crate::error::{ChatError, Result};
use crate::router::{RouteRequest, ThreadRouter};

/// Entry point for chat turns and history reads
///
/// Holds no conversation state of its own; share it behind an `Arc`.
pub struct ChatAgent {
    router: ThreadRouter,
    assembler: ConversationAssembler,
    store: Arc<dyn PersistenceClient>,
}

impl ChatAgent {
    pub(crate) fn new(
        router: ThreadRouter,
        assembler: ConversationAssembler,
        store: Arc<dyn PersistenceClient>,
    ) -> Self {
        Self {
            router,
            assembler,
            store,
        }
    }

    pub fn builder() -> ChatAgentBuilder {
        ChatAgentBuilder::new()
    }

    pub fn router(&self) -> &ThreadRouter {
        &self.router
    }

    pub fn store(&self) -> Arc<dyn PersistenceClient> {
        Arc::clone(&self.store)
    }

    /// One turn without a carried binding
    ///
    /// Persona-free messages land on the user's most recent thread.
    pub async fn chat(
        &self,
        user_id: &str,
        message: &str,
        thread_name: Option<&str>,
    ) -> Result<ChatTurn> {
        self.chat_with_binding(user_id, message, thread_name, None)
            .await
    }

    /// One turn, staying on `current` unless the message names or implies
    /// another thread
    pub async fn chat_with_binding(
        &self,
        user_id: &str,
        message: &str,
        thread_name: Option<&str>,
        current: Option<&Binding>,
    ) -> Result<ChatTurn> {
        let user_id = require("user_id", user_id)?;
        require("message", message)?;

        let request = RouteRequest::new(user_id, message)
            .thread_name(thread_name)
            .current(current);
        let binding = self.router.route(request).await.inspect_err(|e| {
            error!(user_id = %user_id, category = %e.category(), error = %e, "Routing failed");
        })?;

        let response = self
            .assembler
            .turn(&binding.thread_id, &binding.persona_prompt, message)
            .await
            .inspect_err(|e| {
                error!(
                    user_id = %user_id,
                    thread_id = %binding.thread_id,
                    category = %e.category(),
                    error = %e,
                    "Chat turn failed"
                );
            })?;

        info!(
            user_id = %user_id,
            thread_id = %binding.thread_id,
            thread_name = %binding.thread_name,
            "Chat turn completed"
        );

        Ok(ChatTurn::new(binding, response))
    }

    /// All threads of a user with their messages, keyed by thread name
    pub async fn history(&self, user_id: &str) -> Result<UserHistory> {
        let user_id = require("user_id", user_id)?;

        let mut history = UserHistory::new();
        for thread in self.store.list_threads(user_id).await? {
            let entry = self.thread_history(thread).await?;
            history.insert(entry.thread_name.clone(), entry);
        }

        Ok(history)
    }

    /// A single thread by id
    pub async fn thread(&self, thread_id: &str) -> Result<ThreadHistory> {
        let thread_id = require("thread_id", thread_id)?;

        let thread = self
            .store
            .get_thread(thread_id)
            .await?
            .ok_or_else(|| ChatError::NotFound(thread_id.to_string()))?;

        self.thread_history(thread).await
    }

    async fn thread_history(&self, thread: Thread) -> Result<ThreadHistory> {
        let messages = self
            .store
            .list_messages(&thread.id)
            .await?
            .into_iter()
            .map(HistoryMessage::from)
            .collect();

        Ok(ThreadHistory {
            thread_id: thread.id,
            thread_name: thread.thread_name,
            persona_prompt: thread.persona_prompt,
            created_at: thread.created_at,
            updated_at: thread.updated_at,
            messages,
        })
    }
}

/// Reject blank input before anything touches storage
fn require<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        warn!(field = field, "Rejected blank input");
        return Err(ChatError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_trims() {
        assert_eq!(require("user_id", "  alice ").unwrap(), "alice");
    }

    #[test]
    fn test_require_rejects_blank() {
        let err = require("message", " \n\t").unwrap_err();
        assert!(matches!(err, ChatError::InvalidInput(ref m) if m.contains("message")));
    }
}
