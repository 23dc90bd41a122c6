use std::sync::Arc;
use std::time::Duration;

use switchboard_llm::{ChatClient, ChatOptions, ChatRequest, Message};
use switchboard_persist::{DBMessage, MessageRole, PersistenceClient};
use switchboard_types::LLMConfig;
use tracing::{debug, error};

use crate::error::{ChatError, Result};

/// Builds model context from stored history, calls the model and records
/// the exchange
///
/// Nothing is cached between turns: history is read back from the store on
/// every call.
pub struct ConversationAssembler {
    store: Arc<dyn PersistenceClient>,
    client: Arc<dyn ChatClient>,
    llm_config: LLMConfig,
    timeout: Option<Duration>,
}

impl ConversationAssembler {
    pub fn new(
        store: Arc<dyn PersistenceClient>,
        client: Arc<dyn ChatClient>,
        llm_config: LLMConfig,
    ) -> Self {
        Self {
            store,
            client,
            llm_config,
            timeout: None,
        }
    }

    /// Bound each completion call; an elapsed deadline is a generation fault
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn llm_config(&self) -> &LLMConfig {
        &self.llm_config
    }

    /// System entry, then history in order, then the new user message
    pub fn build_context(
        persona_prompt: &str,
        history: Vec<DBMessage>,
        new_text: &str,
    ) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(persona_prompt));
        messages.extend(history.into_iter().map(Message::from));
        messages.push(Message::human(new_text));
        messages
    }

    /// One full turn on an already-routed thread
    ///
    /// Persists only after a successful reply. A failed completion leaves
    /// the thread untouched.
    pub async fn turn(&self, thread_id: &str, persona_prompt: &str, text: &str) -> Result<String> {
        let history = self.store.list_messages(thread_id).await?;
        debug!(thread_id = %thread_id, history_len = history.len(), "Assembling context");

        let context = Self::build_context(persona_prompt, history, text);
        let reply = self.generate(context).await.map_err(|e| {
            error!(thread_id = %thread_id, error = %e, "Completion failed");
            e
        })?;

        self.record(thread_id, text, &reply).await?;
        Ok(reply)
    }

    async fn generate(&self, messages: Vec<Message>) -> Result<String> {
        let mut options = ChatOptions::new();
        if let Some(temp) = self.llm_config.temperature {
            options = options.temperature(temp);
        }
        if let Some(max_tokens) = self.llm_config.max_tokens {
            options = options.max_tokens(max_tokens);
        }

        let request = ChatRequest::new(self.llm_config.model.clone(), messages).with_options(options);

        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.client.chat(request))
                .await
                .map_err(|_| {
                    ChatError::Generation(format!("Completion timed out after {}s", limit.as_secs_f32()))
                })?,
            None => self.client.chat(request).await,
        }
        .map_err(ChatError::generation)?;

        match response.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ChatError::Generation("Model returned an empty reply".to_string())),
        }
    }

    /// Append the user message, then the assistant message
    ///
    /// If the second append fails the user message stays behind as an
    /// orphan; it is logged for reconciliation and the turn fails.
    async fn record(&self, thread_id: &str, user_text: &str, reply: &str) -> Result<()> {
        let user_message = self
            .store
            .append_message(thread_id, MessageRole::User, user_text)
            .await?;

        if let Err(e) = self
            .store
            .append_message(thread_id, MessageRole::Assistant, reply)
            .await
        {
            error!(
                thread_id = %thread_id,
                message_id = %user_message.id,
                error = %e,
                "Assistant message not stored; user message left orphaned"
            );
            return Err(e.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stored(role: MessageRole, content: &str) -> DBMessage {
        DBMessage {
            id: content.to_string(),
            thread_id: "t1".to_string(),
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_context_order() {
        let history = vec![
            stored(MessageRole::User, "first"),
            stored(MessageRole::Assistant, "reply"),
        ];
        let context = ConversationAssembler::build_context("persona", history, "second");

        assert_eq!(context.len(), 4);
        assert_eq!(context[0], Message::system("persona"));
        assert_eq!(context[1], Message::human("first"));
        assert_eq!(context[2], Message::ai("reply"));
        assert_eq!(context[3], Message::human("second"));
    }

    #[test]
    fn test_context_without_history() {
        let context = ConversationAssembler::build_context("persona", Vec::new(), "hi");
        let roles: Vec<_> = context.iter().map(|m| m.role()).collect();
        assert_eq!(roles, vec!["system", "user"]);
    }
}
