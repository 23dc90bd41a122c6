use std::sync::Arc;

use switchboard_types::{Binding, ChatTurn};

use crate::agent::ChatAgent;
use crate::error::Result;

/// One user's conversation carrying its binding between turns
///
/// Persona-free follow-ups stay on the thread the previous turn landed on
/// instead of falling back to the most recently updated one.
pub struct Session {
    agent: Arc<ChatAgent>,
    user_id: String,
    binding: Option<Binding>,
}

impl Session {
    pub fn new(agent: Arc<ChatAgent>, user_id: impl Into<String>) -> Self {
        Self {
            agent,
            user_id: user_id.into(),
            binding: None,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    pub async fn send(&mut self, message: &str) -> Result<ChatTurn> {
        self.dispatch(message, None).await
    }

    /// Send to a named thread; later `send` calls stay there
    pub async fn send_to(&mut self, thread_name: &str, message: &str) -> Result<ChatTurn> {
        self.dispatch(message, Some(thread_name)).await
    }

    /// Forget the binding; the next turn routes as a first contact
    pub fn reset(&mut self) {
        self.binding = None;
    }

    async fn dispatch(&mut self, message: &str, thread_name: Option<&str>) -> Result<ChatTurn> {
        let turn = self
            .agent
            .chat_with_binding(&self.user_id, message, thread_name, self.binding.as_ref())
            .await?;
        self.binding = Some(turn.binding());
        Ok(turn)
    }
}
