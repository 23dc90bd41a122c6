use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a persisted message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The thread a message was routed to, with the prompt that governs replies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub thread_id: String,
    pub thread_name: String,
    pub persona_prompt: String,
}

impl Binding {
    pub fn new(
        thread_id: impl Into<String>,
        thread_name: impl Into<String>,
        persona_prompt: impl Into<String>,
    ) -> Self {
        Self {
            thread_id: thread_id.into(),
            thread_name: thread_name.into(),
            persona_prompt: persona_prompt.into(),
        }
    }
}

/// Outcome of one chat turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub response: String,
    pub thread_name: String,
    pub thread_id: String,
    pub persona_prompt: String,
}

impl ChatTurn {
    pub fn new(binding: Binding, response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            thread_name: binding.thread_name,
            thread_id: binding.thread_id,
            persona_prompt: binding.persona_prompt,
        }
    }

    /// The binding this turn landed on, for carrying into the next turn
    pub fn binding(&self) -> Binding {
        Binding::new(&self.thread_id, &self.thread_name, &self.persona_prompt)
    }
}
