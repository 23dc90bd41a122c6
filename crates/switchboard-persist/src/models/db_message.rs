use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use switchboard_types::HistoryMessage;

pub use switchboard_types::MessageRole;

/// Database-agnostic message model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DBMessage {
    pub id: String,
    pub thread_id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl DBMessage {
    pub fn new(thread_id: impl Into<String>, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            thread_id: thread_id.into(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

// Conversion: DBMessage → switchboard_llm::Message
impl From<DBMessage> for switchboard_llm::Message {
    fn from(msg: DBMessage) -> Self {
        match msg.role {
            MessageRole::User => switchboard_llm::Message::human(msg.content),
            MessageRole::Assistant => switchboard_llm::Message::ai(msg.content),
        }
    }
}

impl From<DBMessage> for HistoryMessage {
    fn from(msg: DBMessage) -> Self {
        Self {
            role: msg.role,
            content: msg.content,
            timestamp: msg.created_at,
        }
    }
}
