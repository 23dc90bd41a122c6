use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::binding::MessageRole;

/// One message as returned by history reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A thread with its ordered messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadHistory {
    pub thread_id: String,
    pub thread_name: String,
    pub persona_prompt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<HistoryMessage>,
}

/// Every thread of a user keyed by thread name. Ordered so repeated reads
/// serialize identically.
pub type UserHistory = BTreeMap<String, ThreadHistory>;
