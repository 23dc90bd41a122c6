use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Database-agnostic thread model
///
/// `(user_id, thread_name)` is unique. The persona prompt is fixed when the
/// thread is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub user_id: String,
    pub thread_name: String,
    pub persona_prompt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
