use mongodb::bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::{DBMessage, MessageRole, Thread as DBThread};

/// MongoDB-specific Thread model (uses ObjectId)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoThread {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: String,
    pub thread_name: String,
    pub persona_prompt: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// MongoDB-specific Message model (uses ObjectId)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMessage {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub thread_id: ObjectId,
    pub role: MessageRole,
    pub content: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

// Conversions from MongoDB-specific to database-agnostic models

impl From<MongoThread> for DBThread {
    fn from(thread: MongoThread) -> Self {
        Self {
            id: thread.id.to_hex(),
            user_id: thread.user_id,
            thread_name: thread.thread_name,
            persona_prompt: thread.persona_prompt,
            created_at: thread.created_at,
            updated_at: thread.updated_at,
        }
    }
}

impl From<MongoMessage> for DBMessage {
    fn from(msg: MongoMessage) -> Self {
        Self {
            id: msg.id.to_hex(),
            thread_id: msg.thread_id.to_hex(),
            role: msg.role,
            content: msg.content,
            created_at: msg.created_at,
        }
    }
}
