use mongodb::{Client, bson::oid::ObjectId};
use async_trait::async_trait;
use chrono::Utc;

use crate::trait_client::PersistenceClient;
use crate::models::{DBMessage, MessageRole, Thread};
use crate::dbs::mongo::models::MongoMessage;
use crate::dbs::mongo::repositories::{MongoMessageRepository, MongoThreadRepository};
use crate::error::{Result, PersistError};

pub struct MongoPersistenceClient {
    message_repo: MongoMessageRepository,
    thread_repo: MongoThreadRepository,
}

impl MongoPersistenceClient {
    /// Connect to MongoDB, create client and make sure indexes exist
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        let message_repo = MongoMessageRepository::new(&client, database);
        let thread_repo = MongoThreadRepository::new(&client, database);

        thread_repo.ensure_indexes().await?;
        message_repo.ensure_indexes().await?;

        tracing::info!(database = %database, "MongoDB persistence ready");

        Ok(Self {
            message_repo,
            thread_repo,
        })
    }
}

fn parse_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|e| PersistError::InvalidObjectId(e.to_string()))
}

#[async_trait]
impl PersistenceClient for MongoPersistenceClient {
    async fn create_thread(
        &self,
        user_id: &str,
        thread_name: &str,
        persona_prompt: &str,
    ) -> Result<Thread> {
        let thread = self.thread_repo.create_thread(user_id, thread_name, persona_prompt).await?;
        Ok(thread.into())
    }

    async fn find_thread(&self, user_id: &str, thread_name: &str) -> Result<Option<Thread>> {
        let thread = self.thread_repo.find_thread(user_id, thread_name).await?;
        Ok(thread.map(|t| t.into()))
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        // A malformed id cannot name an existing thread
        let Ok(object_id) = parse_id(thread_id) else {
            return Ok(None);
        };
        let thread = self.thread_repo.get_thread(object_id).await?;
        Ok(thread.map(|t| t.into()))
    }

    async fn most_recent_thread(&self, user_id: &str) -> Result<Option<Thread>> {
        let thread = self.thread_repo.most_recent_thread(user_id).await?;
        Ok(thread.map(|t| t.into()))
    }

    async fn list_threads(&self, user_id: &str) -> Result<Vec<Thread>> {
        let threads = self.thread_repo.list_threads(user_id).await?;
        Ok(threads.into_iter().map(|t| t.into()).collect())
    }

    async fn append_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<DBMessage> {
        let thread_object_id = parse_id(thread_id)?;
        if self.thread_repo.get_thread(thread_object_id).await?.is_none() {
            return Err(PersistError::ThreadNotFound(thread_id.to_string()));
        }

        let message = MongoMessage {
            id: ObjectId::new(),
            thread_id: thread_object_id,
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.message_repo.save_message(&message).await?;

        // Undo the insert if the thread timestamp cannot follow it
        let touched = self.thread_repo.touch_thread(thread_object_id, message.created_at).await;
        match touched {
            Ok(true) => Ok(message.into()),
            Ok(false) => {
                self.message_repo.delete_message(message.id).await?;
                Err(PersistError::ThreadNotFound(thread_id.to_string()))
            }
            Err(e) => {
                if let Err(undo) = self.message_repo.delete_message(message.id).await {
                    tracing::error!(
                        thread_id = %thread_id,
                        message_id = %message.id,
                        "Failed to remove message after timestamp update failed: {}",
                        undo
                    );
                }
                Err(e)
            }
        }
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<DBMessage>> {
        let object_id = parse_id(thread_id)?;
        let messages = self.message_repo.get_messages(object_id).await?;
        Ok(messages.into_iter().map(|m| m.into()).collect())
    }

    async fn delete_thread(&self, thread_id: &str, user_id: &str) -> Result<()> {
        let object_id = parse_id(thread_id)?;
        if !self.thread_repo.delete_thread(object_id, user_id).await? {
            return Err(PersistError::ThreadNotFound(thread_id.to_string()));
        }
        let removed = self.message_repo.delete_for_thread(object_id).await?;
        tracing::info!(thread_id = %thread_id, messages = removed, "Deleted thread");
        Ok(())
    }
}
