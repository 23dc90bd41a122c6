use mongodb::{Client, Collection, IndexModel, bson::doc, bson::oid::ObjectId};
use futures::TryStreamExt;

use crate::dbs::mongo::models::MongoMessage;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoMessageRepository {
    collection: Collection<MongoMessage>,
}

impl MongoMessageRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("messages");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> Result<()> {
        let by_thread = IndexModel::builder()
            .keys(doc! { "thread_id": 1, "created_at": 1, "_id": 1 })
            .build();
        self.collection.create_index(by_thread).await?;
        Ok(())
    }

    /// Save a single message
    pub async fn save_message(&self, message: &MongoMessage) -> Result<ObjectId> {
        self.collection.insert_one(message).await?;
        Ok(message.id)
    }

    /// Get all messages for a thread, oldest first
    pub async fn get_messages(&self, thread_id: ObjectId) -> Result<Vec<MongoMessage>> {
        let filter = doc! { "thread_id": thread_id };
        let messages = self.collection
            .find(filter)
            .sort(doc! { "created_at": 1, "_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(messages)
    }

    /// Remove a single message
    pub async fn delete_message(&self, message_id: ObjectId) -> Result<()> {
        self.collection.delete_one(doc! { "_id": message_id }).await?;
        Ok(())
    }

    /// Remove every message of a thread
    pub async fn delete_for_thread(&self, thread_id: ObjectId) -> Result<u64> {
        let result = self.collection.delete_many(doc! { "thread_id": thread_id }).await?;
        Ok(result.deleted_count)
    }
}
