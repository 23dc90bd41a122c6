use mongodb::{Client, Collection, IndexModel, bson, bson::doc, bson::oid::ObjectId};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use futures::TryStreamExt;
use chrono::{DateTime, Utc};

use crate::dbs::mongo::models::MongoThread;
use crate::error::{PersistError, Result};

const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoThreadRepository {
    collection: Collection<MongoThread>,
}

impl MongoThreadRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("threads");
        Self { collection }
    }

    /// Create indexes; the unique `(user_id, thread_name)` index is what
    /// prevents concurrent duplicate creation
    pub async fn ensure_indexes(&self) -> Result<()> {
        let unique_name = IndexModel::builder()
            .keys(doc! { "user_id": 1, "thread_name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let recency = IndexModel::builder()
            .keys(doc! { "user_id": 1, "updated_at": -1, "_id": -1 })
            .build();

        self.collection.create_indexes([unique_name, recency]).await?;
        Ok(())
    }

    /// Create a new thread
    pub async fn create_thread(
        &self,
        user_id: &str,
        thread_name: &str,
        persona_prompt: &str,
    ) -> Result<MongoThread> {
        let now = Utc::now();
        let thread = MongoThread {
            id: ObjectId::new(),
            user_id: user_id.to_string(),
            thread_name: thread_name.to_string(),
            persona_prompt: persona_prompt.to_string(),
            created_at: now,
            updated_at: now,
        };

        match self.collection.insert_one(&thread).await {
            Ok(_) => Ok(thread),
            Err(e) if is_duplicate_key(&e) => Err(PersistError::DuplicateThread {
                user_id: user_id.to_string(),
                thread_name: thread_name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Get thread by ID
    pub async fn get_thread(&self, thread_id: ObjectId) -> Result<Option<MongoThread>> {
        let filter = doc! { "_id": thread_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Get thread by owner and name
    pub async fn find_thread(&self, user_id: &str, thread_name: &str) -> Result<Option<MongoThread>> {
        let filter = doc! { "user_id": user_id, "thread_name": thread_name };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Most recently updated thread, newest ObjectId first on ties
    pub async fn most_recent_thread(&self, user_id: &str) -> Result<Option<MongoThread>> {
        let filter = doc! { "user_id": user_id };
        let mut cursor = self.collection
            .find(filter)
            .sort(doc! { "updated_at": -1, "_id": -1 })
            .limit(1)
            .await?;
        Ok(cursor.try_next().await?)
    }

    /// List threads for a user
    pub async fn list_threads(&self, user_id: &str) -> Result<Vec<MongoThread>> {
        let filter = doc! { "user_id": user_id };
        let threads = self.collection
            .find(filter)
            .sort(doc! { "updated_at": -1, "_id": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(threads)
    }

    /// Touch thread (update updated_at); returns whether the thread exists
    pub async fn touch_thread(&self, thread_id: ObjectId, at: DateTime<Utc>) -> Result<bool> {
        let filter = doc! { "_id": thread_id };
        let update = doc! { "$set": { "updated_at": bson::DateTime::from_chrono(at) } };
        let result = self.collection.update_one(filter, update).await?;
        Ok(result.matched_count > 0)
    }

    /// Delete thread
    pub async fn delete_thread(&self, thread_id: ObjectId, user_id: &str) -> Result<bool> {
        let filter = doc! { "_id": thread_id, "user_id": user_id };
        let result = self.collection.delete_one(filter).await?;
        Ok(result.deleted_count > 0)
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) if write_error.code == DUPLICATE_KEY
    )
}
