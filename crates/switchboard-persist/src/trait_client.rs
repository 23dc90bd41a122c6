use async_trait::async_trait;
use crate::models::{DBMessage, MessageRole, Thread};
use crate::error::Result;

/// Trait for thread and message storage
///
/// Implementations must reject a second thread with the same
/// `(user_id, thread_name)` with [`PersistError::DuplicateThread`], return
/// messages in non-decreasing timestamp order (ties in insertion order), and
/// never leave a half-applied append behind.
///
/// [`PersistError::DuplicateThread`]: crate::PersistError::DuplicateThread
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Create a new thread
    async fn create_thread(
        &self,
        user_id: &str,
        thread_name: &str,
        persona_prompt: &str,
    ) -> Result<Thread>;

    /// Find a thread by its owner and name
    async fn find_thread(&self, user_id: &str, thread_name: &str) -> Result<Option<Thread>>;

    /// Get a thread by ID
    async fn get_thread(&self, thread_id: &str) -> Result<Option<Thread>>;

    /// Most recently updated thread of a user; ties go to the later-created thread
    async fn most_recent_thread(&self, user_id: &str) -> Result<Option<Thread>>;

    /// List threads for a user, most recently updated first
    async fn list_threads(&self, user_id: &str) -> Result<Vec<Thread>>;

    /// Append a message and bump the owning thread's `updated_at`
    async fn append_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<DBMessage>;

    /// All messages of a thread in chronological order
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<DBMessage>>;

    /// Delete a thread and its messages
    async fn delete_thread(&self, thread_id: &str, user_id: &str) -> Result<()>;
}
