mod db_message;
mod db_thread;

// Database-agnostic models
pub use db_message::{DBMessage, MessageRole};
pub use db_thread::Thread;
