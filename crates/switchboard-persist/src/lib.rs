pub mod models;
pub mod trait_client;
pub mod dbs;
pub mod error;
pub mod builder;

pub use models::{Thread, DBMessage, MessageRole};
pub use trait_client::PersistenceClient;
pub use dbs::memory::MemoryPersistenceClient;
#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoPersistenceClient;
pub use error::{PersistError, Result};
pub use builder::{PersistenceBuilder, StorageBackend};
