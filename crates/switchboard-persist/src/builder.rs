use std::sync::Arc;

use crate::dbs::memory::MemoryPersistenceClient;
use crate::error::{PersistError, Result};
use crate::trait_client::PersistenceClient;

/// Which storage implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Memory,
    MongoDb,
}

impl std::str::FromStr for StorageBackend {
    type Err = PersistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "mongodb" | "mongo" => Ok(Self::MongoDb),
            other => Err(PersistError::Internal(format!("Unknown storage backend: {}", other))),
        }
    }
}

pub struct PersistenceBuilder {
    backend: StorageBackend,
    mongodb_uri: Option<String>,
    database: Option<String>,
}

impl PersistenceBuilder {
    pub fn new() -> Self {
        Self {
            backend: StorageBackend::Memory,
            mongodb_uri: None,
            database: None,
        }
    }

    pub fn backend(mut self, backend: StorageBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn mongodb_uri(mut self, uri: impl Into<String>) -> Self {
        self.mongodb_uri = Some(uri.into());
        self
    }

    pub fn database(mut self, db: impl Into<String>) -> Self {
        self.database = Some(db.into());
        self
    }

    pub async fn build(self) -> Result<Arc<dyn PersistenceClient>> {
        match self.backend {
            StorageBackend::Memory => Ok(Arc::new(MemoryPersistenceClient::new())),
            StorageBackend::MongoDb => self.build_mongo().await,
        }
    }

    #[cfg(feature = "mongodb")]
    async fn build_mongo(self) -> Result<Arc<dyn PersistenceClient>> {
        let mongodb_uri = self.mongodb_uri
            .filter(|uri| !uri.trim().is_empty())
            .ok_or_else(|| PersistError::Internal("mongodb_uri is required".to_string()))?;
        let database = self.database
            .ok_or_else(|| PersistError::Internal("database is required".to_string()))?;

        let client = crate::dbs::mongo::MongoPersistenceClient::connect(&mongodb_uri, &database).await?;
        Ok(Arc::new(client))
    }

    #[cfg(not(feature = "mongodb"))]
    async fn build_mongo(self) -> Result<Arc<dyn PersistenceClient>> {
        Err(PersistError::Internal(
            "MongoDB backend requested but the `mongodb` feature is disabled".to_string(),
        ))
    }
}

impl Default for PersistenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
