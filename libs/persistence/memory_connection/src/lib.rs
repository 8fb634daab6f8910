use std::collections::{HashMap, hash_map::Entry};

use async_trait::async_trait;
use database_traits::{Document, DocumentCollection, Keyspace, StoreError};
use tokio::sync::RwLock;
use tracing::instrument;

/// In-process document collection used for local runs and tests.
#[derive(Debug)]
pub struct MemoryCollection {
    keyspace: Keyspace,
    documents: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemoryCollection {
    pub fn new(keyspace: Keyspace) -> Self {
        Self {
            keyspace,
            documents: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize { self.documents.read().await.len() }

    pub async fn is_empty(&self) -> bool { self.len().await == 0 }

    pub async fn clear(&self) { self.documents.write().await.clear(); }
}

fn not_found(key: &str) -> StoreError {
    StoreError::DocumentNotFound {
        key: key.to_string(),
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    fn keyspace(&self) -> &Keyspace { &self.keyspace }

    #[instrument(skip(self), fields(keyspace = %self.keyspace))]
    async fn get(&self, key: &str) -> Result<Document, StoreError> {
        let documents = self.documents.read().await;
        documents
            .get(key)
            .map(|content| Document::new(key, content.clone()))
            .ok_or_else(|| not_found(key))
    }

    #[instrument(skip(self, content), fields(keyspace = %self.keyspace))]
    async fn insert(
        &self, key: &str, content: serde_json::Value,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        match documents.entry(key.to_string()) {
            Entry::Occupied(_) => {
                Err(StoreError::DocumentExists {
                    key: key.to_string(),
                })
            }
            Entry::Vacant(slot) => {
                slot.insert(content);
                Ok(())
            }
        }
    }

    #[instrument(skip(self, content), fields(keyspace = %self.keyspace))]
    async fn replace(
        &self, key: &str, content: serde_json::Value,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        let stored = documents.get_mut(key).ok_or_else(|| not_found(key))?;
        *stored = content;
        Ok(())
    }

    #[instrument(skip(self), fields(keyspace = %self.keyspace))]
    async fn remove(&self, key: &str) -> Result<Document, StoreError> {
        let mut documents = self.documents.write().await;
        documents
            .remove(key)
            .map(|content| Document::new(key, content))
            .ok_or_else(|| not_found(key))
    }

    #[instrument(skip(self), fields(keyspace = %self.keyspace))]
    async fn scan(&self) -> Result<Vec<Document>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .map(|(key, content)| Document::new(key.clone(), content.clone()))
            .collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.len().await as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> { Ok(()) }
}
