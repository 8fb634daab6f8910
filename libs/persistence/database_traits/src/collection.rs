use std::{error::Error as StdError, fmt, sync::Arc};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

pub type BoxedSource = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document not found: {key}")]
    DocumentNotFound { key: String },
    #[error("Document already exists: {key}")]
    DocumentExists { key: String },
    #[error("Document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid keyspace name '{name}': {reason}")]
    InvalidKeyspace { name: String, reason: &'static str },
    #[error("Document store backend error: {0}")]
    Backend(#[source] BoxedSource),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DocumentNotFound { .. })
    }
}

/// Bucket, scope and collection names addressing one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyspace {
    pub bucket: String,
    pub scope: String,
    pub collection: String,
}

impl Keyspace {
    pub fn new(
        bucket: impl Into<String>, scope: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            scope: scope.into(),
            collection: collection.into(),
        }
    }

    /// Names must be non-empty and free of `:`, the separator of stored
    /// keys.
    pub fn validate(&self) -> Result<(), StoreError> {
        for name in [&self.bucket, &self.scope, &self.collection] {
            let reason = if name.is_empty() {
                "must not be empty"
            }
            else if name.contains(':') {
                "must not contain ':'"
            }
            else {
                continue;
            };

            return Err(StoreError::InvalidKeyspace {
                name: name.clone(),
                reason,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Keyspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.bucket, self.scope, self.collection)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub key: String,
    pub content: serde_json::Value,
}

impl Document {
    pub fn new(key: impl Into<String>, content: serde_json::Value) -> Self {
        Self {
            key: key.into(),
            content,
        }
    }

    pub fn from_content<T>(
        key: impl Into<String>, content: &T,
    ) -> Result<Self, StoreError>
    where
        T: Serialize,
    {
        Ok(Self::new(key, serde_json::to_value(content)?))
    }

    pub fn content_as<T>(&self) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        Ok(serde_json::from_value(self.content.clone())?)
    }
}

/// A collection of JSON documents addressed by string keys.
///
/// Every operation is atomic for the single document it touches. Missing
/// keys are reported as [`StoreError::DocumentNotFound`].
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    fn keyspace(&self) -> &Keyspace;

    async fn get(&self, key: &str) -> Result<Document, StoreError>;

    /// Fails with [`StoreError::DocumentExists`] when the key is taken.
    async fn insert(
        &self, key: &str, content: serde_json::Value,
    ) -> Result<(), StoreError>;

    async fn replace(
        &self, key: &str, content: serde_json::Value,
    ) -> Result<(), StoreError>;

    /// Removes the document and hands back what was stored.
    async fn remove(&self, key: &str) -> Result<Document, StoreError>;

    /// Full scan of the collection, in no particular order.
    async fn scan(&self) -> Result<Vec<Document>, StoreError>;

    /// Number of stored documents. Backends override this when they can
    /// count without loading content.
    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.scan().await?.len() as u64)
    }

    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl<T> DocumentCollection for Arc<T>
where
    T: DocumentCollection + ?Sized,
{
    fn keyspace(&self) -> &Keyspace { (**self).keyspace() }

    async fn get(&self, key: &str) -> Result<Document, StoreError> {
        (**self).get(key).await
    }

    async fn insert(
        &self, key: &str, content: serde_json::Value,
    ) -> Result<(), StoreError> {
        (**self).insert(key, content).await
    }

    async fn replace(
        &self, key: &str, content: serde_json::Value,
    ) -> Result<(), StoreError> {
        (**self).replace(key, content).await
    }

    async fn remove(&self, key: &str) -> Result<Document, StoreError> {
        (**self).remove(key).await
    }

    async fn scan(&self) -> Result<Vec<Document>, StoreError> {
        (**self).scan().await
    }

    async fn count(&self) -> Result<u64, StoreError> { (**self).count().await }

    async fn ping(&self) -> Result<(), StoreError> { (**self).ping().await }
}

pub type SharedCollection = Arc<dyn DocumentCollection>;
