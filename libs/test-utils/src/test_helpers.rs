use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use database_traits::{
    Document, DocumentCollection, Keyspace, SharedCollection, StoreError,
};
use memory_connection::MemoryCollection;
use serde_json::json;
use uuid::Uuid;

pub const TEST_BUCKET: &str = "training-bucket";
pub const TEST_SCOPE: &str = "_default";
pub const TEST_USERS_COLLECTION: &str = "users";

pub fn users_keyspace() -> Keyspace {
    Keyspace::new(TEST_BUCKET, TEST_SCOPE, TEST_USERS_COLLECTION)
}

/// Empty in-memory users collection
pub fn memory_users_collection() -> Arc<MemoryCollection> {
    Arc::new(MemoryCollection::new(users_keyspace()))
}

pub fn shared_memory_collection() -> SharedCollection {
    memory_users_collection()
}

/// Store a user document directly, bypassing the DAO, and return its id
pub async fn create_test_user_with_name(
    collection: &dyn DocumentCollection, name: &str,
) -> Result<String> {
    let user_id = Uuid::new_v4().to_string();
    collection
        .insert(&user_id, json!({ "id": user_id, "name": name }))
        .await?;
    Ok(user_id)
}

/// Create a test user named 'Test User'
pub async fn create_test_user(
    collection: &dyn DocumentCollection,
) -> Result<String> {
    create_test_user_with_name(collection, "Test User").await
}

/// Create three users named user_1..user_3 and return their ids
pub async fn create_test_users(
    collection: &dyn DocumentCollection,
) -> Result<Vec<String>> {
    let mut ids = Vec::with_capacity(3);
    for i in 1..=3 {
        ids.push(
            create_test_user_with_name(collection, &format!("user_{i}"))
                .await?,
        );
    }
    Ok(ids)
}

/// Random identifier that is guaranteed not to be stored
pub fn missing_user_id() -> String { Uuid::new_v4().to_string() }

/// Collection whose every call fails like a dropped connection
pub struct UnavailableCollection {
    keyspace: Keyspace,
}

impl UnavailableCollection {
    fn error() -> StoreError {
        StoreError::backend(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "document store unavailable",
        ))
    }
}

#[async_trait]
impl DocumentCollection for UnavailableCollection {
    fn keyspace(&self) -> &Keyspace { &self.keyspace }

    async fn get(&self, _key: &str) -> Result<Document, StoreError> {
        Err(Self::error())
    }

    async fn insert(
        &self, _key: &str, _content: serde_json::Value,
    ) -> Result<(), StoreError> {
        Err(Self::error())
    }

    async fn replace(
        &self, _key: &str, _content: serde_json::Value,
    ) -> Result<(), StoreError> {
        Err(Self::error())
    }

    async fn remove(&self, _key: &str) -> Result<Document, StoreError> {
        Err(Self::error())
    }

    async fn scan(&self) -> Result<Vec<Document>, StoreError> {
        Err(Self::error())
    }

    async fn ping(&self) -> Result<(), StoreError> { Err(Self::error()) }
}

pub fn unavailable_collection() -> SharedCollection {
    Arc::new(UnavailableCollection {
        keyspace: users_keyspace(),
    })
}
