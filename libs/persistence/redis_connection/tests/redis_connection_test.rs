use database_traits::{DocumentCollection, Keyspace, StoreError};
use redis_connection::{
    RedisCollection,
    config::{DbConnectConfig, RedisDbConfig},
};
use serde_json::json;
use test_utils::TestRedisContainer;

async fn setup_collection()
-> anyhow::Result<(TestRedisContainer, RedisCollection)> {
    let container = TestRedisContainer::new().await?;
    let keyspace =
        Keyspace::new(container.test_bucket.clone(), "_default", "users");
    let collection = RedisCollection::new(container.pool.clone(), keyspace)?;
    Ok((container, collection))
}

#[tokio::test]
async fn test_redis_db_config_from_json() {
    let json = r#"{
        "host": "redis.example.com",
        "port": 6380,
        "db": 1,
        "password": "hunter2"
    }"#;

    let config: RedisDbConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.host(), "redis.example.com");
    assert_eq!(config.port(), 6380);
    assert_eq!(config.db(), 1);
    assert_eq!(config.password(), Some("hunter2"));
}

#[tokio::test]
async fn test_redis_db_config_default_values() {
    let config = RedisDbConfig::default();

    assert_eq!(config.host(), "127.0.0.1");
    assert_eq!(config.port(), 6379);
    assert_eq!(config.db(), 0);
    assert_eq!(config.password(), None);
}

#[test]
fn test_redis_db_config_from_lookup() {
    let config = RedisDbConfig::from_lookup(|name| {
        match name {
            "REDIS_HOST" => Some("cache.internal".to_string()),
            "REDIS_PORT" => Some("not-a-port".to_string()),
            "REDIS_DB" => Some("3".to_string()),
            "REDIS_PASSWORD" => Some(String::new()),
            _ => None,
        }
    });

    assert_eq!(config.host(), "cache.internal");
    assert_eq!(config.port(), 6379);
    assert_eq!(config.db(), 3);
    assert_eq!(config.password(), None);
}

#[tokio::test]
#[ignore = "requires Docker for the Redis test container"]
async fn test_ping() {
    let (_container, collection) = setup_collection().await.unwrap();
    collection.ping().await.unwrap();
}

#[tokio::test]
#[ignore = "requires Docker for the Redis test container"]
async fn test_document_lifecycle() {
    let (_container, collection) = setup_collection().await.unwrap();

    collection
        .insert("u1", json!({"id": "u1", "name": "Alice"}))
        .await
        .unwrap();
    let doc = collection.get("u1").await.unwrap();
    assert_eq!(doc.key, "u1");
    assert_eq!(doc.content["name"], "Alice");

    let duplicate = collection.insert("u1", json!({})).await;
    assert!(matches!(duplicate, Err(StoreError::DocumentExists { .. })));

    collection
        .replace("u1", json!({"id": "u1", "name": "Bob"}))
        .await
        .unwrap();
    assert_eq!(collection.get("u1").await.unwrap().content["name"], "Bob");

    let removed = collection.remove("u1").await.unwrap();
    assert_eq!(removed.content["name"], "Bob");
    assert!(collection.get("u1").await.unwrap_err().is_not_found());
}

#[tokio::test]
#[ignore = "requires Docker for the Redis test container"]
async fn test_missing_keys_report_not_found() {
    let (_container, collection) = setup_collection().await.unwrap();

    assert!(collection.get("nope").await.unwrap_err().is_not_found());
    assert!(
        collection
            .replace("nope", json!({}))
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(collection.remove("nope").await.unwrap_err().is_not_found());
}

#[tokio::test]
#[ignore = "requires Docker for the Redis test container"]
async fn test_scan_only_sees_own_collection() {
    let (container, collection) = setup_collection().await.unwrap();
    let other = RedisCollection::new(
        container.pool.clone(),
        Keyspace::new(container.test_bucket.clone(), "_default", "other"),
    )
    .unwrap();

    for i in 0..250 {
        collection
            .insert(&format!("u{i}"), json!({"n": i}))
            .await
            .unwrap();
    }
    other.insert("x", json!({"n": -1})).await.unwrap();

    let documents = collection.scan().await.unwrap();
    assert_eq!(documents.len(), 250);
    assert!(documents.iter().all(|doc| doc.key.starts_with('u')));

    assert_eq!(other.scan().await.unwrap().len(), 1);
    assert_eq!(collection.count().await.unwrap(), 250);
    assert_eq!(other.count().await.unwrap(), 1);
}
