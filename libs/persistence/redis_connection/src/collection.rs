use async_trait::async_trait;
use database_traits::{Document, DocumentCollection, Keyspace, StoreError};
use deadpool_redis::{Connection, Pool, redis::cmd};
use tracing::{debug, instrument};

const SCAN_BATCH: usize = 100;

/// Document collection stored as JSON strings under
/// `{bucket}:{scope}:{collection}:{key}`.
#[derive(Clone)]
pub struct RedisCollection {
    pool: Pool,
    keyspace: Keyspace,
    prefix: String,
}

impl RedisCollection {
    /// Fails when a keyspace name would break the key layout.
    pub fn new(pool: Pool, keyspace: Keyspace) -> Result<Self, StoreError> {
        keyspace.validate()?;

        let prefix = format!(
            "{}:{}:{}:",
            keyspace.bucket, keyspace.scope, keyspace.collection
        );

        Ok(Self {
            pool,
            keyspace,
            prefix,
        })
    }

    pub fn prefix(&self) -> &str { &self.prefix }

    pub fn document_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// `SCAN MATCH` pattern covering the collection, with glob
    /// metacharacters of the prefix escaped.
    pub fn match_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.prefix.len() + 1);
        for ch in self.prefix.chars() {
            if matches!(ch, '*' | '?' | '[' | ']' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('*');
        pattern
    }

    async fn connection(&self) -> Result<Connection, StoreError> {
        self.pool.get().await.map_err(StoreError::backend)
    }

    fn decode(&self, key: &str, raw: &[u8]) -> Result<Document, StoreError> {
        Ok(Document::new(key, serde_json::from_slice(raw)?))
    }

    /// Every stored key of the collection. `SCAN` may repeat keys, so the
    /// result is deduplicated.
    async fn scan_keys(
        &self, conn: &mut Connection,
    ) -> Result<Vec<String>, StoreError> {
        let pattern = self.match_pattern();
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) = cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(conn)
                .await
                .map_err(StoreError::backend)?;

            keys.extend(batch);

            if next == 0 {
                break;
            }
            cursor = next;
        }

        keys.sort_unstable();
        keys.dedup();
        Ok(keys)
    }
}

#[async_trait]
impl DocumentCollection for RedisCollection {
    fn keyspace(&self) -> &Keyspace { &self.keyspace }

    #[instrument(skip(self), fields(keyspace = %self.keyspace))]
    async fn get(&self, key: &str) -> Result<Document, StoreError> {
        let mut conn = self.connection().await?;
        let raw: Option<Vec<u8>> = cmd("GET")
            .arg(self.document_key(key))
            .query_async(&mut conn)
            .await
            .map_err(StoreError::backend)?;

        match raw {
            Some(raw) => self.decode(key, &raw),
            None => {
                Err(StoreError::DocumentNotFound {
                    key: key.to_string(),
                })
            }
        }
    }

    #[instrument(skip(self, content), fields(keyspace = %self.keyspace))]
    async fn insert(
        &self, key: &str, content: serde_json::Value,
    ) -> Result<(), StoreError> {
        let payload = serde_json::to_vec(&content)?;
        let mut conn = self.connection().await?;
        let stored: Option<String> = cmd("SET")
            .arg(self.document_key(key))
            .arg(payload)
            .arg("NX")
            .query_async(&mut conn)
            .await
            .map_err(StoreError::backend)?;

        stored.map(|_| ()).ok_or_else(|| {
            StoreError::DocumentExists {
                key: key.to_string(),
            }
        })
    }

    #[instrument(skip(self, content), fields(keyspace = %self.keyspace))]
    async fn replace(
        &self, key: &str, content: serde_json::Value,
    ) -> Result<(), StoreError> {
        let payload = serde_json::to_vec(&content)?;
        let mut conn = self.connection().await?;
        let stored: Option<String> = cmd("SET")
            .arg(self.document_key(key))
            .arg(payload)
            .arg("XX")
            .query_async(&mut conn)
            .await
            .map_err(StoreError::backend)?;

        stored.map(|_| ()).ok_or_else(|| {
            StoreError::DocumentNotFound {
                key: key.to_string(),
            }
        })
    }

    #[instrument(skip(self), fields(keyspace = %self.keyspace))]
    async fn remove(&self, key: &str) -> Result<Document, StoreError> {
        let mut conn = self.connection().await?;
        let raw: Option<Vec<u8>> = cmd("GETDEL")
            .arg(self.document_key(key))
            .query_async(&mut conn)
            .await
            .map_err(StoreError::backend)?;

        match raw {
            Some(raw) => self.decode(key, &raw),
            None => {
                Err(StoreError::DocumentNotFound {
                    key: key.to_string(),
                })
            }
        }
    }

    #[instrument(skip(self), fields(keyspace = %self.keyspace))]
    async fn scan(&self) -> Result<Vec<Document>, StoreError> {
        let mut conn = self.connection().await?;
        let keys = self.scan_keys(&mut conn).await?;
        let mut documents = Vec::with_capacity(keys.len());

        for chunk in keys.chunks(SCAN_BATCH) {
            let values: Vec<Option<Vec<u8>>> = cmd("MGET")
                .arg(chunk)
                .query_async(&mut conn)
                .await
                .map_err(StoreError::backend)?;

            // A key removed between SCAN and MGET comes back as nil.
            for (full_key, raw) in chunk.iter().zip(values) {
                if let (Some(key), Some(raw)) =
                    (full_key.strip_prefix(&self.prefix), raw)
                {
                    documents.push(self.decode(key, &raw)?);
                }
            }
        }

        debug!(count = documents.len(), "Scanned collection");
        Ok(documents)
    }

    #[instrument(skip(self), fields(keyspace = %self.keyspace))]
    async fn count(&self) -> Result<u64, StoreError> {
        let mut conn = self.connection().await?;
        let keys = self.scan_keys(&mut conn).await?;
        Ok(keys.len() as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(StoreError::backend)?;
        Ok(())
    }
}
