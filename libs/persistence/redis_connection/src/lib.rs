use deadpool_redis::{Config, CreatePoolError, Pool, Runtime};
pub use deadpool_redis::{Pool as RedisPool, PoolError};
pub use deadpool_redis::redis::RedisError;
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

pub mod collection;
pub mod config;

pub use collection::RedisCollection;

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("Invalid Redis URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Redis URL cannot carry credentials")]
    InvalidCredentials,
    #[error("Failed to create Redis pool: {0}")]
    CreatePool(#[from] CreatePoolError),
}

pub fn redis_url<C>(config: &C) -> Result<Url, ConnectError>
where
    C: config::DbConnectConfig,
{
    let mut url = Url::parse(&format!(
        "redis://{}:{}/{}",
        config.host(),
        config.port(),
        config.db()
    ))?;

    if let Some(password) = config.password() {
        url.set_password(Some(password))
            .map_err(|_| ConnectError::InvalidCredentials)?;
    }

    Ok(url)
}

/// Builds the connection pool. Connections are opened lazily on first use.
#[instrument(skip_all, name = "connect-redis")]
pub async fn connect_redis_db<C>(config: &C) -> Result<Pool, ConnectError>
where
    C: config::DbConnectConfig,
{
    let url = redis_url(config)?;

    info!(
        redis.host = config.host(),
        redis.port = config.port(),
        redis.db = config.db(),
        redis.connect = true
    );

    let cfg = Config {
        url: Some(url.to_string()),
        pool: Some(deadpool_redis::PoolConfig::default()),
        connection: None,
    };

    let pool = cfg.create_pool(Some(Runtime::Tokio1))?;
    Ok(pool)
}
