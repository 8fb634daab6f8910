use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use database_traits::{
    DocumentCollection, Keyspace, SharedCollection, dao::GenericDao,
};
use memory_connection::MemoryCollection;
use redis_connection::{
    RedisCollection, config::RedisDbConfig, connect_redis_db,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use user_dao::UserDao;
use user_http::{UserHandlers, UserServices};
use user_validation::ValidationService;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => anyhow::bail!("Unknown STORE_BACKEND '{other}'"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub redis: RedisDbConfig,
    pub keyspace: Keyspace,
    pub ready_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP literal or hostname, resolved when the listener binds.
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source; unset or
    /// unparsable numeric values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let host = var("SERVER_HOST", "0.0.0.0").trim().to_string();
        let port: u16 = var("SERVER_PORT", "8880").parse().unwrap_or(8880);

        let redis = RedisDbConfig::from_lookup(&lookup);

        let keyspace = Keyspace::new(
            var("STORE_BUCKET", "training-bucket"),
            var("STORE_SCOPE", "_default"),
            var("STORE_USERS_COLLECTION", "users"),
        );
        keyspace.validate()?;

        let store = StoreConfig {
            backend: StoreBackend::parse(&var("STORE_BACKEND", "redis"))?,
            redis,
            keyspace,
            ready_timeout: Duration::from_secs(
                var("STORE_READY_TIMEOUT_SECS", "60").parse().unwrap_or(60),
            ),
        };

        Ok(Self { host, port, store })
    }
}

pub async fn build_collection(
    config: &StoreConfig,
) -> anyhow::Result<SharedCollection> {
    let collection: SharedCollection = match config.backend {
        StoreBackend::Redis => {
            let pool = connect_redis_db(&config.redis).await?;
            info!(
                "Redis connection pool initialized for {}:{}",
                config.redis.host, config.redis.port
            );
            Arc::new(RedisCollection::new(pool, config.keyspace.clone())?)
        }
        StoreBackend::Memory => {
            warn!("Using in-memory document store; data is not persisted");
            Arc::new(MemoryCollection::new(config.keyspace.clone()))
        }
    };

    Ok(collection)
}

/// Pings the store until it answers or `timeout` elapses.
pub async fn wait_until_ready(
    collection: &dyn DocumentCollection, timeout: Duration,
) -> anyhow::Result<()> {
    let started = tokio::time::Instant::now();
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match collection.ping().await {
            Ok(()) => {
                info!(
                    "Document store {} ready after {} attempt(s)",
                    collection.keyspace(),
                    attempt
                );
                return Ok(());
            }
            Err(e) if started.elapsed() < timeout => {
                warn!("Document store not ready (attempt {attempt}): {e}");
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
            Err(e) => {
                anyhow::bail!(
                    "Document store {} not ready after {:?}: {e}",
                    collection.keyspace(),
                    timeout
                );
            }
        }
    }
}

#[derive(Clone)]
pub struct HealthState {
    collection: SharedCollection,
    user_dao: UserDao,
}

impl HealthState {
    pub fn new(collection: SharedCollection) -> Self {
        Self {
            user_dao: UserDao::new(collection.clone()),
            collection,
        }
    }
}

pub fn build_app(collection: SharedCollection) -> Router {
    let user_services =
        UserServices::new(collection.clone(), ValidationService::default());

    let api_routes = UserHandlers::routes().with_state(user_services);

    let app = Router::new()
        .route("/health", get(health_check))
        .with_state(HealthState::new(collection))
        .merge(api_routes);

    app.merge(RapiDoc::new("/api-docs/openapi.json").path("/docs"))
        .route(
            "/api-docs/openapi.json",
            get(|| async { axum::Json(ApiDoc::openapi()) }),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            warn!("Received terminate signal, initiating graceful shutdown...");
        },
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        user_http::create_user,
        user_http::update_user,
        user_http::delete_user,
        user_http::get_user,
        user_http::list_users,
    ),
    components(
        schemas(
            user_responses::UserResponse,
            user_responses::CreateUserResponse,
            user_responses::UpdateUserResponse,
            user_responses::DeleteUserResponse,
            user_commands::CreateUserCommand,
            user_commands::UpdateUserCommand,
            common_errors::ProblemDetails,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User management endpoints"),
    ),
    info(
        title = "User API",
        description = "User CRUD API backed by a document store",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Document store reachable", body = String),
        (status = 503, description = "Document store unreachable", body = String)
    ),
    tag = "health"
)]
pub async fn health_check(
    State(state): State<HealthState>,
) -> impl IntoResponse {
    let keyspace = state.collection.keyspace().to_string();

    if let Err(e) = state.collection.ping().await {
        warn!("Health check failed: {e}");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("UNAVAILABLE - Store {keyspace}: {e}"),
        );
    }

    match state.user_dao.count().await {
        Ok(users) => {
            (
                StatusCode::OK,
                format!("OK - Store {keyspace}: {users} users"),
            )
        }
        Err(e) => {
            warn!("Health check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("UNAVAILABLE - Store {keyspace}: {e}"),
            )
        }
    }
}
