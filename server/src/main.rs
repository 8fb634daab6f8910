use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_api::{
    AppConfig, build_app, build_collection, shutdown_signal, wait_until_ready,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    info!("Initializing document store...");
    let collection = build_collection(&config.store).await?;
    wait_until_ready(collection.as_ref(), config.store.ready_timeout).await?;

    let app = build_app(collection);

    let listener =
        tokio::net::TcpListener::bind((config.host.as_str(), config.port))
            .await?;
    info!(
        "User API server starting on {} ({}:{})",
        listener.local_addr()?,
        config.host,
        config.port
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");

    Ok(())
}
