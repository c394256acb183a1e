use qarooms::{
    build_router, config::DEFAULT_LOG_FILTER, AppState, EventDispatcher, InMemoryRoomRepository,
    PostgresRoomRepository, RoomRepository, ServerConfig, SubscriberRegistry, SubscriptionManager,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    info!(bind_addr = %config.bind_addr, "Starting Q&A rooms server");

    let room_repository: Arc<dyn RoomRepository + Send + Sync> = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Using PostgreSQL room repository");
            Arc::new(PostgresRoomRepository::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, rooms will only live in memory");
            Arc::new(InMemoryRoomRepository::new())
        }
    };

    // Cancelling this token tears down every open subscription
    let shutdown = CancellationToken::new();
    let registry = SubscriberRegistry::new();
    let app_state = AppState::new(
        room_repository,
        EventDispatcher::new(registry.clone()),
        SubscriptionManager::new(registry, shutdown.clone()),
    )
    .with_send_timeout(config.send_timeout);

    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);

    tokio::spawn(shutdown_on_ctrl_c(shutdown.clone()));
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_on_ctrl_c(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
    shutdown.cancel();
}
