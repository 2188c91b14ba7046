use crate::{
    config::Config,
    middleware::LoggingLayer,
    s3::routes,
    storage::{MemoryBackend, StorageBackend},
};
use anyhow::Result;
use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn StorageBackend>,
}

impl AppState {
    /// State backed by a fresh in-memory store with the configured initial buckets.
    pub async fn in_memory(config: Config) -> Result<Arc<Self>> {
        let storage = Arc::new(MemoryBackend::new(config.owner()));

        for bucket in &config.storage.initial_buckets {
            storage.create_bucket(bucket).await?;
        }

        Ok(Arc::new(AppState { config, storage }))
    }
}

pub async fn run(config: Config) -> Result<()> {
    let state = AppState::in_memory(config.clone()).await?;
    if !config.storage.initial_buckets.is_empty() {
        info!("Initial buckets: {}", config.storage.initial_buckets.join(", "));
    }

    let app = build_app(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("IronList listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

pub fn build_app(state: Arc<AppState>) -> Router {
    routes::create_routes()
        .layer(LoggingLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down...");
        },
    }
}
