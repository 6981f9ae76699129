use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, StorageBackend, StorageConfig};
use models::Message;
use service::{
    message::{DynMessageStore, MessageService},
    storage::{JsonMapStore, MemoryMapStore},
};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub messages: Arc<MessageService<DynMessageStore>>,
}

impl AppState {
    pub fn new(messages: MessageService<DynMessageStore>) -> Self {
        Self { messages: Arc::new(messages) }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the configured message store.
pub async fn open_store(cfg: &StorageConfig) -> Result<DynMessageStore, StartupError> {
    cfg.validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let store: DynMessageStore = match cfg.backend {
        StorageBackend::File => {
            common::env::ensure_data_dir(&cfg.path).await?;
            Box::new(JsonMapStore::<String, Message>::open(&cfg.path).await?) as DynMessageStore
        }
        StorageBackend::Memory => {
            warn!("using in-memory message store; data is lost on restart");
            Box::new(MemoryMapStore::<String, Message>::new()) as DynMessageStore
        }
    };
    Ok(store)
}

pub async fn build_state(cfg: &StorageConfig) -> Result<AppState, StartupError> {
    let store = open_store(cfg).await?;
    Ok(AppState::new(MessageService::new(store)))
}

pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

/// Public entry: build the app and serve until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&cfg.storage).await?;
    let app = build_app(state);

    let addr: SocketAddr = cfg.server.bind_addr().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, backend = ?cfg.storage.backend, "message store listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("message store stopped");
    Ok(())
}
