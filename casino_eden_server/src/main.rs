use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use casino_eden_server::config::ServerConfig;
use casino_eden_server::coordinator::Coordinator;
use casino_eden_server::store::RoomStore;
use casino_eden_server::ws::{router, AppState, SharedState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    let state = SharedState::new(AppState {
        coordinator: Coordinator::new(Arc::new(RoomStore::new()), config.table),
    });
    let app = router(state);

    info!("服务器正在监听 {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
