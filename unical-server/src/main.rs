mod routes;
mod singleton;
mod state;

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;
use unical_core::UnicalConfig;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_env("UNICAL_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = UnicalConfig::load()?;

    let lock = singleton::ServerLock::acquire(&config.user_path())?;
    tracing::debug!(path = %lock.path().display(), "acquired server lock");

    let state = AppState::load(&config).await?;
    let app = app(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.server_port));
    tracing::info!(%addr, user = %config.user, "unical-server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::api::router())
        .merge(routes::events::router())
        .with_state(state)
        .layer(cors)
}
