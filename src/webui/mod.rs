pub mod assets;
pub mod error;
pub mod handlers;

use anyhow::Result;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Settings;
use crate::render::{CommonMark, MarkdownFormatter};

pub struct AppState {
    pub web_dir: PathBuf,
    pub snapshot_path: PathBuf,
    pub markdown: Arc<dyn MarkdownFormatter>,
}

impl AppState {
    pub fn new(web_dir: PathBuf, snapshot_path: PathBuf) -> Self {
        Self {
            web_dir,
            snapshot_path,
            markdown: Arc::new(CommonMark),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/views/{tab}", get(handlers::view))
        .route("/api/snapshot", get(handlers::api_snapshot))
        .fallback(get(handlers::asset))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub fn run_server(settings: &Settings) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(start_server_async(settings))
}

/// Async version of `run_server` for callers that already own a runtime.
pub async fn start_server_async(settings: &Settings) -> Result<()> {
    let addr = settings.addr()?;
    let state = Arc::new(AppState::new(
        settings.web_dir.clone(),
        settings.snapshot_path.clone(),
    ));

    let listener = bind_with_reuse(addr).await?;
    info!(
        %addr,
        web_dir = %settings.web_dir.display(),
        snapshot = %settings.snapshot_path.display(),
        "Lumi dashboard listening"
    );
    println!("Server running at http://{}/", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Bind a TCP listener with SO_REUSEADDR so quick restarts reclaim the port.
async fn bind_with_reuse(addr: SocketAddr) -> Result<tokio::net::TcpListener> {
    let domain = if addr.is_ipv6() {
        socket2::Domain::IPV6
    } else {
        socket2::Domain::IPV4
    };
    let socket = socket2::Socket::new(domain, socket2::Type::STREAM, Some(socket2::Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(1024)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(tokio::net::TcpListener::from_std(std_listener)?)
}
