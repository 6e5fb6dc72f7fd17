pub mod error;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tokio::sync::{Semaphore, watch};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::media::BurnSettings;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<BurnSettings>,
    /// One permit per ffmpeg process allowed to run at once
    pub jobs: Arc<Semaphore>,
}

impl AppState {
    pub fn new(settings: BurnSettings, max_jobs: usize) -> Self {
        Self {
            settings: Arc::new(settings),
            jobs: Arc::new(Semaphore::new(max_jobs.max(1))),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/burn-subtitles", post(routes::burn_subtitles))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Run the HTTP server until `shutdown_rx` flips to true.
pub async fn run_server(
    addr: SocketAddr,
    state: AppState,
    max_upload_bytes: usize,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(state, max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            while !*shutdown_rx.borrow_and_update() {
                if shutdown_rx.changed().await.is_err() {
                    break;
                }
            }
        })
        .await?;

    Ok(())
}
