//! HTTP API Server
//!
//! axum router exposing the text and voice fingerspelling endpoints.

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

pub use handlers::AppState;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    // CORS: allow all origins, the service runs on a trusted local network
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::health_check))
        .route("/text-to-asl", post(handlers::text_to_asl))
        .route("/voice-to-asl", post(handlers::voice_to_asl))
        .route("/asl_images/{filename}", get(handlers::serve_asl_image))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process exits
pub async fn serve(state: Arc<AppState>, host: &str, port: u16) {
    let app = router(state);

    let addr = format!("{host}:{port}");
    info!("Fingerspell API listening on http://{}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind API server: {}", e);
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        error!("API server error: {}", e);
    }
}
