//! Application setup and router construction.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    add_link_handler, delete_link_handler, export_markdown_handler, get_link_handler,
    health_handler, list_links_handler, meta_verify_handler, meta_webhook_handler,
    roulette_handler, root_handler, twilio_webhook_handler, ws_handler,
};

pub const SERVICE_NAME: &str = "social-saver-backend";

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: Arc<ServerDeps>,
    /// Token Meta must echo back during webhook verification.
    pub meta_verify_token: String,
}

impl AxumAppState {
    pub fn new(deps: Arc<ServerDeps>, meta_verify_token: impl Into<String>) -> Self {
        Self {
            deps,
            meta_verify_token: meta_verify_token.into(),
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AxumAppState) -> Router {
    // The dashboard is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/ws", get(ws_handler))
        // Inbound messaging
        .route("/webhook/twilio", post(twilio_webhook_handler))
        .route(
            "/webhook/meta",
            get(meta_verify_handler).post(meta_webhook_handler),
        )
        // Dashboard API
        .route("/links", get(list_links_handler).post(add_link_handler))
        .route("/links/roulette", get(roulette_handler))
        .route(
            "/links/:id",
            get(get_link_handler).delete(delete_link_handler),
        )
        .route("/export/markdown", get(export_markdown_handler))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
