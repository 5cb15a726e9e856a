use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::server::app::{AxumAppState, SERVICE_NAME};

#[derive(Serialize)]
pub struct RootResponse {
    message: &'static str,
    docs: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    storage: &'static str,
    subscribers: usize,
    messaging: String,
}

pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Social Saver API is running 🚀",
        docs: "/health",
    })
}

/// Liveness check. Also reports the storage backend, the number of connected
/// dashboards and whether outbound messaging is live or in demo mode.
pub async fn health_handler(Extension(state): Extension<AxumAppState>) -> Json<HealthResponse> {
    let deps = &state.deps;
    let messaging = if deps.notifier.is_demo() {
        format!("{} (demo)", deps.notifier.provider())
    } else {
        deps.notifier.provider().to_string()
    };

    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        storage: deps.store.backend(),
        subscribers: deps.broadcast_hub.subscriber_count().await,
        messaging,
    })
}
