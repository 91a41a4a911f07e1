//! HTTP endpoints for signal-relay.
//!
//! Provides the WebSocket transport plus health and metrics endpoints,
//! all on one listener.

pub mod health;
mod metrics;
pub mod ws;

use crate::server::SignalRelay;
use axum::{routing::get, Extension, Router};
use std::sync::Arc;

pub use health::HealthStatus;

/// Build the HTTP router with all endpoints.
pub fn build_router(relay: Arc<SignalRelay>) -> Router {
    let mut router = Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/health", get(health::health_handler));

    if relay.config().http.metrics_enabled {
        router = router.route("/metrics", get(metrics::metrics_handler));
    }

    router.layer(Extension(relay))
}
