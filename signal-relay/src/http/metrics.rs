//! Prometheus metrics endpoint.

use crate::server::SignalRelay;
use axum::{http::header::CONTENT_TYPE, response::IntoResponse, Extension};
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Prometheus metrics handler.
///
/// Returns metrics in Prometheus text format: gauges for current state,
/// counters monotonic since startup.
pub async fn metrics_handler(Extension(relay): Extension<Arc<SignalRelay>>) -> impl IntoResponse {
    let m = relay.metrics();

    // Gauges — current state
    let devices = relay.connected_devices();
    let sessions = relay.active_sessions();

    // Counters — monotonic since startup
    let conns_total = m.connections_total.load(Ordering::Relaxed);
    let registrations = m.registrations_total.load(Ordering::Relaxed);
    let created = m.sessions_created_total.load(Ordering::Relaxed);
    let joins = m.joins_total.load(Ordering::Relaxed);
    let signals = m.signals_relayed_total.load(Ordering::Relaxed);
    let errors = m.errors_total.load(Ordering::Relaxed);
    let drops = m.sends_dropped_total.load(Ordering::Relaxed);

    let body = format!(
        r#"# HELP signal_relay_devices_connected Registered devices with live connections
# TYPE signal_relay_devices_connected gauge
signal_relay_devices_connected {devices}

# HELP signal_relay_sessions_active Active sessions
# TYPE signal_relay_sessions_active gauge
signal_relay_sessions_active {sessions}

# HELP signal_relay_info Server information
# TYPE signal_relay_info gauge
signal_relay_info{{version="{version}"}} 1

# HELP signal_relay_connections_total Total WebSocket connections accepted
# TYPE signal_relay_connections_total counter
signal_relay_connections_total {conns_total}

# HELP signal_relay_registrations_total Total successful registrations
# TYPE signal_relay_registrations_total counter
signal_relay_registrations_total {registrations}

# HELP signal_relay_sessions_created_total Total sessions created
# TYPE signal_relay_sessions_created_total counter
signal_relay_sessions_created_total {created}

# HELP signal_relay_joins_total Total successful matches
# TYPE signal_relay_joins_total counter
signal_relay_joins_total {joins}

# HELP signal_relay_signals_relayed_total Total signal payloads relayed
# TYPE signal_relay_signals_relayed_total counter
signal_relay_signals_relayed_total {signals}

# HELP signal_relay_errors_total Total protocol error replies
# TYPE signal_relay_errors_total counter
signal_relay_errors_total {errors}

# HELP signal_relay_sends_dropped_total Outbound messages dropped on closed connections
# TYPE signal_relay_sends_dropped_total counter
signal_relay_sends_dropped_total {drops}
"#,
        version = env!("CARGO_PKG_VERSION"),
    );

    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn metrics_include_counters_and_gauges() {
        let relay = Arc::new(SignalRelay::new(Config::default()));
        relay
            .metrics()
            .signals_relayed_total
            .fetch_add(3, Ordering::Relaxed);

        let app = crate::http::build_router(relay);
        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();

        assert!(text.contains("signal_relay_devices_connected 0"));
        assert!(text.contains("signal_relay_signals_relayed_total 3"));
        assert!(text.contains("# TYPE signal_relay_sessions_active gauge"));
    }
}
