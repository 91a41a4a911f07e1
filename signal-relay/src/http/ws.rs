//! WebSocket transport.
//!
//! Bridges one socket to the router: a writer task drains the
//! connection's outbound queue, the read loop feeds text frames to the
//! protocol state machine, and stream end triggers disconnect cleanup.

use crate::registry::ClientSink;
use crate::router::Connection;
use crate::server::SignalRelay;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::Extension;
use futures::{SinkExt, StreamExt};
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Upgrade handler for `/ws`.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Extension(relay): Extension<Arc<SignalRelay>>,
) -> impl IntoResponse {
    let max_frame = relay.config().limits.max_frame_bytes;
    ws.max_message_size(max_frame)
        .on_upgrade(move |socket| handle_socket(socket, relay))
}

/// Drive one connection until the socket closes.
async fn handle_socket(socket: WebSocket, relay: Arc<SignalRelay>) {
    relay
        .metrics()
        .connections_total
        .fetch_add(1, Ordering::Relaxed);
    tracing::debug!("websocket connection opened");

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (sink, mut outbound) = ClientSink::channel();
    let mut connection = Connection::new(relay, sink);

    // Writer task: forward queued server messages as JSON text frames.
    let writer = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            let text = match message.encode() {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to encode outbound message");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Read loop: one frame at a time into the router, preserving the
    // per-connection handling order.
    while let Some(frame) = ws_rx.next().await {
        match frame {
            Ok(Message::Text(text)) => connection.handle_frame(&text),
            Ok(Message::Close(_)) => break,
            // Pings are answered by axum automatically; binary frames
            // are not part of the protocol.
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(error = %e, "websocket error");
                break;
            }
        }
    }

    connection.handle_disconnect();
    writer.abort();
    tracing::debug!("websocket connection closed");
}
