//! Connection registry: device id to live outbound channel.
//!
//! The single source of truth for "is this device reachable right
//! now". Entries are weak by design: sessions reference devices by id
//! and re-resolve through this registry on every use, never caching a
//! channel.

use signal_types::{Device, DeviceId, ServerMessage};
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Outbound message channel for one connection.
///
/// Wraps the per-connection writer queue. Sending never blocks and
/// never fails loudly: a closed channel means the connection is gone
/// and the message is dropped, per the best-effort delivery contract.
#[derive(Debug, Clone)]
pub struct ClientSink {
    tx: mpsc::UnboundedSender<ServerMessage>,
}

impl ClientSink {
    /// Wrap an existing sender.
    pub fn new(tx: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self { tx }
    }

    /// Create a sink together with the receiving half of its queue.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Queue a message for delivery.
    ///
    /// Returns false when the connection is closed and the message was
    /// dropped.
    pub fn send(&self, message: ServerMessage) -> bool {
        self.tx.send(message).is_ok()
    }

    /// Whether the connection is still open.
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// A device bound to its live connection.
#[derive(Debug, Clone)]
pub struct RegisteredDevice {
    /// Identity and display name from `register`.
    pub device: Device,
    /// Outbound channel of the binding connection.
    pub sink: ClientSink,
}

/// Maps device ids to live connections.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    entries: HashMap<DeviceId, RegisteredDevice>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a device to a connection, silently replacing any prior
    /// binding for the same id (last registration wins).
    pub fn bind(&mut self, device: Device, sink: ClientSink) {
        self.entries
            .insert(device.id.clone(), RegisteredDevice { device, sink });
    }

    /// Look up the live entry for a device.
    ///
    /// `None` is not an error; it simply means "offline".
    pub fn lookup(&self, id: &DeviceId) -> Option<&RegisteredDevice> {
        self.entries.get(id)
    }

    /// Remove a binding; no-op when absent.
    pub fn unbind(&mut self, id: &DeviceId) {
        self.entries.remove(id);
    }

    /// Number of devices currently bound.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no device is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
