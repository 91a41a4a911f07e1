//! The protocol state machine.
//!
//! One [`Connection`] per transport connection. Each inbound text frame
//! is validated against the connection's state, dispatched to a
//! handler, and answered with zero or more outbound messages, possibly
//! on other devices' connections. All registry access for one frame
//! happens under the relay's single state lock, so events are handled
//! one at a time end to end.

use crate::error::{ProtocolError, ProtocolResult};
use crate::registry::{ClientSink, RegisteredDevice};
use crate::server::SignalRelay;
use crate::sessions::JoinError;
use signal_types::{
    ClientMessage, CodeValue, Device, DeviceId, Frame, PeerInfo, ServerMessage, SessionCode,
    DEFAULT_DEVICE_NAME,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Protocol state for one connection.
#[derive(Debug, Clone)]
pub enum ConnectionState {
    /// No device bound yet; only `register` is accepted.
    Unregistered,
    /// A device is bound to this connection.
    Registered {
        /// The bound identity.
        device: Device,
    },
}

/// Per-connection message router.
pub struct Connection {
    relay: Arc<SignalRelay>,
    sink: ClientSink,
    state: ConnectionState,
}

impl Connection {
    /// Create a router for a freshly accepted connection.
    pub fn new(relay: Arc<SignalRelay>, sink: ClientSink) -> Self {
        Self {
            relay,
            sink,
            state: ConnectionState::Unregistered,
        }
    }

    /// Current protocol state.
    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Handle one inbound text frame.
    ///
    /// Never fails upward: protocol violations become `error` replies
    /// on this connection, unrecognized frames are ignored, and the
    /// connection stays open either way.
    pub fn handle_frame(&mut self, text: &str) {
        let message = match ClientMessage::decode(text) {
            Ok(Frame::Message(message)) => message,
            Ok(Frame::Unrecognized) => {
                tracing::debug!("ignoring unrecognized frame");
                return;
            }
            Err(e) => {
                tracing::debug!(error = %e, "undecodable frame");
                self.reply_error(ProtocolError::InvalidJson);
                return;
            }
        };

        let result = match message {
            ClientMessage::Register {
                device_id,
                device_name,
            } => self.handle_register(device_id, device_name),
            ClientMessage::CreateSession => self.handle_create_session(),
            ClientMessage::JoinSession { code } => self.handle_join_session(code),
            ClientMessage::Signal { to, data } => self.handle_signal(to, data),
        };

        if let Err(e) = result {
            tracing::debug!(error = %e, "protocol error");
            self.reply_error(e);
        }
    }

    /// Transport-level close notification.
    ///
    /// Unregistered connections leave no trace. Otherwise the device is
    /// unbound and every session referencing it is purged. The unbind
    /// is unconditional: when a later registration has displaced this
    /// connection, closing the displaced one still removes the id.
    pub fn handle_disconnect(&mut self) {
        let ConnectionState::Registered { device } = &self.state else {
            return;
        };
        let id = device.id.clone();
        self.relay.with_state(|state| {
            state.connections.unbind(&id);
            state.sessions.remove_for_device(&id);
        });
        tracing::info!(device = %id, "device disconnected, bindings purged");
    }

    fn handle_register(
        &mut self,
        device_id: Option<String>,
        device_name: Option<String>,
    ) -> ProtocolResult<()> {
        let id = match device_id {
            Some(id) if !id.is_empty() => DeviceId::new(id),
            _ => return Err(ProtocolError::MissingDeviceId),
        };

        let max_chars = self.relay.config().limits.max_device_name_len;
        let name = truncate_name(
            device_name.as_deref().unwrap_or(DEFAULT_DEVICE_NAME),
            max_chars,
        );
        let device = Device {
            id: id.clone(),
            name,
        };

        let sink = self.sink.clone();
        self.relay.with_state(|state| {
            state.connections.bind(device.clone(), sink);
        });
        self.state = ConnectionState::Registered { device };

        self.relay
            .metrics()
            .registrations_total
            .fetch_add(1, Ordering::Relaxed);
        tracing::info!(device = %id, "device registered");
        self.relay.send(&self.sink, ServerMessage::RegisterAck { id });
        Ok(())
    }

    fn handle_create_session(&mut self) -> ProtocolResult<()> {
        let host_id = self.registered_device()?.id.clone();

        let code = self.relay.with_state(|state| {
            let code = state
                .sessions
                .create(host_id.clone(), &mut rand::thread_rng());
            self.relay.send(
                &self.sink,
                ServerMessage::SessionCreated { code: code.clone() },
            );
            code
        });

        self.relay
            .metrics()
            .sessions_created_total
            .fetch_add(1, Ordering::Relaxed);
        tracing::info!(host = %host_id, code = %code, "session created");
        Ok(())
    }

    fn handle_join_session(&mut self, code: Option<CodeValue>) -> ProtocolResult<()> {
        let guest_id = self.registered_device()?.id.clone();
        let code = code
            .map(CodeValue::into_code)
            .unwrap_or_else(|| SessionCode::new(""));

        self.relay.with_state(|state| {
            let session = state
                .sessions
                .join(&code, guest_id.clone())
                .map_err(|e| match e {
                    JoinError::NotFound => ProtocolError::InvalidCode { code: code.clone() },
                    JoinError::Conflict => ProtocolError::SessionFull { code: code.clone() },
                })?;

            // Both parties must be reachable *now*; bindings can have
            // gone stale since creation. On failure the record stays so
            // the caller may retry.
            let host = state.connections.lookup(&session.host_id).cloned();
            let guest = state.connections.lookup(&guest_id).cloned();
            let (host, guest) = match (host, guest) {
                (Some(host), Some(guest)) => (host, guest),
                _ => return Err(ProtocolError::PeerUnavailable { code: code.clone() }),
            };

            // Each party learns the other's contact card.
            self.relay.send(
                &host.sink,
                ServerMessage::PeerMatched {
                    code: code.clone(),
                    peer: self.peer_info(&guest),
                },
            );
            self.relay.send(
                &guest.sink,
                ServerMessage::PeerMatched {
                    code: code.clone(),
                    peer: self.peer_info(&host),
                },
            );
            Ok(())
        })?;

        self.relay
            .metrics()
            .joins_total
            .fetch_add(1, Ordering::Relaxed);
        tracing::info!(guest = %guest_id, code = %code, "peers matched");
        Ok(())
    }

    fn handle_signal(
        &mut self,
        to: Option<String>,
        data: Option<serde_json::Value>,
    ) -> ProtocolResult<()> {
        let from = self.registered_device()?.id.clone();
        // A missing target behaves like an unknown one.
        let target_id = DeviceId::new(to.unwrap_or_default());
        let data = data.unwrap_or_else(|| serde_json::Value::Object(Default::default()));

        self.relay.with_state(|state| {
            let target = state
                .connections
                .lookup(&target_id)
                .ok_or_else(|| ProtocolError::TargetOffline {
                    target: target_id.clone(),
                })?;
            self.relay.send(
                &target.sink,
                ServerMessage::Signal {
                    from: from.clone(),
                    data,
                },
            );
            Ok(())
        })?;

        self.relay
            .metrics()
            .signals_relayed_total
            .fetch_add(1, Ordering::Relaxed);
        tracing::debug!(from = %from, to = %target_id, "relayed signal");
        Ok(())
    }

    fn registered_device(&self) -> ProtocolResult<&Device> {
        match &self.state {
            ConnectionState::Registered { device } => Ok(device),
            ConnectionState::Unregistered => Err(ProtocolError::RegisterFirst),
        }
    }

    fn reply_error(&self, error: ProtocolError) {
        self.relay
            .metrics()
            .errors_total
            .fetch_add(1, Ordering::Relaxed);
        self.relay
            .send(&self.sink, ServerMessage::error(error.reason()));
    }

    fn peer_info(&self, entry: &RegisteredDevice) -> PeerInfo {
        PeerInfo {
            id: entry.device.id.clone(),
            name: entry.device.name.clone(),
            host: self.relay.config().server.advertised_host.clone(),
            port: self.relay.config().advertised_port(),
        }
    }
}

/// Truncate a display name to a maximum character count.
///
/// Uses char boundaries to avoid splitting multi-byte UTF-8.
fn truncate_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        name.to_string()
    } else {
        name.chars().take(max_chars).collect()
    }
}
