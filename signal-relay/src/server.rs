//! Top-level relay state and operational metrics.

use crate::config::Config;
use crate::registry::{ClientSink, ConnectionRegistry};
use crate::sessions::SessionRegistry;
use signal_types::ServerMessage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Operational metrics for monitoring relay activity.
///
/// All counters are monotonically increasing (reset only on restart).
/// Thread-safe via `AtomicU64`.
#[derive(Debug, Default)]
pub struct RelayMetrics {
    /// Total WebSocket connections accepted.
    pub connections_total: AtomicU64,
    /// Total successful registrations.
    pub registrations_total: AtomicU64,
    /// Total sessions created.
    pub sessions_created_total: AtomicU64,
    /// Total successful matches (both peers notified).
    pub joins_total: AtomicU64,
    /// Total `signal` payloads relayed.
    pub signals_relayed_total: AtomicU64,
    /// Total `error` replies sent.
    pub errors_total: AtomicU64,
    /// Total outbound messages dropped on closed connections.
    pub sends_dropped_total: AtomicU64,
}

/// The two registries, guarded together.
///
/// One lock covers both so each inbound event (message or disconnect)
/// performs its registry reads, writes, and outbound sends as a single
/// step. No handler awaits while holding the lock; sink sends are
/// synchronous unbounded-channel pushes.
#[derive(Debug, Default)]
pub struct RelayState {
    /// Live connections by device id.
    pub connections: ConnectionRegistry,
    /// Active sessions by code.
    pub sessions: SessionRegistry,
}

/// Main relay server: configuration, shared registries, metrics.
#[derive(Debug)]
pub struct SignalRelay {
    config: Config,
    state: Mutex<RelayState>,
    metrics: RelayMetrics,
}

impl SignalRelay {
    /// Create a relay with the given config and empty registries.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: Mutex::new(RelayState::default()),
            metrics: RelayMetrics::default(),
        }
    }

    /// Get the relay configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get access to the operational metrics.
    pub fn metrics(&self) -> &RelayMetrics {
        &self.metrics
    }

    /// Run `f` with exclusive access to both registries.
    ///
    /// The registries are never exposed outside this scope, so all
    /// mutation is serialized in lock-acquisition order.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut RelayState) -> R) -> R {
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    /// Queue a message on a sink, counting the drop if the connection
    /// is already gone. Delivery is best-effort by contract; nothing
    /// is surfaced to the caller.
    pub fn send(&self, sink: &ClientSink, message: ServerMessage) {
        if !sink.send(message) {
            self.metrics.sends_dropped_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Number of devices currently bound.
    pub fn connected_devices(&self) -> usize {
        self.with_state(|state| state.connections.len())
    }

    /// Number of active sessions.
    pub fn active_sessions(&self) -> usize {
        self.with_state(|state| state.sessions.len())
    }
}
