//! Session registry: code to pairing record.
//!
//! Owns the session lifecycle: created by `create_session`, guest slot
//! filled by `join_session`, deleted wholesale when either party
//! disconnects. Devices are referenced by id only; reachability is
//! re-resolved through the connection registry at use time.

use crate::code;
use rand::Rng;
use signal_types::{DeviceId, SessionCode};
use std::collections::HashMap;

/// A matchmaking record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The device that created the session; set at creation, never
    /// empty while the record exists.
    pub host_id: DeviceId,
    /// Set by the first successful join.
    pub guest_id: Option<DeviceId>,
}

/// Why a join was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JoinError {
    /// No active session with this code.
    #[error("no active session with this code")]
    NotFound,
    /// A different guest already holds the slot.
    #[error("session already has a guest")]
    Conflict,
}

/// Maps active session codes to pairing records.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionCode, Session>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh code, unique among active sessions, and store
    /// a record with the caller as host. Codes of deleted sessions are
    /// eligible for reuse.
    pub fn create(&mut self, host_id: DeviceId, rng: &mut impl Rng) -> SessionCode {
        let code = code::unique(rng, |c| self.sessions.contains_key(c));
        self.sessions.insert(
            code.clone(),
            Session {
                host_id,
                guest_id: None,
            },
        );
        code
    }

    /// Join (or idempotently rejoin) the session with this code.
    ///
    /// Returns the record after the join so the caller can resolve both
    /// parties.
    pub fn join(&mut self, code: &SessionCode, guest_id: DeviceId) -> Result<Session, JoinError> {
        let session = self.sessions.get_mut(code).ok_or(JoinError::NotFound)?;
        match &session.guest_id {
            Some(existing) if *existing != guest_id => Err(JoinError::Conflict),
            _ => {
                session.guest_id = Some(guest_id);
                Ok(session.clone())
            }
        }
    }

    /// Delete every session referencing this device as host or guest.
    ///
    /// Called on disconnect; afterwards no session points at a device
    /// that is no longer reachable.
    pub fn remove_for_device(&mut self, id: &DeviceId) {
        self.sessions
            .retain(|_, s| s.host_id != *id && s.guest_id.as_ref() != Some(id));
    }

    /// Look up a session by code.
    pub fn get(&self, code: &SessionCode) -> Option<&Session> {
        self.sessions.get(code)
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is active.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
