//! Error types for signal-relay.

use signal_types::{DeviceId, ErrorReason, SessionCode};

/// Main error type for relay operations.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Protocol error.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Protocol layer errors.
///
/// Each variant maps to exactly one wire `error` reply; nothing here is
/// fatal to the connection, let alone the process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The frame was not decodable JSON.
    #[error("undecodable frame")]
    InvalidJson,

    /// `register` without a usable device id.
    #[error("register without device id")]
    MissingDeviceId,

    /// Operation attempted on an unregistered connection.
    #[error("connection not registered")]
    RegisterFirst,

    /// No active session with this code.
    #[error("unknown session code {code}")]
    InvalidCode {
        /// The code the client sent.
        code: SessionCode,
    },

    /// The session already has a different guest.
    #[error("session {code} already has a guest")]
    SessionFull {
        /// The session code.
        code: SessionCode,
    },

    /// Host or guest was unreachable at match time.
    #[error("peer unreachable for session {code}")]
    PeerUnavailable {
        /// The session code.
        code: SessionCode,
    },

    /// The relay target is not connected.
    #[error("target device {target} is offline")]
    TargetOffline {
        /// The requested target id.
        target: DeviceId,
    },
}

impl ProtocolError {
    /// The wire error code sent back to the client for this failure.
    pub fn reason(&self) -> ErrorReason {
        match self {
            ProtocolError::InvalidJson => ErrorReason::InvalidJson,
            ProtocolError::MissingDeviceId => ErrorReason::MissingDeviceId,
            ProtocolError::RegisterFirst => ErrorReason::RegisterFirst,
            ProtocolError::InvalidCode { .. } => ErrorReason::InvalidCode,
            ProtocolError::SessionFull { .. } => ErrorReason::SessionFull,
            ProtocolError::PeerUnavailable { .. } => ErrorReason::PeerUnavailable,
            ProtocolError::TargetOffline { .. } => ErrorReason::TargetOffline,
        }
    }
}

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Result type alias for protocol operations.
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_protocol_error_maps_to_a_wire_reason() {
        let cases = [
            (ProtocolError::InvalidJson, ErrorReason::InvalidJson),
            (ProtocolError::MissingDeviceId, ErrorReason::MissingDeviceId),
            (ProtocolError::RegisterFirst, ErrorReason::RegisterFirst),
            (
                ProtocolError::InvalidCode {
                    code: SessionCode::new("000000"),
                },
                ErrorReason::InvalidCode,
            ),
            (
                ProtocolError::SessionFull {
                    code: SessionCode::new("000000"),
                },
                ErrorReason::SessionFull,
            ),
            (
                ProtocolError::PeerUnavailable {
                    code: SessionCode::new("000000"),
                },
                ErrorReason::PeerUnavailable,
            ),
            (
                ProtocolError::TargetOffline {
                    target: DeviceId::new("dev-X"),
                },
                ErrorReason::TargetOffline,
            ),
        ];
        for (error, reason) in cases {
            assert_eq!(error.reason(), reason);
        }
    }
}
