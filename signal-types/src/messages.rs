//! Protocol messages for AirBridge signaling.
//!
//! Client frames arrive as JSON text with a `type` tag and camelCase
//! fields; server replies use the same tagging. Fields a client may
//! legitimately omit (or send with the wrong shape under a recognized
//! tag) are optional here so the router can answer with the protocol's
//! typed errors instead of rejecting the frame outright.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{DeviceId, SessionCode, WireError};

/// Messages a client sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Bind a device identity to this connection.
    #[serde(rename_all = "camelCase")]
    Register {
        /// Caller-supplied identity; required, but validated by the
        /// router so its absence yields `missing_device_id`.
        #[serde(default)]
        device_id: Option<String>,
        /// Optional display label.
        #[serde(default)]
        device_name: Option<String>,
    },
    /// Create a session with the sender as host.
    CreateSession,
    /// Join an existing session by code.
    JoinSession {
        /// Session code as a JSON string or number.
        #[serde(default)]
        code: Option<CodeValue>,
    },
    /// Relay an opaque payload to another registered device.
    Signal {
        /// Target device id.
        #[serde(default)]
        to: Option<String>,
        /// Opaque payload, passed through untouched.
        #[serde(default)]
        data: Option<serde_json::Value>,
    },
}

/// A session code as it appears on the wire: string or number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CodeValue {
    /// `{"code":"123456"}`
    Text(String),
    /// `{"code":123456}`
    Number(u64),
}

impl CodeValue {
    /// Coerce to the canonical string form used for registry lookups.
    pub fn into_code(self) -> SessionCode {
        match self {
            CodeValue::Text(s) => SessionCode::new(s),
            CodeValue::Number(n) => SessionCode::new(n.to_string()),
        }
    }
}

/// Outcome of decoding one inbound text frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A recognized protocol message.
    Message(ClientMessage),
    /// Valid JSON the protocol does not recognize; routers ignore it.
    Unrecognized,
}

impl ClientMessage {
    /// Decode one text frame.
    ///
    /// Undecodable JSON is an error (the router answers `invalid_json`);
    /// valid JSON without a recognized `type` tag is [`Frame::Unrecognized`]
    /// (the router stays silent).
    pub fn decode(text: &str) -> Result<Frame, WireError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        match serde_json::from_value(value) {
            Ok(message) => Ok(Frame::Message(message)),
            Err(_) => Ok(Frame::Unrecognized),
        }
    }
}

/// Messages the relay sends to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Registration succeeded.
    RegisterAck {
        /// The registered device id, echoed back.
        id: DeviceId,
    },
    /// A session was created with the sender as host.
    SessionCreated {
        /// The freshly allocated code.
        code: SessionCode,
    },
    /// Both parties of a session are reachable; sent to each, naming
    /// the other.
    PeerMatched {
        /// The session code.
        code: SessionCode,
        /// Contact card for the other party.
        peer: PeerInfo,
    },
    /// A relayed payload from another device.
    Signal {
        /// The sending device id.
        from: DeviceId,
        /// The opaque payload, byte-for-byte as sent.
        data: serde_json::Value,
    },
    /// A protocol error reply.
    Error {
        /// Machine-readable error code.
        message: ErrorReason,
    },
}

impl ServerMessage {
    /// Encode to a JSON text frame.
    pub fn encode(&self) -> Result<String, WireError> {
        serde_json::to_string(self).map_err(WireError::from)
    }

    /// Shorthand for an `error` reply.
    pub fn error(reason: ErrorReason) -> Self {
        ServerMessage::Error { message: reason }
    }
}

/// Contact card for a matched peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerInfo {
    /// The peer's device id.
    pub id: DeviceId,
    /// The peer's display name.
    pub name: String,
    /// Relay host the peer is reachable through.
    pub host: String,
    /// Relay port the peer is reachable through.
    pub port: u16,
}

/// Protocol error codes carried in `error` replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    /// The frame was not decodable JSON.
    InvalidJson,
    /// `register` without a device id.
    MissingDeviceId,
    /// Operation attempted before registering.
    RegisterFirst,
    /// `join_session` with an unknown code.
    InvalidCode,
    /// The session already has a different guest.
    SessionFull,
    /// Host or guest was unreachable at match time.
    PeerUnavailable,
    /// `signal` target is not connected.
    TargetOffline,
}

impl ErrorReason {
    /// The wire string for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorReason::InvalidJson => "invalid_json",
            ErrorReason::MissingDeviceId => "missing_device_id",
            ErrorReason::RegisterFirst => "register_first",
            ErrorReason::InvalidCode => "invalid_code",
            ErrorReason::SessionFull => "session_full",
            ErrorReason::PeerUnavailable => "peer_unavailable",
            ErrorReason::TargetOffline => "target_offline",
        }
    }
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode_message(text: &str) -> ClientMessage {
        match ClientMessage::decode(text).unwrap() {
            Frame::Message(m) => m,
            Frame::Unrecognized => panic!("frame not recognized: {text}"),
        }
    }

    #[test]
    fn register_decodes_camel_case_fields() {
        let msg = decode_message(r#"{"type":"register","deviceId":"dev-A","deviceName":"Phone"}"#);
        assert_eq!(
            msg,
            ClientMessage::Register {
                device_id: Some("dev-A".into()),
                device_name: Some("Phone".into()),
            }
        );
    }

    #[test]
    fn register_without_device_id_still_decodes() {
        // The router decides this is missing_device_id; the codec accepts it.
        let msg = decode_message(r#"{"type":"register"}"#);
        assert_eq!(
            msg,
            ClientMessage::Register {
                device_id: None,
                device_name: None,
            }
        );
    }

    #[test]
    fn create_session_is_a_bare_tag() {
        let msg = decode_message(r#"{"type":"create_session"}"#);
        assert_eq!(msg, ClientMessage::CreateSession);
    }

    #[test]
    fn join_session_code_accepts_string_and_number() {
        let as_string = decode_message(r#"{"type":"join_session","code":"123456"}"#);
        let as_number = decode_message(r#"{"type":"join_session","code":123456}"#);

        let code_of = |msg| match msg {
            ClientMessage::JoinSession { code: Some(code) } => code.into_code(),
            other => panic!("unexpected message: {other:?}"),
        };
        assert_eq!(code_of(as_string), SessionCode::new("123456"));
        assert_eq!(code_of(as_number), SessionCode::new("123456"));
    }

    #[test]
    fn signal_data_is_opaque() {
        let msg = decode_message(
            r#"{"type":"signal","to":"dev-B","data":{"sdp":"v=0","nested":{"k":[1,2]}}}"#,
        );
        let ClientMessage::Signal { to, data } = msg else {
            panic!("expected signal");
        };
        assert_eq!(to.as_deref(), Some("dev-B"));
        assert_eq!(data.unwrap(), json!({"sdp":"v=0","nested":{"k":[1,2]}}));
    }

    #[test]
    fn unknown_type_is_unrecognized_not_an_error() {
        assert_eq!(
            ClientMessage::decode(r#"{"type":"dance"}"#).unwrap(),
            Frame::Unrecognized
        );
        // Valid JSON without a type tag is also just ignored.
        assert_eq!(
            ClientMessage::decode(r#"{"hello":1}"#).unwrap(),
            Frame::Unrecognized
        );
        assert_eq!(ClientMessage::decode("[1,2,3]").unwrap(), Frame::Unrecognized);
    }

    #[test]
    fn garbage_is_a_wire_error() {
        assert!(ClientMessage::decode("not json {").is_err());
        assert!(ClientMessage::decode("").is_err());
    }

    #[test]
    fn register_ack_wire_shape() {
        let msg = ServerMessage::RegisterAck {
            id: DeviceId::new("dev-A"),
        };
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&msg.encode().unwrap()).unwrap(),
            json!({"type":"register_ack","id":"dev-A"})
        );
    }

    #[test]
    fn session_created_wire_shape() {
        let msg = ServerMessage::SessionCreated {
            code: SessionCode::new("654321"),
        };
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&msg.encode().unwrap()).unwrap(),
            json!({"type":"session_created","code":"654321"})
        );
    }

    #[test]
    fn peer_matched_wire_shape() {
        let msg = ServerMessage::PeerMatched {
            code: SessionCode::new("123456"),
            peer: PeerInfo {
                id: DeviceId::new("dev-B"),
                name: "Tablet".into(),
                host: "relay".into(),
                port: 8080,
            },
        };
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&msg.encode().unwrap()).unwrap(),
            json!({
                "type": "peer_matched",
                "code": "123456",
                "peer": {"id": "dev-B", "name": "Tablet", "host": "relay", "port": 8080}
            })
        );
    }

    #[test]
    fn relayed_signal_wire_shape() {
        let msg = ServerMessage::Signal {
            from: DeviceId::new("dev-A"),
            data: json!({"sdp":"..."}),
        };
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&msg.encode().unwrap()).unwrap(),
            json!({"type":"signal","from":"dev-A","data":{"sdp":"..."}})
        );
    }

    #[test]
    fn error_reasons_serialize_as_snake_case() {
        for (reason, wire) in [
            (ErrorReason::InvalidJson, "invalid_json"),
            (ErrorReason::MissingDeviceId, "missing_device_id"),
            (ErrorReason::RegisterFirst, "register_first"),
            (ErrorReason::InvalidCode, "invalid_code"),
            (ErrorReason::SessionFull, "session_full"),
            (ErrorReason::PeerUnavailable, "peer_unavailable"),
            (ErrorReason::TargetOffline, "target_offline"),
        ] {
            let msg = ServerMessage::error(reason);
            assert_eq!(
                serde_json::from_str::<serde_json::Value>(&msg.encode().unwrap()).unwrap(),
                json!({"type":"error","message":wire})
            );
            assert_eq!(reason.to_string(), wire);
        }
    }
}
