//! # signal-types
//!
//! Wire format types for the AirBridge signaling protocol.
//!
//! This crate provides the types shared by the relay server and clients:
//! - [`DeviceId`], [`SessionCode`], [`Device`] - Identity types
//! - [`ClientMessage`], [`ServerMessage`] - Protocol messages
//! - [`ErrorReason`] - Protocol error codes
//! - [`WireError`] - Codec errors
//!
//! The wire format is JSON text frames: every message is an object with
//! a `type` tag, e.g. `{"type":"register","deviceId":"dev-A"}`.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod messages;

pub use error::WireError;
pub use ids::{Device, DeviceId, SessionCode, DEFAULT_DEVICE_NAME};
pub use messages::{ClientMessage, CodeValue, ErrorReason, Frame, PeerInfo, ServerMessage};
