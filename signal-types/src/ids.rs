//! Identity types for the signaling protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name used when a device registers without one.
pub const DEFAULT_DEVICE_NAME: &str = "Unknown Device";

/// A caller-supplied opaque device identity.
///
/// The relay never interprets the contents; uniqueness among
/// currently-registered devices is the only requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Wrap a raw identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A short human-shareable session code.
///
/// Active codes are six decimal digits; the type also carries the raw
/// strings clients send in `join_session`, which may match nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionCode(String);

impl SessionCode {
    /// Wrap a raw code string.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The raw code string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

/// A registered endpoint: identity plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Caller-supplied identity.
    pub id: DeviceId,
    /// Display label shown to the matched peer.
    pub name: String,
}

impl Device {
    /// Build a device record, substituting the placeholder name when
    /// none was supplied.
    pub fn new(id: DeviceId, name: Option<String>) -> Self {
        Self {
            id,
            name: name.unwrap_or_else(|| DEFAULT_DEVICE_NAME.to_string()),
        }
    }
}
