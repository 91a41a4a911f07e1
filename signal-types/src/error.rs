//! Error types for the wire format.

/// Errors produced while encoding or decoding protocol frames.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The frame was not valid JSON.
    #[error("undecodable frame: {0}")]
    Json(#[from] serde_json::Error),
}
