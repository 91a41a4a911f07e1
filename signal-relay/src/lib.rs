//! # signal-relay
//!
//! Rendezvous and message-relay server for AirBridge.
//!
//! Two independently-connecting peers discover each other through a
//! short six-digit code and then exchange opaque signaling payloads
//! (e.g. to bootstrap a direct peer connection elsewhere). The relay:
//! - Accepts WebSocket connections carrying JSON text frames
//! - Binds device identities to live connections (`register`)
//! - Mints collision-checked session codes (`create_session`)
//! - Matches host and guest at join time (`join_session`)
//! - Relays opaque payloads between registered devices (`signal`)
//!
//! ## Architecture
//!
//! ```text
//! Device A ──┐                      ┌── Device B
//!            │   WebSocket (JSON)   │
//!            ├─────────────────────►│
//!            │                      │
//!        ┌───┴──────────────────────┴───┐
//!        │        signal-relay          │
//!        │  ┌────────────┬───────────┐  │
//!        │  │connections │ sessions  │  │
//!        │  └────────────┴───────────┘  │
//!        └──────────────────────────────┘
//! ```
//!
//! State is purely in-memory and best-effort: nothing survives a
//! restart, and messages to devices that are not connected right now
//! fail immediately instead of being queued.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod code;
pub mod config;
pub mod error;
pub mod http;
pub mod registry;
pub mod router;
pub mod server;
pub mod sessions;
