//! Signaling coordinator for peer-to-peer classroom media sessions.
//!
//! Participants join named rooms over a WebSocket, learn who else is there,
//! and exchange SDP offers/answers and ICE candidates addressed to a specific
//! peer. Teachers can mute and unmute other participants. No media passes
//! through this server.
//!
//! Identities (username and role) are taken as the client asserts them; this
//! layer does not authenticate anyone.

pub mod api;
pub mod config;
pub mod error;
pub mod signaling;

pub use error::{Result, SignalingError};
pub use signaling::SignalingServer;
