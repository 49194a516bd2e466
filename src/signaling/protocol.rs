//! Wire-level event types.
//!
//! Every frame is a JSON object `{"event": "<name>", "data": <payload>}`.
//! Payload-less events (`mute`, `unmute`) carry no `data` key.

use std::fmt;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const CONNECTION_ID_LEN: usize = 20;

/// Opaque per-connection identifier assigned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn generate() -> Self {
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(CONNECTION_ID_LEN)
            .map(char::from)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ConnectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ConnectionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Asserted participant role. Not verified by this server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    /// Parses a role exactly as the client asserted it. Anything other than
    /// `teacher` or `student` counts as no role at all.
    pub fn from_asserted(raw: &str) -> Option<Self> {
        match raw {
            "teacher" => Some(Role::Teacher),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

/// Roster entry describing one room member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_id: ConnectionId,
    pub username: String,
    pub role: Role,
}

/// Point-to-point negotiation message kinds forwarded by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationKind {
    Offer,
    Answer,
    IceCandidate,
}

impl NegotiationKind {
    /// Wraps an opaque payload into the outbound event for this kind.
    pub fn into_event(self, payload: Value, sender: ConnectionId) -> OutboundEvent {
        match self {
            NegotiationKind::Offer => OutboundEvent::Offer { sdp: payload, sender },
            NegotiationKind::Answer => OutboundEvent::Answer { sdp: payload, sender },
            NegotiationKind::IceCandidate => OutboundEvent::IceCandidate {
                candidate: payload,
                sender,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NegotiationKind::Offer => "offer",
            NegotiationKind::Answer => "answer",
            NegotiationKind::IceCandidate => "ice-candidate",
        }
    }
}

/// Privileged commands only a teacher may issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Mute,
    Unmute,
}

impl ControlCommand {
    pub fn into_event(self) -> OutboundEvent {
        match self {
            ControlCommand::Mute => OutboundEvent::Mute,
            ControlCommand::Unmute => OutboundEvent::Unmute,
        }
    }
}

/// Events a client sends to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum InboundEvent {
    JoinRoom {
        #[serde(default)]
        room_id: Option<String>,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        role: Option<String>,
    },

    LeaveRoom {
        room_id: String,
    },

    Offer {
        target: ConnectionId,
        #[serde(default)]
        sdp: Value,
    },

    Answer {
        target: ConnectionId,
        #[serde(default)]
        sdp: Value,
    },

    IceCandidate {
        target: ConnectionId,
        #[serde(default)]
        candidate: Value,
    },

    MuteStudent {
        target: ConnectionId,
    },

    UnmuteStudent {
        target: ConnectionId,
    },
}

/// Events the server pushes to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum OutboundEvent {
    /// Sent once when the transport accepts a connection.
    Connected { id: ConnectionId },

    AllUsers(Vec<UserInfo>),

    UserJoined(UserInfo),

    UserLeft(ConnectionId),

    Offer { sdp: Value, sender: ConnectionId },

    Answer { sdp: Value, sender: ConnectionId },

    IceCandidate { candidate: Value, sender: ConnectionId },

    Mute,

    Unmute,
}
