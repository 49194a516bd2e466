use std::collections::HashMap;

use tokio::sync::mpsc;

use super::protocol::{ConnectionId, ControlCommand, InboundEvent, NegotiationKind, OutboundEvent};
use super::registry::ConnectionRegistry;
use super::room::RoomDirectory;
use crate::error::{Result, SignalingError};

pub type EventSender = mpsc::UnboundedSender<OutboundEvent>;

/// Counters reported by the health endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoordinatorStats {
    pub connections: usize,
    pub rooms: usize,
}

/// Owns all signaling state: live connections, asserted identities and room
/// memberships.
///
/// Every method runs to completion without suspending, so callers only need
/// to serialize access (see [`super::SignalingServer`]) for handlers to be
/// free of interleaved read-then-write races.
#[derive(Default)]
pub struct Coordinator {
    pub(super) connections: HashMap<ConnectionId, EventSender>,
    pub(super) registry: ConnectionRegistry,
    pub(super) rooms: RoomDirectory,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a live connection and the channel its outbound events go to.
    pub fn connect(&mut self, conn_id: ConnectionId, sender: EventSender) {
        tracing::debug!(conn_id = %conn_id, "Connection registered");
        self.connections.insert(conn_id, sender);
    }

    pub fn is_connected(&self, conn_id: &ConnectionId) -> bool {
        self.connections.contains_key(conn_id)
    }

    /// Dispatches one inbound event from `conn_id` to its handler.
    pub fn handle_event(&mut self, conn_id: &ConnectionId, event: InboundEvent) {
        match event {
            InboundEvent::JoinRoom {
                room_id,
                username,
                role,
            } => self.join(conn_id, room_id.as_deref(), username, role.as_deref()),
            InboundEvent::LeaveRoom { room_id } => self.leave(conn_id, &room_id),
            InboundEvent::Offer { target, sdp } => {
                self.relay(NegotiationKind::Offer, &target, sdp, conn_id)
            }
            InboundEvent::Answer { target, sdp } => {
                self.relay(NegotiationKind::Answer, &target, sdp, conn_id)
            }
            InboundEvent::IceCandidate { target, candidate } => {
                self.relay(NegotiationKind::IceCandidate, &target, candidate, conn_id)
            }
            InboundEvent::MuteStudent { target } => {
                self.issue_command(ControlCommand::Mute, &target, conn_id)
            }
            InboundEvent::UnmuteStudent { target } => {
                self.issue_command(ControlCommand::Unmute, &target, conn_id)
            }
        }
    }

    /// Pushes an event to a live connection. Unknown targets and closed
    /// channels are dropped; returns whether the event was queued.
    pub(super) fn emit(&self, target: &ConnectionId, event: OutboundEvent) -> bool {
        let Some(sender) = self.connections.get(target) else {
            tracing::debug!(target_id = %target, "Dropping event for unknown connection");
            return false;
        };

        if let Err(e) = deliver(sender, target, event) {
            tracing::debug!(target_id = %target, error = %e, "Dropping event");
            return false;
        }
        true
    }

    pub(super) fn emit_all<'a>(
        &self,
        targets: impl IntoIterator<Item = &'a ConnectionId>,
        event: &OutboundEvent,
    ) {
        for target in targets {
            self.emit(target, event.clone());
        }
    }

    pub fn stats(&self) -> CoordinatorStats {
        CoordinatorStats {
            connections: self.connections.len(),
            rooms: self.rooms.room_count(),
        }
    }
}

fn deliver(sender: &EventSender, target: &ConnectionId, event: OutboundEvent) -> Result<()> {
    sender
        .send(event)
        .map_err(|_| SignalingError::ChannelClosed(target.to_string()))
}
