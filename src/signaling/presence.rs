//! Room presence: rosters for joiners and join/leave notifications for
//! everyone already in the room.

use super::coordinator::Coordinator;
use super::protocol::{ConnectionId, OutboundEvent, Role, UserInfo};

impl Coordinator {
    /// Joins `conn_id` to a room under the asserted identity.
    ///
    /// The joiner receives `all-users` with every other member; the other
    /// members each receive one `user-joined`. A missing or empty room id
    /// ignores the join entirely.
    pub fn join(
        &mut self,
        conn_id: &ConnectionId,
        room_id: Option<&str>,
        username: Option<String>,
        role: Option<&str>,
    ) {
        let Some(room_id) = room_id.filter(|id| !id.is_empty()) else {
            tracing::warn!(conn_id = %conn_id, "Ignoring join without a room id");
            return;
        };

        self.registry
            .set_identity(conn_id, username, role.and_then(Role::from_asserted));

        // Snapshot is taken before the joiner is inserted.
        let others = self.rooms.join(room_id, conn_id);

        let roster: Vec<UserInfo> = others.iter().map(|id| self.registry.resolve(id)).collect();
        let joiner = self.registry.resolve(conn_id);

        tracing::info!(
            conn_id = %conn_id,
            room_id = %room_id,
            username = %joiner.username,
            role = ?joiner.role,
            existing = roster.len(),
            "Connection joined room"
        );

        self.emit(conn_id, OutboundEvent::AllUsers(roster));
        self.emit_all(&others, &OutboundEvent::UserJoined(joiner));
    }

    /// Leaves a single room, notifying its remaining members.
    pub fn leave(&mut self, conn_id: &ConnectionId, room_id: &str) {
        if !self.rooms.leave(room_id, conn_id) {
            tracing::debug!(conn_id = %conn_id, room_id = %room_id, "Leave for a room not joined");
            return;
        }

        tracing::info!(conn_id = %conn_id, room_id = %room_id, "Connection left room");
        let remaining = self.rooms.members(room_id);
        self.emit_all(&remaining, &OutboundEvent::UserLeft(conn_id.clone()));
    }

    /// Tears down everything held for a closed connection.
    ///
    /// Every room it belonged to gets one `user-left`. Safe to call again
    /// after the connection is gone.
    pub fn disconnect(&mut self, conn_id: &ConnectionId) {
        let rooms = self.rooms.remove_connection(conn_id);
        let left = OutboundEvent::UserLeft(conn_id.clone());

        for room_id in &rooms {
            let remaining = self.rooms.members(room_id);
            tracing::debug!(
                conn_id = %conn_id,
                room_id = %room_id,
                notified = remaining.len(),
                "Announcing departure"
            );
            self.emit_all(&remaining, &left);
        }

        self.registry.remove(conn_id);
        if self.connections.remove(conn_id).is_some() {
            tracing::info!(conn_id = %conn_id, rooms = rooms.len(), "Connection cleaned up");
        }
    }
}
