use std::collections::{HashMap, HashSet};

use super::protocol::ConnectionId;

/// Tracks which connections are joined to which rooms.
///
/// Rooms are created on first join and swept once their last member is gone.
/// A reverse index keeps `rooms_of` exact even for connections that never
/// left anything explicitly.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: HashMap<String, HashSet<ConnectionId>>,
    memberships: HashMap<ConnectionId, HashSet<String>>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `conn_id` to the room and returns the other members as they were
    /// before the insertion.
    pub fn join(&mut self, room_id: &str, conn_id: &ConnectionId) -> HashSet<ConnectionId> {
        let members = self.rooms.entry(room_id.to_string()).or_default();
        let others: HashSet<ConnectionId> = members
            .iter()
            .filter(|id| *id != conn_id)
            .cloned()
            .collect();
        members.insert(conn_id.clone());

        self.memberships
            .entry(conn_id.clone())
            .or_default()
            .insert(room_id.to_string());

        others
    }

    /// Removes `conn_id` from the room. Returns whether it was a member.
    pub fn leave(&mut self, room_id: &str, conn_id: &ConnectionId) -> bool {
        let removed = match self.rooms.get_mut(room_id) {
            Some(members) => {
                let removed = members.remove(conn_id);
                if members.is_empty() {
                    self.rooms.remove(room_id);
                }
                removed
            }
            None => false,
        };

        if let Some(rooms) = self.memberships.get_mut(conn_id) {
            rooms.remove(room_id);
            if rooms.is_empty() {
                self.memberships.remove(conn_id);
            }
        }

        removed
    }

    /// Removes the connection from every room at once and returns the rooms
    /// it belonged to.
    pub fn remove_connection(&mut self, conn_id: &ConnectionId) -> HashSet<String> {
        let rooms = self.memberships.remove(conn_id).unwrap_or_default();
        for room_id in &rooms {
            if let Some(members) = self.rooms.get_mut(room_id) {
                members.remove(conn_id);
                if members.is_empty() {
                    self.rooms.remove(room_id);
                }
            }
        }
        rooms
    }

    pub fn rooms_of(&self, conn_id: &ConnectionId) -> HashSet<String> {
        self.memberships.get(conn_id).cloned().unwrap_or_default()
    }

    pub fn members(&self, room_id: &str) -> HashSet<ConnectionId> {
        self.rooms.get(room_id).cloned().unwrap_or_default()
    }

    pub fn is_member(&self, room_id: &str, conn_id: &ConnectionId) -> bool {
        self.rooms
            .get(room_id)
            .is_some_and(|members| members.contains(conn_id))
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> HashSet<ConnectionId> {
        raw.iter().map(|id| ConnectionId::from(*id)).collect()
    }

    #[test]
    fn test_join_creates_room_and_returns_empty_snapshot() {
        let mut directory = RoomDirectory::new();
        let others = directory.join("101", &"a".into());

        assert!(others.is_empty());
        assert_eq!(directory.room_count(), 1);
        assert_eq!(directory.members("101"), ids(&["a"]));
    }

    #[test]
    fn test_join_returns_pre_insertion_others() {
        let mut directory = RoomDirectory::new();
        directory.join("101", &"b".into());
        directory.join("101", &"c".into());

        let others = directory.join("101", &"a".into());
        assert_eq!(others, ids(&["b", "c"]));
        assert_eq!(directory.members("101"), ids(&["a", "b", "c"]));
    }

    #[test]
    fn test_rejoin_excludes_self_from_snapshot() {
        let mut directory = RoomDirectory::new();
        directory.join("101", &"a".into());
        directory.join("101", &"b".into());

        let others = directory.join("101", &"a".into());
        assert_eq!(others, ids(&["b"]));
        assert_eq!(directory.members("101").len(), 2);
    }

    #[test]
    fn test_leave_removes_member_and_sweeps_empty_room() {
        let mut directory = RoomDirectory::new();
        let a = ConnectionId::from("a");
        directory.join("101", &a);
        directory.join("101", &"b".into());

        assert!(directory.leave("101", &a));
        assert!(!directory.is_member("101", &a));
        assert!(directory.rooms_of(&a).is_empty());

        assert!(directory.leave("101", &"b".into()));
        assert_eq!(directory.room_count(), 0);
    }

    #[test]
    fn test_leave_unknown_is_noop() {
        let mut directory = RoomDirectory::new();
        directory.join("101", &"a".into());

        assert!(!directory.leave("101", &"z".into()));
        assert!(!directory.leave("999", &"a".into()));
        assert_eq!(directory.members("101"), ids(&["a"]));
    }

    #[test]
    fn test_rooms_of_tracks_every_joined_room() {
        let mut directory = RoomDirectory::new();
        let a = ConnectionId::from("a");
        directory.join("r1", &a);
        directory.join("r2", &a);
        directory.join("r3", &a);
        directory.leave("r3", &a);

        let rooms = directory.rooms_of(&a);
        assert_eq!(rooms.len(), 2);
        assert!(rooms.contains("r1"));
        assert!(rooms.contains("r2"));
    }

    #[test]
    fn test_remove_connection_clears_all_rooms() {
        let mut directory = RoomDirectory::new();
        let a = ConnectionId::from("a");
        directory.join("r1", &a);
        directory.join("r1", &"b".into());
        directory.join("r2", &a);

        let rooms = directory.remove_connection(&a);
        assert_eq!(rooms.len(), 2);
        assert_eq!(directory.members("r1"), ids(&["b"]));
        assert_eq!(directory.room_count(), 1);

        assert!(directory.remove_connection(&a).is_empty());
    }
}
