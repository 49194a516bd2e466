use std::collections::HashMap;

use super::protocol::{ConnectionId, Role, UserInfo};

/// Username reported for connections that never asserted one.
pub const UNKNOWN_USERNAME: &str = "Unknown";

/// Identity as asserted by the client in its latest join.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub username: Option<String>,
    pub role: Option<Role>,
}

/// Maps connection ids to their asserted identities.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    identities: HashMap<ConnectionId, Identity>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the identity for a connection. Later calls overwrite earlier ones.
    pub fn set_identity(&mut self, conn_id: &ConnectionId, username: Option<String>, role: Option<Role>) {
        self.identities
            .insert(conn_id.clone(), Identity { username, role });
    }

    pub fn asserted(&self, conn_id: &ConnectionId) -> Option<&Identity> {
        self.identities.get(conn_id)
    }

    /// Resolves a connection to a roster entry, substituting
    /// `Unknown`/`student` for anything missing.
    pub fn resolve(&self, conn_id: &ConnectionId) -> UserInfo {
        let identity = self.identities.get(conn_id);

        let username = identity
            .and_then(|i| i.username.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_USERNAME)
            .to_string();
        let role = identity.and_then(|i| i.role).unwrap_or(Role::Student);

        UserInfo {
            user_id: conn_id.clone(),
            username,
            role,
        }
    }

    /// A connection may issue control commands only when it asserted both a
    /// non-empty username and the teacher role.
    pub fn is_authorized(&self, conn_id: &ConnectionId) -> bool {
        match self.identities.get(conn_id) {
            Some(Identity {
                username: Some(username),
                role: Some(Role::Teacher),
            }) => !username.is_empty(),
            _ => false,
        }
    }

    pub fn remove(&mut self, conn_id: &ConnectionId) -> Option<Identity> {
        self.identities.remove(conn_id)
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}
