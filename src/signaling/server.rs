use std::sync::Arc;

use tokio::sync::Mutex;

use super::coordinator::{Coordinator, CoordinatorStats, EventSender};
use super::protocol::{ConnectionId, InboundEvent, OutboundEvent};

/// Shared handle to the coordinator.
///
/// The whole coordinator sits behind one mutex that each handler holds for
/// its full run, so inbound events are processed strictly one at a time
/// across all connections.
#[derive(Clone, Default)]
pub struct SignalingServer {
    coordinator: Arc<Mutex<Coordinator>>,
}

impl SignalingServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a fresh id to a new transport connection and registers its
    /// outbound channel. The connection is greeted with `connected`.
    pub async fn register_connection(&self, sender: EventSender) -> ConnectionId {
        let mut coordinator = self.coordinator.lock().await;

        let mut conn_id = ConnectionId::generate();
        while coordinator.is_connected(&conn_id) {
            conn_id = ConnectionId::generate();
        }

        coordinator.connect(conn_id.clone(), sender);
        coordinator.emit(&conn_id, OutboundEvent::Connected { id: conn_id.clone() });
        conn_id
    }

    pub async fn handle_event(&self, conn_id: &ConnectionId, event: InboundEvent) {
        self.coordinator.lock().await.handle_event(conn_id, event);
    }

    pub async fn disconnect(&self, conn_id: &ConnectionId) {
        self.coordinator.lock().await.disconnect(conn_id);
    }

    pub async fn stats(&self) -> CoordinatorStats {
        self.coordinator.lock().await.stats()
    }
}
