use super::coordinator::EventSender;
use super::protocol::{ConnectionId, InboundEvent};
use super::server::SignalingServer;

/// Per-connection front end to the shared [`SignalingServer`].
///
/// Created when the transport accepts a connection and dropped when it
/// closes; `cleanup` runs the disconnect path at most once.
pub struct SignalingHandler {
    server: SignalingServer,
    conn_id: ConnectionId,
    closed: bool,
}

impl SignalingHandler {
    pub async fn new(server: SignalingServer, sender: EventSender) -> Self {
        let conn_id = server.register_connection(sender).await;
        tracing::info!(conn_id = %conn_id, "Client connected");

        Self {
            server,
            conn_id,
            closed: false,
        }
    }

    pub fn conn_id(&self) -> &ConnectionId {
        &self.conn_id
    }

    pub async fn handle_message(&mut self, event: InboundEvent) {
        if self.closed {
            return;
        }
        self.server.handle_event(&self.conn_id, event).await;
    }

    pub async fn cleanup(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.server.disconnect(&self.conn_id).await;
        tracing::info!(conn_id = %self.conn_id, "Client disconnected");
    }
}
