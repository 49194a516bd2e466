use serde_json::Value;

use super::coordinator::Coordinator;
use super::protocol::{ConnectionId, NegotiationKind};

impl Coordinator {
    /// Forwards a negotiation payload to `target`, tagged with the sender.
    ///
    /// The payload is passed through untouched. Delivery is best effort: an
    /// unknown target drops the message without telling the sender.
    pub fn relay(&self, kind: NegotiationKind, target: &ConnectionId, payload: Value, sender: &ConnectionId) {
        let delivered = self.emit(target, kind.into_event(payload, sender.clone()));

        tracing::debug!(
            kind = kind.as_str(),
            sender = %sender,
            target_id = %target,
            delivered,
            "Relayed negotiation message"
        );
    }
}
