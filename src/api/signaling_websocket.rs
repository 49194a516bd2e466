use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use warp::ws::{Message, WebSocket};

use crate::error::{Result, SignalingError};
use crate::signaling::{InboundEvent, OutboundEvent, SignalingHandler, SignalingServer};

pub async fn handle_signaling_websocket(websocket: WebSocket, server: SignalingServer) {
    let (ws_sender, mut ws_receiver) = websocket.split();
    let (tx, rx) = mpsc::unbounded_channel::<OutboundEvent>();

    let mut handler = SignalingHandler::new(server, tx).await;
    let conn_id = handler.conn_id().clone();

    let sender_task = tokio::spawn(forward_events(rx, ws_sender));

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(message) if message.is_close() => break,
            Ok(message) => handle_websocket_message(&mut handler, message).await,
            Err(e) => {
                let e = SignalingError::from(e);
                tracing::error!(conn_id = %conn_id, error = %e, "WebSocket receive failed");
                break;
            }
        }
    }

    handler.cleanup().await;
    sender_task.abort();
}

/// Serializes queued events onto the socket until either side goes away.
async fn forward_events(
    mut rx: mpsc::UnboundedReceiver<OutboundEvent>,
    mut ws_sender: SplitSink<WebSocket, Message>,
) {
    while let Some(event) = rx.recv().await {
        let message = match encode_event(&event) {
            Ok(message) => message,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize outbound event");
                continue;
            }
        };

        if let Err(e) = ws_sender.send(message).await {
            let e = SignalingError::from(e);
            tracing::error!(error = %e, "Failed to send WebSocket message");
            break;
        }
    }
}

async fn handle_websocket_message(handler: &mut SignalingHandler, message: Message) {
    let Ok(text) = message.to_str() else {
        return;
    };
    tracing::trace!(conn_id = %handler.conn_id(), "Received message: {}", text);

    match decode_event(text) {
        Ok(event) => handler.handle_message(event).await,
        Err(e) => {
            tracing::warn!(
                conn_id = %handler.conn_id(),
                error = %e,
                raw_message = %text,
                "Failed to parse signaling message"
            );
        }
    }
}

fn decode_event(text: &str) -> Result<InboundEvent> {
    Ok(serde_json::from_str(text)?)
}

fn encode_event(event: &OutboundEvent) -> Result<Message> {
    Ok(Message::text(serde_json::to_string(event)?))
}
