use crate::connection::ConnectionSink;
use crate::hub::HubHandle;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::WebSocketUpgrade;
use axum::response::IntoResponse;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::ops::ControlFlow;
use talkative_core::{ClientEvent, SessionId};
use tokio::sync::mpsc::Receiver;
use tracing::{debug, error, info, instrument, warn};

#[instrument(skip(ws, hub))]
pub async fn handle_websocket(
    ws: WebSocketUpgrade,
    hub: HubHandle,
    outbound_buffer: usize,
) -> impl IntoResponse {
    debug!("New WebSocket upgrade request");
    ws.on_upgrade(move |socket| listen(socket, hub, outbound_buffer))
}

#[instrument(skip(socket, hub), fields(session_id))]
async fn listen(socket: WebSocket, hub: HubHandle, outbound_buffer: usize) {
    let session_id = SessionId::new();
    tracing::Span::current().record("session_id", tracing::field::display(session_id));
    debug!("WebSocket connection established");

    let (ws_sender, ws_receiver) = socket.split();
    let (tx, rx) = tokio::sync::mpsc::channel(outbound_buffer.max(1));

    // The hub owns the only sender from here on; dropping it ends the writer
    if let Err(e) = hub.connect(session_id, ConnectionSink::new(session_id, tx)).await {
        error!(error = %e, "Failed to register session");
        return;
    }

    let sender_task = handle_outgoing_messages(rx, ws_sender);
    let receiver_task = handle_incoming_messages(ws_receiver, session_id, &hub);

    tokio::select! {
        _ = sender_task => {
            info!(%session_id, "Sender task completed");
        }
        _ = receiver_task => {
            info!(%session_id, "Receiver task completed");
        }
    }

    if let Err(e) = hub.disconnect(session_id).await {
        error!(error = %e, "Failed to disconnect");
    }
}

#[instrument(skip(rx, ws_sender))]
pub async fn handle_outgoing_messages(
    mut rx: Receiver<Message>,
    mut ws_sender: SplitSink<WebSocket, Message>,
) {
    debug!("Started handling outgoing messages");
    while let Some(msg) = rx.recv().await {
        if let Err(e) = ws_sender.send(msg).await {
            error!(error = ?e, "Failed to send message");
            return;
        }
    }

    // Session was evicted by the hub
    debug!("Outbound queue closed, closing socket");
    let _ = ws_sender.close().await;
}

#[instrument(skip(receiver, hub))]
pub async fn handle_incoming_messages(
    mut receiver: SplitStream<WebSocket>,
    session_id: SessionId,
    hub: &HubHandle,
) {
    debug!("Started handling incoming messages");

    while let Some(message) = receiver.next().await {
        match message {
            Ok(message) => {
                if handle_message(message, session_id, hub).await.is_break() {
                    break;
                }
            }
            Err(e) => {
                error!(error = ?e, "Failed to receive message");
                break;
            }
        }
    }
}

#[instrument(skip(message, hub))]
pub async fn handle_message(
    message: Message,
    session_id: SessionId,
    hub: &HubHandle,
) -> ControlFlow<()> {
    match message {
        Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
            Ok(event) => {
                debug!(event = event.name(), "Parsed event");
                if let Err(e) = hub.submit(session_id, event).await {
                    error!(error = %e, "Failed to submit event");
                    return ControlFlow::Break(());
                }
            }
            Err(e) => {
                warn!(error = %e, text = ?text, "Ignoring unparseable frame");
            }
        },
        Message::Close(_) => {
            info!("Client disconnected");
            return ControlFlow::Break(());
        }
        Message::Ping(_) | Message::Pong(_) => {}
        Message::Binary(_) => {
            warn!("Unsupported binary frame");
        }
    }
    ControlFlow::Continue(())
}
