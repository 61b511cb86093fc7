use axum::extract::ws::Message;
use talkative_core::{ServerEvent, SessionId, SessionSink, SinkError};
use tokio::sync::mpsc::{error::TrySendError, Sender};

/// Outbound half of one WebSocket connection
///
/// Events are encoded to JSON text frames and pushed onto the connection's
/// bounded queue without waiting; the writer task drains it to the socket.
#[derive(Debug, Clone)]
pub struct ConnectionSink {
    session_id: SessionId,
    sender: Sender<Message>,
}

impl PartialEq for ConnectionSink {
    fn eq(&self, other: &Self) -> bool {
        self.session_id == other.session_id
    }
}

impl ConnectionSink {
    pub fn new(session_id: SessionId, sender: Sender<Message>) -> Self {
        Self { session_id, sender }
    }
}

impl SessionSink for ConnectionSink {
    fn deliver(&self, event: &ServerEvent) -> Result<(), SinkError> {
        let text = serde_json::to_string(event).map_err(|e| SinkError::Encoding(e.to_string()))?;
        self.sender
            .try_send(Message::Text(text))
            .map_err(|e| match e {
                TrySendError::Full(_) => SinkError::Full,
                TrySendError::Closed(_) => SinkError::Closed,
            })
    }
}
