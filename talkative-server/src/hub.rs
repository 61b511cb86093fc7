//! Single-owner matchmaker task
//!
//! Connection tasks never touch matchmaking state directly. They submit
//! `HubCommand`s over a bounded channel and one task applies them in order,
//! so no command observes a half-applied pairing.

use crate::connection::ConnectionSink;
use crate::error::{Result, ServerError};
use talkative_core::{ClientEvent, MatchError, Matchmaker, MatchmakerSnapshot, Outcome, SessionId};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument};

#[derive(Debug)]
pub enum HubCommand {
    Connect {
        id: SessionId,
        sink: ConnectionSink,
        reply: oneshot::Sender<std::result::Result<(), MatchError>>,
    },
    Event {
        id: SessionId,
        event: ClientEvent,
    },
    Disconnect {
        id: SessionId,
    },
    Snapshot {
        reply: oneshot::Sender<MatchmakerSnapshot>,
    },
}

/// Cloneable handle to the matchmaker task
#[derive(Debug, Clone)]
pub struct HubHandle {
    sender: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    /// Start the matchmaker task; it stops once every handle is dropped
    pub fn spawn(command_buffer: usize) -> Self {
        let (sender, receiver) = mpsc::channel(command_buffer.max(1));
        tokio::spawn(run(receiver));
        Self { sender }
    }

    pub async fn connect(&self, id: SessionId, sink: ConnectionSink) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.send(HubCommand::Connect { id, sink, reply }).await?;
        response.await.map_err(|_| ServerError::HubClosed)??;
        Ok(())
    }

    pub async fn submit(&self, id: SessionId, event: ClientEvent) -> Result<()> {
        self.send(HubCommand::Event { id, event }).await
    }

    pub async fn disconnect(&self, id: SessionId) -> Result<()> {
        self.send(HubCommand::Disconnect { id }).await
    }

    pub async fn snapshot(&self) -> Result<MatchmakerSnapshot> {
        let (reply, response) = oneshot::channel();
        self.send(HubCommand::Snapshot { reply }).await?;
        response.await.map_err(|_| ServerError::HubClosed)
    }

    async fn send(&self, command: HubCommand) -> Result<()> {
        self.sender
            .send(command)
            .await
            .map_err(|_| ServerError::HubClosed)
    }
}

#[instrument(skip(receiver))]
async fn run(mut receiver: mpsc::Receiver<HubCommand>) {
    info!("Matchmaker hub started");
    let mut matchmaker: Matchmaker<ConnectionSink> = Matchmaker::new();

    while let Some(command) = receiver.recv().await {
        match command {
            HubCommand::Connect { id, sink, reply } => {
                let result = matchmaker.connect(id, sink);
                // The connection may already be gone; its disconnect follows
                let _ = reply.send(result);
            }
            HubCommand::Event { id, event } => {
                let name = event.name();
                let outcome = matchmaker.handle(id, event);
                log_outcome(id, name, outcome);
            }
            HubCommand::Disconnect { id } => {
                matchmaker.disconnect(id);
            }
            HubCommand::Snapshot { reply } => {
                let _ = reply.send(matchmaker.snapshot());
            }
        }
    }

    info!("Matchmaker hub stopped");
}

fn log_outcome(id: SessionId, event: &str, outcome: Outcome) {
    match outcome {
        Outcome::Relayed(peer) => debug!(session_id = %id, peer_id = %peer, event, "Relayed"),
        Outcome::MatchLost(peer) => {
            info!(session_id = %id, peer_id = %peer, "Match lost to a dead connection")
        }
        Outcome::UnknownSession => debug!(session_id = %id, event, "Event after disconnect"),
        other => debug!(session_id = %id, event, outcome = ?other, "Event handled"),
    }
}
