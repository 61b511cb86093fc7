use crate::domain::{PairingTable, SessionId, SessionState, WaitingQueue};
use tracing::{debug, info};

/// Result of a `request_peer` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingOutcome {
    /// Linked with the oldest other waiting session
    Matched { peer: SessionId },
    /// Nobody else is waiting; the requester is now (or still) queued
    Waiting,
    /// Requester already has a peer; nothing changed
    AlreadyPaired,
}

/// Owns the waiting queue and the pairing table
///
/// Pure state transitions; notifying sessions is left to the caller so the
/// engine stays independent of the transport.
#[derive(Debug, Default, Clone)]
pub struct PairingEngine {
    queue: WaitingQueue,
    pairs: PairingTable,
}

impl PairingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match the requester with the oldest other waiting session, or enqueue it
    pub fn request_peer(&mut self, id: SessionId) -> PairingOutcome {
        if self.pairs.contains(id) {
            debug!(session_id = %id, "Peer requested while already paired");
            return PairingOutcome::AlreadyPaired;
        }

        match self.queue.dequeue_oldest_except(id) {
            Some(peer) => {
                self.queue.remove(id);
                self.pairs.link(id, peer);
                info!(session_id = %id, peer_id = %peer, "Sessions matched");
                PairingOutcome::Matched { peer }
            }
            None => {
                if self.queue.enqueue(id) {
                    debug!(session_id = %id, waiting = self.queue.len(), "Session queued");
                }
                PairingOutcome::Waiting
            }
        }
    }

    /// Leave the waiting queue; returns whether the session was queued
    pub fn stop_search(&mut self, id: SessionId) -> bool {
        let removed = self.queue.remove(id);
        if removed {
            debug!(session_id = %id, "Search stopped");
        }
        removed
    }

    /// Drop the current peer; returns the former peer if there was one
    pub fn skip(&mut self, id: SessionId) -> Option<SessionId> {
        let peer = self.pairs.unlink(id)?;
        info!(session_id = %id, peer_id = %peer, "Peer skipped");
        Some(peer)
    }

    /// Remove every trace of a session (queue slot and pairing entry)
    ///
    /// Returns the former peer if the session was paired.
    pub fn release(&mut self, id: SessionId) -> Option<SessionId> {
        self.queue.remove(id);
        self.pairs.unlink(id)
    }

    pub fn state_of(&self, id: SessionId) -> SessionState {
        if self.pairs.contains(id) {
            SessionState::Paired
        } else if self.queue.contains(id) {
            SessionState::Queued
        } else {
            SessionState::Idle
        }
    }

    pub fn peer_of(&self, id: SessionId) -> Option<SessionId> {
        self.pairs.peer_of(id)
    }

    pub fn queue(&self) -> &WaitingQueue {
        &self.queue
    }

    pub fn pairs(&self) -> &PairingTable {
        &self.pairs
    }
}
