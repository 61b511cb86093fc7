use super::error::MatchError;
use super::events::ServerEvent;
use super::session::{Session, SessionId};
use super::sink::SessionSink;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Authoritative set of connected sessions
///
/// Owns every `Session` (and thus every transport handle). The waiting queue
/// and pairing table only hold ids.
#[derive(Debug)]
pub struct Registry<S> {
    sessions: HashMap<SessionId, Session<S>>,
}

impl<S> Registry<S> {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Add a newly connected session
    pub fn register(&mut self, session: Session<S>) -> Result<(), MatchError> {
        let id = session.id();
        if self.sessions.contains_key(&id) {
            return Err(MatchError::DuplicateSession(id));
        }
        self.sessions.insert(id, session);
        debug!(session_id = %id, connected = self.sessions.len(), "Session registered");
        Ok(())
    }

    /// Remove a session, dropping its transport handle
    ///
    /// Returns whether the session existed.
    pub fn deregister(&mut self, id: SessionId) -> bool {
        let existed = self.sessions.remove(&id).is_some();
        if existed {
            debug!(session_id = %id, connected = self.sessions.len(), "Session deregistered");
        }
        existed
    }

    pub fn exists(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn get(&self, id: SessionId) -> Option<&Session<S>> {
        self.sessions.get(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = SessionId> + '_ {
        self.sessions.keys().copied()
    }
}

impl<S: SessionSink> Registry<S> {
    /// Deliver an event to one session
    pub fn send(&self, id: SessionId, event: &ServerEvent) -> Result<(), MatchError> {
        let session = self
            .sessions
            .get(&id)
            .ok_or(MatchError::UnknownSession(id))?;

        session
            .sink()
            .deliver(event)
            .map_err(|reason| MatchError::TransportSendFailure {
                session: id,
                reason,
            })
    }

    /// Deliver an event to every registered session
    ///
    /// Returns the sessions whose transport rejected the event; the caller
    /// decides how to recover them.
    pub fn broadcast(&self, event: &ServerEvent) -> Vec<SessionId> {
        let mut failed = Vec::new();
        for session in self.sessions.values() {
            if let Err(e) = session.sink().deliver(event) {
                warn!(
                    session_id = %session.id(),
                    event = event.name(),
                    error = %e,
                    "Broadcast delivery failed"
                );
                failed.push(session.id());
            }
        }
        failed
    }
}

impl<S> Default for Registry<S> {
    fn default() -> Self {
        Self::new()
    }
}
