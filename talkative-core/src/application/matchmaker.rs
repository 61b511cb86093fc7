use super::dispatch::{dispatch, Action, IgnoreReason};
use super::pairing_engine::{PairingEngine, PairingOutcome};
use super::presence::PresenceBroadcaster;
use super::relay_router::{RelayOutcome, RelayRouter};
use crate::domain::{
    ClientEvent, InvariantViolation, MatchError, Registry, ServerEvent, Session, SessionId,
    SessionSink, SessionState,
};
use chrono::Utc;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, warn};

/// Result of handling one inbound event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Matched(SessionId),
    /// A match was made but one side could not be told and was evicted;
    /// the survivor is back to Idle
    MatchLost(SessionId),
    Waiting,
    SearchStopped,
    Skipped(SessionId),
    Relayed(SessionId),
    /// Relay with no live peer to receive it
    Dropped,
    Ignored(IgnoreReason),
    /// Sender is not (or no longer) connected
    UnknownSession,
}

/// Counts exposed by the status probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchmakerSnapshot {
    pub connected: usize,
    pub waiting: usize,
    pub pairs: usize,
    pub last_user_count: Option<usize>,
}

/// Owns every piece of matchmaking state
///
/// All mutation goes through `&mut self`, so one owner (the server's hub
/// task, or a test) serializes every operation. Sessions whose transport
/// rejects a delivery are evicted through the disconnect path before the
/// operation returns.
#[derive(Debug)]
pub struct Matchmaker<S> {
    registry: Registry<S>,
    engine: PairingEngine,
    presence: PresenceBroadcaster,
}

impl<S> Default for Matchmaker<S> {
    fn default() -> Self {
        Self {
            registry: Registry::new(),
            engine: PairingEngine::new(),
            presence: PresenceBroadcaster::new(),
        }
    }
}

impl<S: SessionSink> Matchmaker<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and broadcast the new count
    pub fn connect(&mut self, id: SessionId, sink: S) -> Result<(), MatchError> {
        self.registry.register(Session::new(id, sink))?;
        info!(session_id = %id, connected = self.registry.len(), "Session connected");

        let failed = self.presence.on_membership_change(&self.registry);
        self.evict_all(failed);
        Ok(())
    }

    /// Tear down a session; returns whether it was connected
    pub fn disconnect(&mut self, id: SessionId) -> bool {
        if !self.registry.exists(id) {
            debug!(session_id = %id, "Disconnect for unknown session");
            return false;
        }
        self.evict_all([id]);
        true
    }

    /// Apply one inbound event from `id`
    pub fn handle(&mut self, id: SessionId, event: ClientEvent) -> Outcome {
        if !self.registry.exists(id) {
            debug!(session_id = %id, event = event.name(), "Event from unknown session");
            return Outcome::UnknownSession;
        }

        let state = self.engine.state_of(id);
        match dispatch(state, event) {
            Action::RequestPeer => self.request_peer(id),
            Action::StopSearch => {
                self.engine.stop_search(id);
                Outcome::SearchStopped
            }
            Action::Skip => match self.engine.skip(id) {
                Some(peer) => {
                    self.notify(peer, &ServerEvent::PeerDisconnected);
                    Outcome::Skipped(peer)
                }
                None => Outcome::Ignored(IgnoreReason::NotPaired),
            },
            Action::Relay(signal) => {
                let result = RelayRouter::new(&self.registry, self.engine.pairs()).relay(id, signal);
                match result {
                    Ok(RelayOutcome::Forwarded { to }) => Outcome::Relayed(to),
                    Ok(RelayOutcome::Dropped) => Outcome::Dropped,
                    Err(MatchError::TransportSendFailure { session, reason }) => {
                        warn!(session_id = %session, error = %reason, "Relay delivery failed");
                        self.evict_all([session]);
                        Outcome::Dropped
                    }
                    Err(e) => {
                        debug!(session_id = %id, error = %e, "Relay target vanished");
                        Outcome::Dropped
                    }
                }
            }
            Action::Ignore(reason) => {
                debug!(session_id = %id, %state, %reason, "Event ignored");
                Outcome::Ignored(reason)
            }
        }
    }

    fn request_peer(&mut self, id: SessionId) -> Outcome {
        match self.engine.request_peer(id) {
            PairingOutcome::Matched { peer } => {
                // Both sides hear about the match before anything else happens
                let mut failed = Vec::new();
                for target in [id, peer] {
                    if let Err(e) = self.registry.send(target, &ServerEvent::Matched) {
                        warn!(session_id = %target, error = %e, "Match notification failed");
                        failed.push(target);
                    }
                }
                self.evict_all(failed);

                if self.registry.exists(id) && self.registry.exists(peer) {
                    Outcome::Matched(peer)
                } else {
                    Outcome::MatchLost(peer)
                }
            }
            PairingOutcome::Waiting => Outcome::Waiting,
            PairingOutcome::AlreadyPaired => Outcome::Ignored(IgnoreReason::AlreadyPaired),
        }
    }

    /// Send to one session, evicting it if its transport is gone
    fn notify(&mut self, id: SessionId, event: &ServerEvent) {
        match self.registry.send(id, event) {
            Ok(()) => {}
            Err(MatchError::TransportSendFailure { session, reason }) => {
                warn!(session_id = %session, event = event.name(), error = %reason, "Delivery failed");
                self.evict_all([session]);
            }
            Err(e) => debug!(error = %e, "Notification skipped"),
        }
    }

    /// Run the disconnect path for each id, and for every session whose
    /// delivery fails along the way, until nothing is left to evict
    fn evict_all(&mut self, ids: impl IntoIterator<Item = SessionId>) {
        let mut worklist: VecDeque<SessionId> = ids.into_iter().collect();

        while let Some(id) = worklist.pop_front() {
            let Some(session) = self.registry.get(id) else {
                continue;
            };
            let lifetime = Utc::now() - session.connected_at();

            let peer = self.engine.release(id);
            self.registry.deregister(id);
            info!(
                session_id = %id,
                connected = self.registry.len(),
                lifetime_secs = lifetime.num_seconds(),
                "Session disconnected"
            );

            if let Some(peer) = peer {
                if let Err(e) = self.registry.send(peer, &ServerEvent::PeerDisconnected) {
                    warn!(session_id = %peer, error = %e, "Peer notification failed");
                    worklist.push_back(peer);
                }
            }

            for failed in self.presence.on_membership_change(&self.registry) {
                if !worklist.contains(&failed) {
                    worklist.push_back(failed);
                }
            }
        }
    }
}

impl<S> Matchmaker<S> {
    /// Current state of a connected session; `None` once disconnected
    pub fn state_of(&self, id: SessionId) -> Option<SessionState> {
        self.registry
            .exists(id)
            .then(|| self.engine.state_of(id))
    }

    pub fn peer_of(&self, id: SessionId) -> Option<SessionId> {
        self.engine.peer_of(id)
    }

    pub fn is_connected(&self, id: SessionId) -> bool {
        self.registry.exists(id)
    }

    pub fn waiting(&self) -> Vec<SessionId> {
        self.engine.queue().iter().collect()
    }

    pub fn snapshot(&self) -> MatchmakerSnapshot {
        MatchmakerSnapshot {
            connected: self.registry.len(),
            waiting: self.engine.queue().len(),
            pairs: self.engine.pairs().len(),
            last_user_count: self.presence.last_count(),
        }
    }

    /// Verify the structural invariants across registry, queue and pairs
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let pairs = self.engine.pairs();
        let mut seen = HashSet::new();

        for id in self.engine.queue().iter() {
            if !seen.insert(id) {
                return Err(InvariantViolation::DuplicateQueueEntry(id));
            }
            if !self.registry.exists(id) {
                return Err(InvariantViolation::Unregistered(id));
            }
            if pairs.contains(id) {
                return Err(InvariantViolation::QueuedAndPaired(id));
            }
        }

        for (id, peer) in pairs.entries() {
            if id == peer {
                return Err(InvariantViolation::SelfPaired(id));
            }
            if pairs.peer_of(peer) != Some(id) {
                return Err(InvariantViolation::AsymmetricPair(id));
            }
            if !self.registry.exists(id) {
                return Err(InvariantViolation::Unregistered(id));
            }
        }

        Ok(())
    }
}
