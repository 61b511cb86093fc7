use crate::domain::{MatchError, PairingTable, Registry, SessionId, SessionSink, Signal};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Payload handed to the peer's transport
    Forwarded { to: SessionId },
    /// Sender has no peer; nothing was sent
    Dropped,
}

/// Forwards signaling and chat payloads to the sender's current peer
///
/// Borrows the registry and the pairing table for the duration of one relay.
pub struct RelayRouter<'a, S> {
    registry: &'a Registry<S>,
    pairs: &'a PairingTable,
}

impl<'a, S: SessionSink> RelayRouter<'a, S> {
    pub fn new(registry: &'a Registry<S>, pairs: &'a PairingTable) -> Self {
        Self { registry, pairs }
    }

    /// Forward `signal` verbatim to the peer of `sender`
    ///
    /// A delivery failure names the peer, so the caller can evict it.
    pub fn relay(&self, sender: SessionId, signal: Signal) -> Result<RelayOutcome, MatchError> {
        let Some(peer) = self.pairs.peer_of(sender) else {
            debug!(session_id = %sender, kind = %signal.kind(), "Relay dropped, no peer");
            return Ok(RelayOutcome::Dropped);
        };

        let kind = signal.kind();
        self.registry.send(peer, &signal.into_server_event())?;
        trace!(session_id = %sender, peer_id = %peer, %kind, "Relayed");
        Ok(RelayOutcome::Forwarded { to: peer })
    }
}
