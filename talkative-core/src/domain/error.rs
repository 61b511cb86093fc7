use super::session::SessionId;
use super::sink::SinkError;

/// Errors raised by registry and matchmaking operations
///
/// None of these reach end users: `UnknownSession` is a benign race with
/// disconnects and `TransportSendFailure` is recovered by evicting the target.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchError {
    #[error("Session already registered: {0}")]
    DuplicateSession(SessionId),

    #[error("Session not found: {0}")]
    UnknownSession(SessionId),

    #[error("Failed to deliver to session {session}: {reason}")]
    TransportSendFailure { session: SessionId, reason: SinkError },
}

/// A broken structural invariant, reported by `Matchmaker::check_invariants`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("Session {0} is both queued and paired")]
    QueuedAndPaired(SessionId),

    #[error("Session {0} is queued more than once")]
    DuplicateQueueEntry(SessionId),

    #[error("Pairing is not symmetric for {0}")]
    AsymmetricPair(SessionId),

    #[error("Session {0} is paired with itself")]
    SelfPaired(SessionId),

    #[error("Session {0} is referenced but not registered")]
    Unregistered(SessionId),
}
