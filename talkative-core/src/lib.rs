pub mod application;
pub mod domain;

pub use application::{
    dispatch, Action, IgnoreReason, Matchmaker, MatchmakerSnapshot, Outcome, PairingEngine,
    PairingOutcome, PresenceBroadcaster, RelayOutcome, RelayRouter,
};
pub use domain::{
    ChatMessage, ClientEvent, Control, InvariantViolation, MatchError, PairingTable,
    Registry, RelayKind, ServerEvent, Session, SessionId, SessionSink, SessionState, Signal,
    SinkError, WaitingQueue,
};

#[cfg(feature = "testing")]
pub use domain::MemorySink;
