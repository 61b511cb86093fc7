//! Session state machine
//!
//! Every inbound event is resolved against the sender's current state through
//! one table, so illegal transitions are explicit decisions:
//!
//! ```text
//!   state \ event | find-peer         stop-search       skip-peer         offer/answer/ice/chat
//!   --------------+---------------------------------------------------------------------------
//!   Idle          | RequestPeer       Ignore(NotQueued) Ignore(NotPaired) Ignore(NotPaired)
//!   Queued        | Ignore(Queued)    StopSearch        Ignore(NotPaired) Ignore(NotPaired)
//!   Paired        | Ignore(Paired)    Ignore(NotQueued) Skip              Relay
//! ```

use crate::domain::{ClientEvent, Control, SessionState, Signal};
use std::fmt;

/// What the matchmaker does in response to an inbound event
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RequestPeer,
    StopSearch,
    Skip,
    Relay(Signal),
    Ignore(IgnoreReason),
}

/// Why an inbound event leaves the session unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Duplicate `find-peer` while already waiting
    AlreadyQueued,
    /// `find-peer` while a peer is already assigned
    AlreadyPaired,
    /// `stop-search` from a session that is not waiting
    NotQueued,
    /// Skip or relay from a session without a peer
    NotPaired,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::AlreadyQueued => write!(f, "already queued"),
            IgnoreReason::AlreadyPaired => write!(f, "already paired"),
            IgnoreReason::NotQueued => write!(f, "not queued"),
            IgnoreReason::NotPaired => write!(f, "not paired"),
        }
    }
}

/// Resolve `(state, event)` to an action
pub fn dispatch(state: SessionState, event: ClientEvent) -> Action {
    let control = match event.into_signal() {
        Ok(signal) => {
            return match state {
                SessionState::Paired => Action::Relay(signal),
                SessionState::Idle | SessionState::Queued => {
                    Action::Ignore(IgnoreReason::NotPaired)
                }
            };
        }
        Err(control) => control,
    };

    match (state, control) {
        (SessionState::Idle, Control::FindPeer) => Action::RequestPeer,
        (SessionState::Queued, Control::FindPeer) => Action::Ignore(IgnoreReason::AlreadyQueued),
        (SessionState::Paired, Control::FindPeer) => Action::Ignore(IgnoreReason::AlreadyPaired),

        (SessionState::Queued, Control::StopSearch) => Action::StopSearch,
        (SessionState::Idle | SessionState::Paired, Control::StopSearch) => {
            Action::Ignore(IgnoreReason::NotQueued)
        }

        (SessionState::Paired, Control::SkipPeer) => Action::Skip,
        (SessionState::Idle | SessionState::Queued, Control::SkipPeer) => {
            Action::Ignore(IgnoreReason::NotPaired)
        }
    }
}
