use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of one connected client, assigned by the transport at connect time
///
/// Never exposed to other clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Matching state of a registered session
///
/// Derived from queue and pairing-table membership, never stored on its own.
/// A session that is no longer registered is destroyed and has no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Connected, neither searching nor paired
    Idle,
    /// Waiting in the queue for a peer
    Queued,
    /// Linked 1:1 with another session
    Paired,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Queued => write!(f, "Queued"),
            SessionState::Paired => write!(f, "Paired"),
        }
    }
}

/// A live client session: its id plus the handle used to push events to it
#[derive(Debug)]
pub struct Session<S> {
    id: SessionId,
    sink: S,
    connected_at: DateTime<Utc>,
}

impl<S> Session<S> {
    pub fn new(id: SessionId, sink: S) -> Self {
        Self {
            id,
            sink,
            connected_at: Utc::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// When the transport reported the connection
    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }
}
