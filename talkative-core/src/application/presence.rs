use crate::domain::{Registry, ServerEvent, SessionId, SessionSink};
use tracing::debug;

/// Pushes the connected-session count to every session
///
/// Called after each connect and disconnect. The full count is sent to
/// everyone each time; there is no diffing against what a client last saw.
#[derive(Debug, Default, Clone)]
pub struct PresenceBroadcaster {
    last_count: Option<usize>,
}

impl PresenceBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcast `user-count` with the current registry size
    ///
    /// Returns the sessions whose transport rejected the update.
    pub fn on_membership_change<S: SessionSink>(&mut self, registry: &Registry<S>) -> Vec<SessionId> {
        let count = registry.len();
        self.last_count = Some(count);
        debug!(connected = count, "Broadcasting user count");
        registry.broadcast(&ServerEvent::UserCount(count))
    }

    /// Count carried by the most recent broadcast
    pub fn last_count(&self) -> Option<usize> {
        self.last_count
    }
}
