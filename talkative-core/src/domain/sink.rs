use super::events::ServerEvent;

/// Transport handle used to push events to one client
///
/// Delivery must be fire-and-forget: implementations enqueue onto the
/// connection's own send queue and return immediately.
pub trait SessionSink {
    fn deliver(&self, event: &ServerEvent) -> Result<(), SinkError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    #[error("outbound queue is full")]
    Full,

    #[error("outbound channel is closed")]
    Closed,

    #[error("failed to encode event: {0}")]
    Encoding(String),
}

#[cfg(any(test, feature = "testing"))]
pub use memory::MemorySink;

#[cfg(any(test, feature = "testing"))]
mod memory {
    use super::{ServerEvent, SessionSink, SinkError};
    use std::sync::{Arc, Mutex};

    /// In-memory sink that records every delivered event
    ///
    /// Clones share the same inbox, so a test can keep one handle while the
    /// registry owns another. `close` simulates a dead transport.
    #[derive(Debug, Clone, Default)]
    pub struct MemorySink {
        inner: Arc<Mutex<MemoryInbox>>,
    }

    #[derive(Debug, Default)]
    struct MemoryInbox {
        events: Vec<ServerEvent>,
        closed: bool,
    }

    impl MemorySink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every further delivery fail with `SinkError::Closed`
        pub fn close(&self) {
            self.lock().closed = true;
        }

        pub fn is_closed(&self) -> bool {
            self.lock().closed
        }

        /// All events delivered so far, oldest first
        pub fn events(&self) -> Vec<ServerEvent> {
            self.lock().events.clone()
        }

        /// Remove and return all events delivered so far
        pub fn take(&self) -> Vec<ServerEvent> {
            std::mem::take(&mut self.lock().events)
        }

        pub fn count(&self, predicate: impl Fn(&ServerEvent) -> bool) -> usize {
            self.lock().events.iter().filter(|e| predicate(e)).count()
        }

        /// Last `user-count` value received, if any
        pub fn last_user_count(&self) -> Option<usize> {
            self.lock().events.iter().rev().find_map(|e| match e {
                ServerEvent::UserCount(n) => Some(*n),
                _ => None,
            })
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInbox> {
            // A poisoned inbox only means a test thread panicked mid-push
            self.inner.lock().unwrap_or_else(|e| e.into_inner())
        }
    }

    impl SessionSink for MemorySink {
        fn deliver(&self, event: &ServerEvent) -> Result<(), SinkError> {
            let mut inbox = self.lock();
            if inbox.closed {
                return Err(SinkError::Closed);
            }
            inbox.events.push(event.clone());
            Ok(())
        }
    }
}
