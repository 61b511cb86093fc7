use super::session::SessionId;
use std::collections::VecDeque;

/// FIFO queue of sessions searching for a peer
///
/// First requester is matched first. An id appears at most once.
#[derive(Debug, Default, Clone)]
pub struct WaitingQueue {
    queue: VecDeque<SessionId>,
}

impl WaitingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a session unless it is already waiting
    ///
    /// Returns `false` for a duplicate request.
    pub fn enqueue(&mut self, id: SessionId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.queue.push_back(id);
        true
    }

    /// Pop the earliest-enqueued session (`None` when empty)
    pub fn dequeue_oldest(&mut self) -> Option<SessionId> {
        self.queue.pop_front()
    }

    /// Pop the earliest-enqueued session other than `requester`
    ///
    /// The requester keeps its position if it is queued itself.
    pub fn dequeue_oldest_except(&mut self, requester: SessionId) -> Option<SessionId> {
        let index = self.queue.iter().position(|&id| id != requester)?;
        self.queue.remove(index)
    }

    /// Delete a session if present; returns whether it was queued
    pub fn remove(&mut self, id: SessionId) -> bool {
        match self.queue.iter().position(|&queued| queued == id) {
            Some(index) => {
                self.queue.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.queue.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Waiting sessions, oldest first
    pub fn iter(&self) -> impl Iterator<Item = SessionId> + '_ {
        self.queue.iter().copied()
    }
}
