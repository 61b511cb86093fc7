use super::session::SessionId;
use std::collections::HashMap;

/// Symmetric table of active 1:1 links
///
/// Both directions are written and removed together, so `peer_of(a) == Some(b)`
/// always implies `peer_of(b) == Some(a)`.
#[derive(Debug, Default, Clone)]
pub struct PairingTable {
    pairs: HashMap<SessionId, SessionId>,
}

impl PairingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link two distinct, currently unpaired sessions
    ///
    /// Returns `false` (and changes nothing) if either side is already paired
    /// or both ids are the same.
    pub fn link(&mut self, a: SessionId, b: SessionId) -> bool {
        if a == b || self.pairs.contains_key(&a) || self.pairs.contains_key(&b) {
            return false;
        }
        self.pairs.insert(a, b);
        self.pairs.insert(b, a);
        true
    }

    /// Remove both directions of the link involving `id`
    ///
    /// Returns the former peer.
    pub fn unlink(&mut self, id: SessionId) -> Option<SessionId> {
        let peer = self.pairs.remove(&id)?;
        self.pairs.remove(&peer);
        Some(peer)
    }

    pub fn peer_of(&self, id: SessionId) -> Option<SessionId> {
        self.pairs.get(&id).copied()
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.pairs.contains_key(&id)
    }

    /// Number of active pairs (each counted once)
    pub fn len(&self) -> usize {
        self.pairs.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Every (session, peer) entry, both directions included
    pub fn entries(&self) -> impl Iterator<Item = (SessionId, SessionId)> + '_ {
        self.pairs.iter().map(|(a, b)| (*a, *b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_is_symmetric() {
        let mut table = PairingTable::new();
        let a = SessionId::new();
        let b = SessionId::new();

        assert!(table.link(a, b));

        assert_eq!(table.peer_of(a), Some(b));
        assert_eq!(table.peer_of(b), Some(a));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_link_rejects_self_and_already_paired() {
        let mut table = PairingTable::new();
        let a = SessionId::new();
        let b = SessionId::new();
        let c = SessionId::new();

        assert!(!table.link(a, a));
        assert!(table.link(a, b));
        assert!(!table.link(c, a));
        assert!(!table.link(b, c));
        assert!(!table.contains(c));
    }

    #[test]
    fn test_unlink_removes_both_directions() {
        let mut table = PairingTable::new();
        let a = SessionId::new();
        let b = SessionId::new();
        table.link(a, b);

        assert_eq!(table.unlink(b), Some(a));

        assert!(!table.contains(a));
        assert!(!table.contains(b));
        assert!(table.is_empty());
        assert_eq!(table.unlink(a), None);
    }
}
