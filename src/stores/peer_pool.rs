use crate::models::peer::Peer;
use rand::seq::IndexedRandom;
use serde::Serialize;

/// Unordered multiset of peers.
///
/// Filled once by an action constructor, then shared read-only through an
/// `Arc` with whoever schedules transfers against it.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PeerPool {
    peers: Vec<Peer>,
}

impl PeerPool {
    pub fn new() -> Self {
        Self { peers: Vec::new() }
    }

    /// Add a peer; duplicates are kept
    pub fn add(&mut self, peer: Peer) {
        self.peers.push(peer);
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn contains(&self, peer: &Peer) -> bool {
        self.peers.contains(peer)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Peer> {
        self.peers.iter()
    }

    /// Pick one peer uniformly at random, or `None` if the pool is empty
    pub fn random(&self) -> Option<Peer> {
        let mut rng = rand::rng();
        self.peers.choose(&mut rng).copied()
    }
}

impl<'a> IntoIterator for &'a PeerPool {
    type Item = &'a Peer;
    type IntoIter = std::slice::Iter<'a, Peer>;

    fn into_iter(self) -> Self::IntoIter {
        self.peers.iter()
    }
}
