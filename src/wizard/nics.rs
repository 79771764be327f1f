use crate::cloud::{Network, ResourceId};

/// Ordered network interfaces of the machine being created. The first entry
/// becomes the primary interface. A network can back at most one interface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NicList {
    networks: Vec<Network>,
}

#[allow(unused)]
impl NicList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    pub fn contains(&self, id: &ResourceId) -> bool {
        self.networks.iter().any(|n| n.id() == id)
    }

    /// Append an interface. Returns false if the network is already attached.
    pub fn push(&mut self, network: Network) -> bool {
        let len = self.networks.len();
        self.insert(len, network)
    }

    /// Insert an interface at `index`, clamped to the end of the list.
    pub fn insert(&mut self, index: usize, network: Network) -> bool {
        if self.contains(network.id()) {
            return false;
        }
        let index = index.min(self.networks.len());
        self.networks.insert(index, network);
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<Network> {
        (index < self.networks.len()).then(|| self.networks.remove(index))
    }

    /// Move the interface at `from` so that it ends up at position `to`
    /// (clamped to the last position). Returns false if `from` is out of range.
    pub fn move_to(&mut self, from: usize, to: usize) -> bool {
        if from >= self.networks.len() {
            return false;
        }
        let network = self.networks.remove(from);
        let to = to.min(self.networks.len());
        self.networks.insert(to, network);
        true
    }

    pub fn clear(&mut self) {
        self.networks.clear();
    }

    pub fn ids(&self) -> impl Iterator<Item = &ResourceId> {
        self.networks.iter().map(Network::id)
    }
}
