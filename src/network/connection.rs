use serde::{Deserialize, Serialize};

/// Stable handle to a connection slot in a [`Network`](super::Network)'s
/// connection arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(pub(crate) usize);

impl ConnectionId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A directed, weighted edge between two neurons of the same network.
///
/// Endpoints are neuron ids. They are kept in sync by the network when a
/// neuron is removed and higher ids shift down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub weight: f64,
    pub(crate) source: usize,
    pub(crate) target: usize,
}

impl Connection {
    pub(crate) fn new(source: usize, target: usize, weight: f64) -> Connection {
        Connection { weight, source, target }
    }

    pub fn source(&self) -> usize {
        self.source
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Shifts endpoint ids after neuron `removed` has left the network.
    pub(crate) fn remap_after_removal(&mut self, removed: usize) {
        if self.source > removed {
            self.source -= 1;
        }
        if self.target > removed {
            self.target -= 1;
        }
    }
}
