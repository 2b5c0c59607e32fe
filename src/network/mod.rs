pub mod cleanup;
pub mod connection;
pub mod evaluate;
pub mod file;
pub mod metadata;
pub mod network;
pub mod neuron;
pub mod topology;

pub use connection::{Connection, ConnectionId};
pub use evaluate::ClassificationReport;
pub use file::{ConnectionRecord, NetworkFile, NeuronRecord};
pub use metadata::NetworkMetadata;
pub use network::Network;
pub use neuron::{Neuron, NeuronKind, Position};
pub use topology::Topology;
