use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::activation::TransferFunction;
use crate::error::{Error, Result};
use crate::network::metadata::NetworkMetadata;
use crate::network::network::Network;
use crate::network::neuron::{Neuron, NeuronKind, Position};
use crate::network::topology::Topology;

/// Serialized form of one neuron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuronRecord {
    pub activation: f64,
    pub bias: f64,
    pub kind: NeuronKind,
    #[serde(default)]
    pub transfer: TransferFunction,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub position: Position,
}

fn enabled_default() -> bool {
    true
}

/// Serialized form of one connection, endpoints given as neuron ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

/// Everything needed to rebuild a [`Network`]: the layer description,
/// the neurons in id order and the connections grouped by target in
/// incoming-list order, so the rebuilt network has the same weight slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkFile {
    pub topology: Option<String>,
    pub neurons: Vec<NeuronRecord>,
    pub connections: Vec<ConnectionRecord>,
    #[serde(default)]
    pub metadata: NetworkMetadata,
}

impl Network {
    pub fn to_file(&self) -> NetworkFile {
        let neurons = self
            .neurons
            .iter()
            .map(|n| NeuronRecord {
                activation: n.activation,
                bias: n.bias,
                kind: n.kind,
                transfer: n.transfer,
                enabled: n.enabled,
                position: n.position,
            })
            .collect();
        let connections = (0..self.neurons.len())
            .flat_map(|target| self.incoming_iter(target))
            .map(|c| ConnectionRecord {
                source: c.source,
                target: c.target,
                weight: c.weight,
            })
            .collect();
        NetworkFile {
            topology: self.topology().map(|t| t.to_string()),
            neurons,
            connections,
            metadata: self.metadata.clone(),
        }
    }

    /// Rebuilds a network. Fails if the topology does not account for every
    /// neuron or a connection names a missing neuron.
    pub fn from_file(file: &NetworkFile) -> Result<Network> {
        let topology = file.topology.as_deref().map(Topology::parse).transpose()?;
        if let Some(t) = &topology {
            if t.total_units() != file.neurons.len() {
                return Err(Error::DimensionMismatch {
                    what: "neuron count",
                    expected: t.total_units(),
                    actual: file.neurons.len(),
                });
            }
        }

        let mut network = Network::new();
        for record in &file.neurons {
            network.add_neuron(Neuron {
                activation: record.activation,
                bias: record.bias,
                kind: record.kind,
                transfer: record.transfer,
                enabled: record.enabled,
                position: record.position,
                ..Neuron::default()
            });
        }
        for c in &file.connections {
            network.connect_weighted(c.source, c.target, c.weight)?;
        }
        network.set_topology(topology);
        network.metadata = file.metadata.clone();
        Ok(network)
    }

    /// Writes the network as pretty-printed JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &self.to_file())?;
        Ok(())
    }

    /// Reads a network written by [`Network::save_json`].
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Network> {
        let reader = BufReader::new(File::open(path)?);
        let file: NetworkFile = serde_json::from_reader(reader)?;
        Network::from_file(&file)
    }
}
