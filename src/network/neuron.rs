use serde::{Deserialize, Serialize};

use crate::activation::TransferFunction;
use crate::network::connection::ConnectionId;

/// Role of a neuron in a layered network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeuronKind {
    Input,
    #[default]
    Hidden,
    Output,
}

/// Visualization coordinate of a neuron.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Position {
        Position { x, y, z }
    }
}

/// A graph node: activation state, bias, transfer function and the ids of
/// its incoming and outgoing connections.
///
/// The connection lists are owned by the network; a neuron built outside a
/// network (e.g. a prototype) always starts with both lists empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    pub(crate) id: usize,
    pub activation: f64,
    pub bias: f64,
    pub kind: NeuronKind,
    pub transfer: TransferFunction,
    pub enabled: bool,
    pub position: Position,
    pub(crate) incoming: Vec<ConnectionId>,
    pub(crate) outgoing: Vec<ConnectionId>,
}

impl Default for Neuron {
    fn default() -> Neuron {
        Neuron {
            id: 0,
            activation: 0.0,
            bias: 0.0,
            kind: NeuronKind::Hidden,
            transfer: TransferFunction::Logistic,
            enabled: true,
            position: Position::default(),
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }
}

impl Neuron {
    pub fn new(transfer: TransferFunction) -> Neuron {
        Neuron { transfer, ..Neuron::default() }
    }

    /// Index of the neuron in its network.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn incoming_ids(&self) -> &[ConnectionId] {
        &self.incoming
    }

    pub fn outgoing_ids(&self) -> &[ConnectionId] {
        &self.outgoing
    }

    pub fn incoming_count(&self) -> usize {
        self.incoming.len()
    }

    pub fn outgoing_count(&self) -> usize {
        self.outgoing.len()
    }

    /// Copy of this neuron's own attributes, detached from any graph.
    /// Used to stamp out units from a prototype.
    pub(crate) fn detached(&self) -> Neuron {
        Neuron {
            incoming: Vec::new(),
            outgoing: Vec::new(),
            ..self.clone()
        }
    }
}
