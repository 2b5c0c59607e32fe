use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{check_index, Error, Result};
use crate::network::network::Network;
use crate::network::neuron::{Neuron, NeuronKind, Position};

/// Horizontal distance between layer columns in neuron space.
const LAYER_SPACING: f64 = 8.0;

/// Layer sizes of a layered network, input layer first.
///
/// Layer arguments accept negative indices counted from the end: `-1` is the
/// output layer, `-2` the layer below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    layers: Vec<usize>,
}

impl Topology {
    /// Parses a description such as `"8-10-10-1"`.
    pub fn parse(description: &str) -> Result<Topology> {
        let invalid = || Error::InvalidTopologyDescription(description.to_owned());
        if description.trim().is_empty() {
            return Err(invalid());
        }
        let layers = description
            .split('-')
            .map(|token| {
                let token = token.trim();
                match token.parse::<usize>() {
                    Ok(size) if size > 0 => Ok(size),
                    _ => Err(invalid()),
                }
            })
            .collect::<Result<Vec<usize>>>()?;
        Ok(Topology { layers })
    }

    pub fn from_sizes(layers: Vec<usize>) -> Result<Topology> {
        if layers.is_empty() || layers.contains(&0) {
            let desc = layers
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join("-");
            return Err(Error::InvalidTopologyDescription(desc));
        }
        Ok(Topology { layers })
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn sizes(&self) -> &[usize] {
        &self.layers
    }

    fn resolve(&self, layer: isize) -> Result<usize> {
        let len = self.layers.len();
        let resolved = if layer < 0 { len as isize + layer } else { layer };
        if resolved < 0 || resolved as usize >= len {
            return Err(Error::InvalidIndex {
                index: layer.unsigned_abs(),
                len,
            });
        }
        Ok(resolved as usize)
    }

    /// Size of a layer.
    pub fn layer_size(&self, layer: isize) -> Result<usize> {
        Ok(self.layers[self.resolve(layer)?])
    }

    /// Index of the first unit of a layer: the sum of the preceding sizes.
    pub fn layer_index(&self, layer: isize) -> Result<usize> {
        let layer = self.resolve(layer)?;
        Ok(self.layers[..layer].iter().sum())
    }

    /// Maps a unit index to its `(layer, offset)` position.
    pub fn position(&self, unit: usize) -> Result<(usize, usize)> {
        let mut offset = unit;
        for (layer, &size) in self.layers.iter().enumerate() {
            if offset < size {
                return Ok((layer, offset));
            }
            offset -= size;
        }
        Err(Error::InvalidIndex {
            index: unit,
            len: self.total_units(),
        })
    }

    pub fn total_units(&self) -> usize {
        self.layers.iter().sum()
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().copied().unwrap_or(0)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().copied().unwrap_or(0)
    }

    /// Takes one unit off a layer, dropping the layer once it is empty.
    /// Returns false, leaving the topology untouched, when the unit is the
    /// last one the topology describes.
    pub(crate) fn shrink_layer(&mut self, layer: usize) -> bool {
        match self.layers.get_mut(layer) {
            Some(size) if *size > 1 => {
                *size -= 1;
                true
            }
            Some(_) => self.remove_layer(layer).is_ok(),
            None => true,
        }
    }

    /// Appends one unit to the output layer.
    pub(crate) fn grow_output_layer(&mut self) {
        if let Some(size) = self.layers.last_mut() {
            *size += 1;
        }
    }

    /// Removes a layer outright. Negative indexing is not accepted here, and
    /// the only remaining layer cannot be removed.
    pub fn remove_layer(&mut self, layer: usize) -> Result<()> {
        check_index(layer, self.layers.len())?;
        if self.layers.len() == 1 {
            return Err(Error::InvalidTopologyDescription(self.to_string()));
        }
        self.layers.remove(layer);
        Ok(())
    }

    /// Builds an unconnected network with one neuron per unit.
    ///
    /// Units are stamped from `prototype` when given. Layer 0 holds input
    /// units, the last layer output units and everything between hidden
    /// units; each unit is placed at `(8 * layer, offset, 0)`.
    pub fn build(&self, prototype: Option<&Neuron>) -> Network {
        let mut network = Network::new();
        let output_base = self.total_units() - self.output_size();
        for (layer, &size) in self.layers.iter().enumerate() {
            for offset in 0..size {
                let mut neuron = prototype.map(Neuron::detached).unwrap_or_default();
                let unit = network.len();
                neuron.kind = if unit < self.input_size() {
                    NeuronKind::Input
                } else if unit < output_base {
                    NeuronKind::Hidden
                } else {
                    NeuronKind::Output
                };
                neuron.position = Position::new(layer as f64 * LAYER_SPACING, offset as f64, 0.0);
                network.add_neuron(neuron);
            }
        }
        network.set_topology(Some(self.clone()));
        if let Some(proto) = prototype {
            network.set_prototype(Some(proto.detached()));
        }
        network
    }
}

impl FromStr for Topology {
    type Err = Error;

    fn from_str(s: &str) -> Result<Topology> {
        Topology::parse(s)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .layers
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join("-");
        f.write_str(&joined)
    }
}
