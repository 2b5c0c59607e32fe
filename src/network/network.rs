use std::fmt;

use log::trace;
use rand::Rng;

use crate::error::{check_index, Error, Result};
use crate::network::connection::{Connection, ConnectionId};
use crate::network::metadata::NetworkMetadata;
use crate::network::neuron::Neuron;
use crate::network::topology::Topology;

/// A mutable graph of neurons and weighted connections.
///
/// Neurons live in a vector and are addressed by id (their index).
/// Connections live in a separate arena addressed by [`ConnectionId`]; each
/// neuron keeps the ids of its incoming and outgoing connections, so a
/// connection is referenced from exactly two lists and owned by the arena.
///
/// Insertion order is evaluation order: `forward_pass` visits neurons in
/// ascending id, which for layered topologies is input layer first.
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub(crate) neurons: Vec<Neuron>,
    pub(crate) connections: Vec<Option<Connection>>,
    free_slots: Vec<usize>,
    topology: Option<Topology>,
    prototype: Option<Neuron>,
    pub metadata: NetworkMetadata,
}

impl Network {
    pub fn new() -> Network {
        Network::default()
    }

    /// Network of `size` unconnected default neurons and no topology.
    pub fn with_size(size: usize) -> Network {
        let mut network = Network::new();
        for _ in 0..size {
            network.add_neuron(Neuron::default());
        }
        network
    }

    /// Builds an unconnected layered network from a description like
    /// `"2-2-1"`.
    pub fn from_description(description: &str) -> Result<Network> {
        Ok(Topology::parse(description)?.build(None))
    }

    /// Replaces every neuron with a fresh unconnected layout built from
    /// `description`, stamping units from the network's prototype if one is
    /// set. Metadata is kept.
    pub fn make_units(&mut self, description: &str) -> Result<()> {
        let topology = Topology::parse(description)?;
        let metadata = std::mem::take(&mut self.metadata);
        let prototype = self.prototype.take();
        *self = topology.build(prototype.as_ref());
        self.metadata = metadata;
        self.prototype = prototype;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn neuron(&self, id: usize) -> Result<&Neuron> {
        check_index(id, self.neurons.len())?;
        Ok(&self.neurons[id])
    }

    pub fn neuron_mut(&mut self, id: usize) -> Result<&mut Neuron> {
        check_index(id, self.neurons.len())?;
        Ok(&mut self.neurons[id])
    }

    pub fn topology(&self) -> Option<&Topology> {
        self.topology.as_ref()
    }

    pub fn set_topology(&mut self, topology: Option<Topology>) {
        self.topology = topology;
    }

    /// Topology or `TopologyRequired` naming the operation that needed it.
    pub(crate) fn require_topology(&self, operation: &'static str) -> Result<&Topology> {
        self.topology.as_ref().ok_or(Error::TopologyRequired(operation))
    }

    pub fn prototype(&self) -> Option<&Neuron> {
        self.prototype.as_ref()
    }

    /// Sets the neuron every topology-built unit is cloned from.
    pub fn set_prototype(&mut self, prototype: Option<Neuron>) {
        self.prototype = prototype.map(|p| p.detached());
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.0).and_then(|c| c.as_ref())
    }

    pub fn connection_mut(&mut self, id: ConnectionId) -> Option<&mut Connection> {
        self.connections.get_mut(id.0).and_then(|c| c.as_mut())
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len() - self.free_slots.len()
    }

    pub fn incoming(&self, neuron: usize) -> Result<impl Iterator<Item = &Connection> + '_> {
        check_index(neuron, self.neurons.len())?;
        Ok(self.incoming_iter(neuron))
    }

    pub fn outgoing(&self, neuron: usize) -> Result<impl Iterator<Item = &Connection> + '_> {
        check_index(neuron, self.neurons.len())?;
        Ok(self.outgoing_iter(neuron))
    }

    pub(crate) fn incoming_iter(&self, neuron: usize) -> impl Iterator<Item = &Connection> + '_ {
        self.neurons[neuron]
            .incoming
            .iter()
            .filter_map(move |id| self.connections[id.0].as_ref())
    }

    pub(crate) fn outgoing_iter(&self, neuron: usize) -> impl Iterator<Item = &Connection> + '_ {
        self.neurons[neuron]
            .outgoing
            .iter()
            .filter_map(move |id| self.connections[id.0].as_ref())
    }

    /// True when `target` has at least one incoming connection from `source`.
    pub fn is_connected(&self, source: usize, target: usize) -> bool {
        target < self.neurons.len() && self.incoming_iter(target).any(|c| c.source == source)
    }

    // -----------------------------------------------------------------------
    // Structural operations
    // -----------------------------------------------------------------------

    /// Appends a neuron and returns its id. Any connection ids the neuron
    /// carried are dropped; connections are made through [`Network::connect`].
    ///
    /// On a layered network the new neuron joins the output layer, which
    /// grows by one.
    pub fn add_neuron(&mut self, neuron: Neuron) -> usize {
        let id = self.neurons.len();
        let mut neuron = neuron.detached();
        neuron.id = id;
        self.neurons.push(neuron);
        if let Some(topology) = self.topology.as_mut() {
            topology.grow_output_layer();
        }
        id
    }

    /// Removes a neuron together with all of its connections.
    ///
    /// Every neuron above `id` moves down by one and every surviving
    /// connection endpoint above `id` is remapped to match. If the network
    /// has a topology, the layer the neuron belonged to shrinks (and is
    /// dropped when it becomes empty). Removing the last unit drops the
    /// topology.
    pub fn remove_neuron(&mut self, id: usize) -> Result<Neuron> {
        check_index(id, self.neurons.len())?;
        let layer = self.topology.as_ref().and_then(|t| t.position(id).ok()).map(|(l, _)| l);

        self.disconnect_all(id)?;
        let removed = self.neurons.remove(id);

        for (i, neuron) in self.neurons.iter_mut().enumerate().skip(id) {
            neuron.id = i;
        }
        for conn in self.connections.iter_mut().flatten() {
            conn.remap_after_removal(id);
        }
        if let (Some(topology), Some(layer)) = (self.topology.as_mut(), layer) {
            if !topology.shrink_layer(layer) {
                self.topology = None;
            }
        }
        trace!("removed neuron {id}, {} left", self.neurons.len());
        Ok(removed)
    }

    /// Creates a zero-weight connection from `source` to `target`.
    ///
    /// Both ids are checked before anything is touched, so a failed call
    /// leaves both connection lists as they were.
    pub fn connect(&mut self, source: usize, target: usize) -> Result<ConnectionId> {
        self.connect_weighted(source, target, 0.0)
    }

    pub fn connect_weighted(&mut self, source: usize, target: usize, weight: f64) -> Result<ConnectionId> {
        check_index(source, self.neurons.len())?;
        check_index(target, self.neurons.len())?;

        let conn = Connection::new(source, target, weight);
        let id = match self.free_slots.pop() {
            Some(slot) => {
                self.connections[slot] = Some(conn);
                ConnectionId(slot)
            }
            None => {
                self.connections.push(Some(conn));
                ConnectionId(self.connections.len() - 1)
            }
        };
        self.neurons[target].incoming.push(id);
        self.neurons[source].outgoing.push(id);
        Ok(id)
    }

    /// Deletes one connection, unlinking it from both endpoint lists.
    /// This is the only place an arena slot is released.
    pub fn disconnect(&mut self, id: ConnectionId) -> Result<Connection> {
        let len = self.connections.len();
        let conn = self
            .connections
            .get_mut(id.0)
            .and_then(|slot| slot.take())
            .ok_or(Error::InvalidIndex { index: id.0, len })?;
        self.neurons[conn.target].incoming.retain(|c| *c != id);
        self.neurons[conn.source].outgoing.retain(|c| *c != id);
        self.free_slots.push(id.0);
        Ok(conn)
    }

    /// Removes every connection into `target` that comes from `source`.
    /// Returns how many were removed.
    pub fn disconnect_from(&mut self, target: usize, source: usize) -> Result<usize> {
        check_index(target, self.neurons.len())?;
        check_index(source, self.neurons.len())?;
        let ids: Vec<ConnectionId> = self.neurons[target]
            .incoming
            .iter()
            .copied()
            .filter(|id| self.connection(*id).is_some_and(|c| c.source == source))
            .collect();
        self.disconnect_each(ids)
    }

    /// Removes every connection from `source` that goes to `target`.
    pub fn disconnect_to(&mut self, source: usize, target: usize) -> Result<usize> {
        check_index(source, self.neurons.len())?;
        check_index(target, self.neurons.len())?;
        let ids: Vec<ConnectionId> = self.neurons[source]
            .outgoing
            .iter()
            .copied()
            .filter(|id| self.connection(*id).is_some_and(|c| c.target == target))
            .collect();
        self.disconnect_each(ids)
    }

    /// Removes every incoming and outgoing connection of a neuron.
    pub fn disconnect_all(&mut self, neuron: usize) -> Result<usize> {
        check_index(neuron, self.neurons.len())?;
        let n = &self.neurons[neuron];
        let mut ids: Vec<ConnectionId> = n.incoming.iter().chain(n.outgoing.iter()).copied().collect();
        // A self-loop sits in both lists.
        ids.sort_unstable();
        ids.dedup();
        self.disconnect_each(ids)
    }

    fn disconnect_each(&mut self, ids: Vec<ConnectionId>) -> Result<usize> {
        let count = ids.len();
        for id in ids {
            self.disconnect(id)?;
        }
        Ok(count)
    }

    // -----------------------------------------------------------------------
    // Wiring patterns
    // -----------------------------------------------------------------------

    /// Connects every unit of each layer `l > 0` to every unit of layer
    /// `l - 1`, or of all layers below `l` when `shortcuts` is set.
    pub fn connect_full_feed_forward(&mut self, shortcuts: bool) -> Result<()> {
        let topology = self.require_topology("connect_full_feed_forward")?.clone();
        for layer in 1..topology.layer_count() {
            let base = topology.layer_index(layer as isize)?;
            let first_source_layer = if shortcuts { 0 } else { layer - 1 };
            for j in 0..topology.sizes()[layer] {
                for source_layer in first_source_layer..layer {
                    let source_base = topology.layer_index(source_layer as isize)?;
                    for i in 0..topology.sizes()[source_layer] {
                        self.connect(source_base + i, base + j)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Connects every unit to every unit, self-loops included.
    pub fn connect_full(&mut self) {
        let n = self.neurons.len();
        for i in 0..n {
            for j in 0..n {
                // Both ids are in range by construction.
                let _ = self.connect(i, j);
            }
        }
    }

    /// Wires adjacent layers from a square connection matrix.
    ///
    /// `mask[i][j]` requests a connection from unit `i` to unit `j`; it is
    /// honoured only when `j` sits in the layer right after `i`'s and both
    /// units are enabled. The diagonal enables or disables every unit below
    /// the output layer.
    pub fn connect_feed_forward(&mut self, mask: &[Vec<bool>]) -> Result<()> {
        let topology = self.require_topology("connect_feed_forward")?.clone();
        let n = self.neurons.len();
        if mask.len() != n {
            return Err(Error::DimensionMismatch {
                what: "connection matrix rows",
                expected: n,
                actual: mask.len(),
            });
        }
        if let Some(row) = mask.iter().find(|row| row.len() != n) {
            return Err(Error::DimensionMismatch {
                what: "connection matrix columns",
                expected: n,
                actual: row.len(),
            });
        }

        let output_base = topology.layer_index(-1)?;
        for (i, row) in mask.iter().enumerate().take(output_base) {
            self.neurons[i].enabled = row[i];
        }

        let layers: Vec<usize> = (0..n)
            .map(|u| topology.position(u).map(|(l, _)| l))
            .collect::<Result<_>>()?;
        for i in 0..n {
            for j in 0..n {
                if mask[i][j]
                    && layers[i] + 1 == layers[j]
                    && self.neurons[i].enabled
                    && self.neurons[j].enabled
                {
                    self.connect(i, j)?;
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // State
    // -----------------------------------------------------------------------

    /// Draws every bias, and every incoming weight of enabled neurons,
    /// uniformly from `[-range, range]`.
    pub fn init<R: Rng>(&mut self, range: f64, rng: &mut R) {
        let Network { neurons, connections, .. } = self;
        let mut draw = |rng: &mut R| if range > 0.0 { rng.gen_range(-range..=range) } else { 0.0 };
        for neuron in neurons.iter_mut() {
            if neuron.enabled {
                for id in &neuron.incoming {
                    if let Some(conn) = connections[id.0].as_mut() {
                        conn.weight = draw(rng);
                    }
                }
            }
            neuron.bias = draw(rng);
        }
    }

    /// [`Network::init`] with the thread-local generator.
    pub fn init_random(&mut self, range: f64) {
        self.init(range, &mut rand::thread_rng());
    }

    /// Sets every activation to 0.
    pub fn reset(&mut self) {
        for neuron in &mut self.neurons {
            neuron.activation = 0.0;
        }
    }

    /// Writes `values` into the activations of the first `values.len()`
    /// neurons.
    pub fn set_inputs(&mut self, values: &[f64]) -> Result<()> {
        if values.len() > self.neurons.len() {
            return Err(Error::DimensionMismatch {
                what: "input count",
                expected: self.neurons.len(),
                actual: values.len(),
            });
        }
        for (neuron, &v) in self.neurons.iter_mut().zip(values) {
            neuron.activation = v;
        }
        Ok(())
    }

    /// Activations of the last `count` neurons.
    pub fn outputs(&self, count: usize) -> Result<Vec<f64>> {
        if count > self.neurons.len() {
            return Err(Error::DimensionMismatch {
                what: "output count",
                expected: self.neurons.len(),
                actual: count,
            });
        }
        let base = self.neurons.len() - count;
        Ok(self.neurons[base..].iter().map(|n| n.activation).collect())
    }

    /// Propagates signals once through all neurons in ascending id order.
    ///
    /// A disabled neuron outputs 0. An enabled neuron without incoming
    /// connections keeps its current activation, which is how input units
    /// are fed.
    pub fn forward_pass(&mut self) {
        for i in 0..self.neurons.len() {
            let neuron = &self.neurons[i];
            if !neuron.enabled {
                self.neurons[i].activation = 0.0;
                continue;
            }
            if neuron.incoming.is_empty() {
                continue;
            }
            let mut sum = neuron.bias;
            for id in &neuron.incoming {
                if let Some(conn) = &self.connections[id.0] {
                    sum += conn.weight * self.neurons[conn.source].activation;
                }
            }
            let activation = neuron.transfer.function(sum);
            self.neurons[i].activation = activation;
        }
    }

    /// Feeds `input`, runs a forward pass and returns the last
    /// `output_count` activations.
    pub fn forward(&mut self, input: &[f64], output_count: usize) -> Result<Vec<f64>> {
        self.set_inputs(input)?;
        self.forward_pass();
        self.outputs(output_count)
    }

    // -----------------------------------------------------------------------
    // Weight slots
    //
    // Trainers and terminators address every trainable value through one
    // fixed order: neurons by descending id, and for each neuron its bias
    // followed by its incoming weights in list order.
    // -----------------------------------------------------------------------

    pub fn weight_slot_count(&self) -> usize {
        self.neurons.len() + self.neurons.iter().map(|n| n.incoming.len()).sum::<usize>()
    }

    pub fn weight_vector(&self) -> Vec<f64> {
        let mut weights = Vec::with_capacity(self.weight_slot_count());
        self.for_each_slot(|_, _, _, w| weights.push(w));
        weights
    }

    /// Overwrites every bias and weight from a vector in slot order.
    pub fn set_weight_vector(&mut self, weights: &[f64]) -> Result<()> {
        let expected = self.weight_slot_count();
        if weights.len() != expected {
            return Err(Error::DimensionMismatch {
                what: "weight vector length",
                expected,
                actual: weights.len(),
            });
        }
        self.for_each_slot_mut(|slot, _, _, w| *w = weights[slot]);
        Ok(())
    }

    /// Visits every slot as `(slot, neuron, source_activation, weight)`;
    /// the source activation is `None` for a bias.
    pub(crate) fn for_each_slot<F>(&self, mut f: F)
    where
        F: FnMut(usize, usize, Option<f64>, f64),
    {
        let mut slot = 0;
        for j in (0..self.neurons.len()).rev() {
            f(slot, j, None, self.neurons[j].bias);
            slot += 1;
            for id in &self.neurons[j].incoming {
                if let Some(conn) = &self.connections[id.0] {
                    f(slot, j, Some(self.neurons[conn.source].activation), conn.weight);
                }
                slot += 1;
            }
        }
    }

    pub(crate) fn for_each_slot_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, usize, Option<f64>, &mut f64),
    {
        let Network { neurons, connections, .. } = self;
        let mut slot = 0;
        for j in (0..neurons.len()).rev() {
            f(slot, j, None, &mut neurons[j].bias);
            slot += 1;
            for k in 0..neurons[j].incoming.len() {
                let id = neurons[j].incoming[k];
                if let Some(conn) = connections[id.0].as_mut() {
                    let source_activation = neurons[conn.source].activation;
                    f(slot, j, Some(source_activation), &mut conn.weight);
                }
                slot += 1;
            }
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for neuron in &self.neurons {
            write!(
                f,
                "{:3}: A={:.2} b={:+.2} {} ({}): ",
                neuron.id,
                neuron.activation,
                neuron.bias,
                neuron.transfer.letter(),
                neuron.incoming.len()
            )?;
            for conn in self.incoming_iter(neuron.id) {
                write!(f, "{:2}:{:+.2} ", conn.source, conn.weight)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::TransferFunction;
    use crate::math::sigmoid;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layered(desc: &str) -> Network {
        Network::from_description(desc).unwrap()
    }

    #[test]
    fn add_neuron_assigns_contiguous_ids() {
        let mut net = Network::new();
        assert_eq!(net.add_neuron(Neuron::default()), 0);
        assert_eq!(net.add_neuron(Neuron::default()), 1);
        assert_eq!(net.neuron(1).unwrap().id(), 1);
    }

    #[test]
    fn connect_links_both_sides() {
        let mut net = Network::with_size(3);
        let id = net.connect(0, 2).unwrap();
        assert_eq!(net.neuron(0).unwrap().outgoing_ids(), &[id]);
        assert_eq!(net.neuron(2).unwrap().incoming_ids(), &[id]);
        assert_eq!(net.connection(id).unwrap().weight, 0.0);
        assert!(net.is_connected(0, 2));
        assert!(!net.is_connected(2, 0));
    }

    #[test]
    fn failed_connect_leaves_lists_untouched() {
        let mut net = Network::with_size(2);
        assert!(matches!(net.connect(0, 5), Err(Error::InvalidIndex { index: 5, len: 2 })));
        assert!(matches!(net.connect(7, 1), Err(Error::InvalidIndex { .. })));
        assert_eq!(net.neuron(0).unwrap().outgoing_count(), 0);
        assert_eq!(net.neuron(1).unwrap().incoming_count(), 0);
        assert_eq!(net.connection_count(), 0);
    }

    #[test]
    fn disconnect_releases_each_connection_once() {
        let mut net = Network::with_size(3);
        let a = net.connect(0, 1).unwrap();
        net.connect(0, 1).unwrap();
        net.connect(1, 2).unwrap();
        assert_eq!(net.disconnect_from(1, 0).unwrap(), 2);
        assert_eq!(net.connection_count(), 1);
        assert!(net.disconnect(a).is_err());
        assert!(!net.is_connected(0, 1));
        assert_eq!(net.neuron(0).unwrap().outgoing_count(), 0);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut net = Network::with_size(2);
        let a = net.connect(0, 1).unwrap();
        net.disconnect(a).unwrap();
        let b = net.connect(1, 0).unwrap();
        assert_eq!(a, b);
        assert_eq!(net.connection(b).unwrap().source(), 1);
    }

    #[test]
    fn disconnect_all_handles_self_loops() {
        let mut net = Network::with_size(2);
        net.connect_full();
        assert_eq!(net.connection_count(), 4);
        assert_eq!(net.disconnect_all(0).unwrap(), 3);
        assert_eq!(net.connection_count(), 1);
        assert!(net.is_connected(1, 1));
    }

    #[test]
    fn remove_neuron_renumbers_ids_and_endpoints() {
        let mut net = Network::with_size(4);
        net.connect_weighted(0, 3, 0.25).unwrap();
        net.connect_weighted(1, 2, 0.5).unwrap();
        net.connect(1, 3).unwrap();
        net.remove_neuron(1).unwrap();

        assert_eq!(net.len(), 3);
        for (i, n) in net.neurons().iter().enumerate() {
            assert_eq!(n.id(), i);
        }
        assert_eq!(net.connection_count(), 1);
        let conn = net.incoming(2).unwrap().next().unwrap();
        assert_eq!((conn.source(), conn.target(), conn.weight), (0, 2, 0.25));
        assert!(net.remove_neuron(3).is_err());
    }

    #[test]
    fn remove_neuron_shrinks_topology() {
        let mut net = layered("2-2-1");
        net.remove_neuron(2).unwrap();
        assert_eq!(net.topology().unwrap().to_string(), "2-1-1");
        net.remove_neuron(2).unwrap();
        assert_eq!(net.topology().unwrap().to_string(), "2-1");
    }

    #[test]
    fn removing_every_unit_drops_the_topology() {
        let mut net = layered("2-1");
        while !net.is_empty() {
            net.remove_neuron(0).unwrap();
        }
        assert!(net.topology().is_none());
        assert!(matches!(net.cleanup(true, true), Err(Error::TopologyRequired(_))));

        let mut net = layered("1");
        net.remove_neuron(0).unwrap();
        assert!(net.topology().is_none());
        let set = crate::data::PatternSet::new(1, 1, 1);
        assert!(matches!(net.test(&set), Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn add_neuron_grows_the_output_layer() {
        let mut net = layered("2-1");
        let id = net.add_neuron(Neuron::default());
        assert_eq!(id, 3);
        assert_eq!(net.topology().unwrap().to_string(), "2-2");
        assert_eq!(net.topology().unwrap().total_units(), net.len());
        assert_eq!(net.topology().unwrap().position(id).unwrap(), (1, 1));
    }

    #[test]
    fn full_feed_forward_counts() {
        let mut net = layered("3-4-2");
        net.connect_full_feed_forward(false).unwrap();
        assert_eq!(net.connection_count(), 3 * 4 + 4 * 2);

        let mut net = layered("3-4-2");
        net.connect_full_feed_forward(true).unwrap();
        assert_eq!(net.connection_count(), 3 * 4 + (3 + 4) * 2);
    }

    #[test]
    fn layer_operations_need_topology() {
        let mut net = Network::with_size(3);
        assert!(matches!(
            net.connect_full_feed_forward(false),
            Err(Error::TopologyRequired(_))
        ));
        assert!(matches!(net.connect_feed_forward(&[]), Err(Error::TopologyRequired(_))));
    }

    #[test]
    fn connect_full_includes_self_loops() {
        let mut net = Network::with_size(3);
        net.connect_full();
        assert_eq!(net.connection_count(), 9);
        assert!(net.is_connected(2, 2));
    }

    #[test]
    fn connect_feed_forward_honours_mask_and_diagonal() {
        let mut net = layered("2-2-1");
        let mut mask = vec![vec![true; 5]; 5];
        mask[3][3] = false; // disable hidden unit 3
        net.connect_feed_forward(&mask).unwrap();
        assert!(!net.neuron(3).unwrap().enabled);
        // 2 inputs -> hidden 2, hidden 2 -> output
        assert_eq!(net.connection_count(), 3);
        assert!(net.is_connected(2, 4));
        assert!(!net.is_connected(3, 4));
    }

    #[test]
    fn forward_pass_matches_hand_computation() {
        let mut net = Network::with_size(3);
        net.connect_weighted(0, 2, 0.5).unwrap();
        net.connect_weighted(1, 2, -1.0).unwrap();
        net.neuron_mut(2).unwrap().bias = 0.1;
        let out = net.forward(&[1.0, 0.25], 1).unwrap();
        assert_relative_eq!(out[0], sigmoid(0.1 + 0.5 - 0.25));
    }

    #[test]
    fn forward_pass_is_idempotent() {
        let mut net = layered("2-3-1");
        net.connect_full_feed_forward(true).unwrap();
        net.init(0.5, &mut StdRng::seed_from_u64(3));
        net.set_inputs(&[0.3, 0.9]).unwrap();
        net.forward_pass();
        let first: Vec<f64> = net.neurons().iter().map(|n| n.activation).collect();
        net.forward_pass();
        let second: Vec<f64> = net.neurons().iter().map(|n| n.activation).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn disabled_neuron_outputs_zero() {
        let mut net = Network::with_size(2);
        net.connect_weighted(0, 1, 3.0).unwrap();
        net.neuron_mut(1).unwrap().enabled = false;
        assert_eq!(net.forward(&[1.0], 1).unwrap(), vec![0.0]);
    }

    #[test]
    fn linear_units_pass_the_sum() {
        let mut net = Network::with_size(2);
        net.neuron_mut(1).unwrap().transfer = TransferFunction::Linear;
        net.connect_weighted(0, 1, 2.0).unwrap();
        assert_eq!(net.forward(&[1.5], 1).unwrap(), vec![3.0]);
    }

    #[test]
    fn weight_vector_round_trips_in_slot_order() {
        let mut net = Network::with_size(3);
        net.connect_weighted(0, 2, 0.5).unwrap();
        net.connect_weighted(1, 2, -0.5).unwrap();
        net.neuron_mut(2).unwrap().bias = 0.1;
        net.neuron_mut(0).unwrap().bias = 0.7;
        assert_eq!(net.weight_vector(), vec![0.1, 0.5, -0.5, 0.0, 0.7]);

        net.set_weight_vector(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(net.neuron(2).unwrap().bias, 1.0);
        assert_eq!(net.incoming(2).unwrap().map(|c| c.weight).collect::<Vec<_>>(), vec![2.0, 3.0]);
        assert_eq!(net.neuron(0).unwrap().bias, 5.0);
        assert!(net.set_weight_vector(&[1.0]).is_err());
    }

    #[test]
    fn init_stays_in_range() {
        let mut net = layered("4-5-3");
        net.connect_full_feed_forward(false).unwrap();
        net.init(0.5, &mut StdRng::seed_from_u64(11));
        assert!(net.weight_vector().iter().all(|w| w.abs() <= 0.5));
        assert!(net.weight_vector().iter().any(|w| *w != 0.0));
    }

    #[test]
    fn display_lists_every_neuron() {
        let mut net = Network::with_size(2);
        net.connect_weighted(0, 1, 0.5).unwrap();
        let text = net.to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().contains(" 0:+0.50"));
    }

    #[test]
    fn make_units_keeps_prototype() {
        let mut net = Network::new();
        net.set_prototype(Some(Neuron::new(TransferFunction::Linear)));
        net.make_units("2-1").unwrap();
        assert_eq!(net.len(), 3);
        assert!(net.neurons().iter().all(|n| n.transfer == TransferFunction::Linear));
        assert!(net.make_units("2-").is_err());
    }
}
