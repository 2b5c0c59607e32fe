use log::debug;

use crate::error::Result;
use crate::network::network::Network;

impl Network {
    /// Prunes hidden units whose connectivity is one-sided.
    ///
    /// A hidden unit that feeds others without being fed, or is fed without
    /// feeding anything, is disconnected and disabled. Since that can strand
    /// its neighbours the sweep repeats until a full pass changes nothing.
    ///
    /// With `remove_passthrough`, hidden units with exactly one incoming or
    /// exactly one outgoing connection are bypassed: their neighbours are
    /// wired directly (zero weight) and the unit is disabled. With
    /// `remove_disabled`, disabled hidden units are then removed and the
    /// topology shrinks to match.
    pub fn cleanup(&mut self, remove_disabled: bool, remove_passthrough: bool) -> Result<()> {
        let topology = self.require_topology("cleanup")?;
        let first_hidden = topology.input_size();
        let output_base = topology.total_units() - topology.output_size();

        let mut pass = 0;
        loop {
            pass += 1;
            let mut disabled = 0;
            for unit in first_hidden..output_base {
                if !self.neurons[unit].enabled {
                    continue;
                }
                let fed = self.neurons[unit].incoming.len();
                let feeds = self.neurons[unit].outgoing.len();

                if (feeds > 0 && fed == 0) || (feeds == 0 && fed > 0) {
                    self.isolate(unit)?;
                    disabled += 1;
                } else if remove_passthrough && fed > 0 && (fed == 1 || feeds == 1) {
                    self.bypass(unit)?;
                    disabled += 1;
                }
            }
            debug!("cleanup pass {pass}: disabled {disabled} units");
            if disabled == 0 {
                break;
            }
        }

        for unit in 0..output_base {
            let neuron = &mut self.neurons[unit];
            neuron.enabled = if unit < first_hidden {
                !neuron.outgoing.is_empty()
            } else {
                !neuron.incoming.is_empty()
            };
        }

        if remove_disabled {
            let mut removed = 0;
            for unit in (first_hidden..output_base).rev() {
                if !self.neurons[unit].enabled {
                    self.remove_neuron(unit)?;
                    removed += 1;
                }
            }
            debug!(
                "cleanup removed {removed} units, topology now {}",
                self.topology().map(|t| t.to_string()).unwrap_or_default()
            );
        }
        Ok(())
    }

    fn isolate(&mut self, unit: usize) -> Result<()> {
        self.disconnect_all(unit)?;
        self.neurons[unit].enabled = false;
        Ok(())
    }

    /// Wires every source of `unit` to every target of `unit`, skipping pairs
    /// that are already connected, then isolates `unit`.
    fn bypass(&mut self, unit: usize) -> Result<()> {
        let sources: Vec<usize> = self
            .incoming_iter(unit)
            .map(|c| c.source)
            .filter(|&s| s != unit)
            .collect();
        let targets: Vec<usize> = self
            .outgoing_iter(unit)
            .map(|c| c.target)
            .filter(|&t| t != unit)
            .collect();
        for &target in &targets {
            for &source in &sources {
                if !self.is_connected(source, target) {
                    self.connect(source, target)?;
                }
            }
        }
        self.isolate(unit)
    }
}
