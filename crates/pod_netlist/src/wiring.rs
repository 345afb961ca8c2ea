//! Pin, port and interface connections.
//!
//! Connections are undirected records in the [`ConnectionGraph`]; the
//! direction matrix only decides which pairs may be linked. A destination
//! pin that accepts a single driver (`in`, `clock`) loses its previous links
//! when it is connected again.
//!
//! [`ConnectionGraph`]: crate::graph::ConnectionGraph

use crate::error::NetlistError;
use crate::graph::GraphError;
use crate::ids::{InterfaceId, PortId};
use crate::pin::{Connection, PinRef};
use crate::port::Force;
use crate::project::Project;

impl Project {
    pub(crate) fn graph_error(&self, err: GraphError) -> NetlistError {
        match err {
            GraphError::NotLinked(a, b) => {
                NetlistError::NotConnected(self.pin_path(a), self.pin_path(b))
            }
            GraphError::Asymmetric(a, b) => {
                NetlistError::Asymmetric(self.pin_path(a), self.pin_path(b))
            }
        }
    }

    fn check_pin(&self, pin: PinRef) -> Result<(), NetlistError> {
        let width = self.port_width(pin.port)?;
        if pin.index >= width {
            return Err(NetlistError::PinOutOfRange {
                port: self.port_path(pin.port),
                pin: pin.index,
                width,
            });
        }
        Ok(())
    }

    /// Links pin `a` (source) to pin `b` (destination).
    ///
    /// Linking an already linked pair is a no-op. If `b` accepts a single
    /// driver, its existing links are severed first.
    pub fn connect(&mut self, a: PinRef, b: PinRef) -> Result<(), NetlistError> {
        let pa = self.live_port(a.port)?;
        let pb = self.live_port(b.port)?;
        if a == b {
            return Err(NetlistError::SelfConnection(self.pin_path(a)));
        }
        self.check_pin(a)?;
        self.check_pin(b)?;
        for (pin, port) in [(a, pa), (b, pb)] {
            if port.is_forced() {
                return Err(NetlistError::ForcedPort(self.port_path(pin.port)));
            }
        }
        if !pa.direction.can_connect_to(pb.direction) {
            return Err(NetlistError::IncompatibleDirection {
                source_pin: self.pin_path(a),
                from: pa.direction,
                dest_pin: self.pin_path(b),
                to: pb.direction,
            });
        }
        if self.graph.is_linked(a, b) {
            return Ok(());
        }

        if pb.direction.is_single_driver() {
            let previous: Vec<PinRef> = self.graph.neighbours(b).collect();
            if let Some(&other) = previous.iter().find(|&&n| !self.graph.is_linked(b, n)) {
                return Err(NetlistError::Asymmetric(
                    self.pin_path(b),
                    self.pin_path(other),
                ));
            }
            for other in previous {
                self.graph
                    .unlink(b, other)
                    .map_err(|e| self.graph_error(e))?;
                log::debug!(
                    "{} replaces driver {} of {}",
                    self.pin_path(a),
                    self.pin_path(other),
                    self.pin_path(b)
                );
            }
        }
        self.graph.link(a, b);
        log::debug!("connected {} -> {}", self.pin_path(a), self.pin_path(b));
        Ok(())
    }

    /// Checks that two whole ports can be wired pin by pin and returns
    /// their common width.
    fn check_port_pair(&self, a: PortId, b: PortId) -> Result<u32, NetlistError> {
        let pa = self.live_port(a)?;
        let pb = self.live_port(b)?;
        let wa = self.port_width(a)?;
        let wb = self.port_width(b)?;
        if wa != wb {
            return Err(NetlistError::WidthMismatch {
                a: self.port_path(a),
                a_width: wa,
                b: self.port_path(b),
                b_width: wb,
            });
        }
        for (id, port) in [(a, pa), (b, pb)] {
            if port.is_forced() {
                return Err(NetlistError::ForcedPort(self.port_path(id)));
            }
            if self.graph.port_is_connected(id) {
                return Err(NetlistError::PortConnected(self.port_path(id)));
            }
        }
        if a == b {
            return Err(NetlistError::SelfConnection(self.port_path(a)));
        }
        if !pa.direction.can_connect_to(pb.direction) {
            return Err(NetlistError::IncompatibleDirection {
                source_pin: self.port_path(a),
                from: pa.direction,
                dest_pin: self.port_path(b),
                to: pb.direction,
            });
        }
        Ok(wa)
    }

    /// Wires every pin of port `a` to the same pin of port `b`.
    ///
    /// Both ports must have the same width and no connection yet.
    pub fn connect_port(&mut self, a: PortId, b: PortId) -> Result<(), NetlistError> {
        let width = self.check_port_pair(a, b)?;
        for index in 0..width {
            self.connect(PinRef::new(a, index), PinRef::new(b, index))?;
        }
        Ok(())
    }

    /// Ports of `a` paired with the port of `b` carrying the same type tag.
    fn pair_by_type(
        &self,
        a: InterfaceId,
        b: InterfaceId,
    ) -> Result<Vec<(PortId, PortId)>, NetlistError> {
        let ia = self.live_interface(a)?;
        let ib = self.live_interface(b)?;
        let mismatch = |reason: String| NetlistError::InterfaceMismatch {
            a: self.interface_path(a),
            b: self.interface_path(b),
            reason,
        };
        if ia.ports.len() != ib.ports.len() {
            return Err(mismatch(format!(
                "{} ports against {}",
                ia.ports.len(),
                ib.ports.len()
            )));
        }
        let mut pairs = Vec::with_capacity(ia.ports.len());
        for &pa in &ia.ports {
            let ty = self.ports[pa]
                .port_type
                .as_deref()
                .ok_or_else(|| mismatch(format!("{} has no type", self.port_path(pa))))?;
            let pb = ib
                .ports
                .iter()
                .copied()
                .find(|&pb| self.ports[pb].port_type.as_deref() == Some(ty))
                .ok_or_else(|| mismatch(format!("no port of type {ty}")))?;
            pairs.push((pa, pb));
        }
        Ok(pairs)
    }

    /// Wires two interfaces port by port, pairing ports by type tag.
    ///
    /// Every pair is checked before the first pin is linked.
    pub fn connect_interface(&mut self, a: InterfaceId, b: InterfaceId) -> Result<(), NetlistError> {
        let pairs = self.pair_by_type(a, b)?;
        for &(pa, pb) in &pairs {
            self.check_port_pair(pa, pb)?;
        }
        for (pa, pb) in pairs {
            self.connect_port(pa, pb)?;
        }
        log::debug!(
            "connected interface {} -> {}",
            self.interface_path(a),
            self.interface_path(b)
        );
        Ok(())
    }

    /// Removes the link between `a` and `b`.
    pub fn disconnect(&mut self, a: PinRef, b: PinRef) -> Result<(), NetlistError> {
        self.graph.unlink(a, b).map_err(|e| self.graph_error(e))?;
        log::debug!("disconnected {} -x- {}", self.pin_path(a), self.pin_path(b));
        Ok(())
    }

    /// Removes every link of `pin`, returning how many were removed.
    pub fn disconnect_pin(&mut self, pin: PinRef) -> Result<usize, NetlistError> {
        let severed = self.graph.sever(pin).map_err(|e| self.graph_error(e))?;
        Ok(severed.len())
    }

    /// Removes every link of every pin of `port`.
    pub fn disconnect_port(&mut self, port: PortId) -> Result<usize, NetlistError> {
        self.live_port(port)?;
        let pins: Vec<u32> = self.graph.connected_pins(port).collect();
        for &index in &pins {
            let pin = PinRef::new(port, index);
            let other = self.graph.neighbours(pin).find(|&n| !self.graph.is_linked(pin, n));
            if let Some(other) = other {
                return Err(NetlistError::Asymmetric(
                    self.pin_path(pin),
                    self.pin_path(other),
                ));
            }
        }
        let mut count = 0;
        for index in pins {
            count += self.disconnect_pin(PinRef::new(port, index))?;
        }
        Ok(count)
    }

    /// Whether `a` and `b` are linked.
    pub fn connected(&self, a: PinRef, b: PinRef) -> bool {
        self.graph.is_linked(a, b)
    }

    /// The far ends of `pin`, as connection records.
    pub fn connections(&self, pin: PinRef) -> Result<Vec<Connection>, NetlistError> {
        self.live_port(pin.port)?;
        self.graph
            .neighbours(pin)
            .map(|other| {
                let port = self.live_port(other.port)?;
                let iface = &self.interfaces[port.interface];
                Ok(Connection {
                    instance_dest: self.instance_path(iface.instance),
                    interface_dest: self.name_of(iface.name).to_string(),
                    port_dest: self.name_of(port.name).to_string(),
                    pin_dest: other.index,
                })
            })
            .collect()
    }

    /// One plus the highest connected pin index of `port`, 0 if unconnected.
    pub fn real_size(&self, port: PortId) -> u32 {
        self.max_pin(port).map_or(0, |max| max + 1)
    }

    /// Highest connected pin index of `port`.
    pub fn max_pin(&self, port: PortId) -> Option<u32> {
        self.graph.connected_pins(port).last()
    }

    /// Lowest connected pin index of `port`.
    pub fn min_pin(&self, port: PortId) -> Option<u32> {
        self.graph.connected_pins(port).next()
    }

    /// Ties a port to a constant. The port must have no connection.
    pub fn set_force(&mut self, port: PortId, force: Force) -> Result<(), NetlistError> {
        self.live_port(port)?;
        if self.graph.port_is_connected(port) {
            return Err(NetlistError::PortConnected(self.port_path(port)));
        }
        self.ports[port].force = Some(force);
        log::debug!("forced {} to {force}", self.port_path(port));
        Ok(())
    }

    /// Releases a forced port.
    pub fn clear_force(&mut self, port: PortId) -> Result<(), NetlistError> {
        self.live_port(port)?;
        self.ports[port].force = None;
        Ok(())
    }

    /// Sets the value an input takes when left unconnected.
    pub fn set_unconnected_value(&mut self, port: PortId, value: u8) -> Result<(), NetlistError> {
        let p = self.live_port(port)?;
        if p.direction != crate::direction::Direction::In {
            return Err(NetlistError::NotAnInput(self.port_path(port)));
        }
        if value > 1 {
            return Err(NetlistError::InvalidUnconnectedValue(value));
        }
        self.ports[port].unconnected = Some(value == 1);
        Ok(())
    }
}
