//! Symmetric adjacency between pins.
//!
//! Every link is stored on both endpoints. [`ConnectionGraph::link`] and
//! [`ConnectionGraph::unlink`] are the only mutators and always touch both
//! records, so a one-sided link can only come from a bug, and is reported as
//! [`GraphError::Asymmetric`] rather than repaired.

use std::collections::{BTreeMap, BTreeSet};

use crate::ids::PortId;
use crate::pin::PinRef;

/// Failure of an unlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Neither endpoint records the link.
    #[error("{0} and {1} are not connected")]
    NotLinked(PinRef, PinRef),
    /// Only the first endpoint records the link.
    #[error("connection {0} -> {1} has no mirror record")]
    Asymmetric(PinRef, PinRef),
}

/// Pin adjacency keyed by [`PinRef`].
#[derive(Debug, Clone, Default)]
pub struct ConnectionGraph {
    edges: BTreeMap<PinRef, BTreeSet<PinRef>>,
}

impl ConnectionGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `a <-> b`. Linking an existing pair is a no-op.
    pub fn link(&mut self, a: PinRef, b: PinRef) {
        self.edges.entry(a).or_default().insert(b);
        self.edges.entry(b).or_default().insert(a);
    }

    /// Removes `a <-> b`, leaving the graph unchanged on error.
    pub fn unlink(&mut self, a: PinRef, b: PinRef) -> Result<(), GraphError> {
        match (self.has_record(a, b), self.has_record(b, a)) {
            (true, true) => {
                self.remove_record(a, b);
                self.remove_record(b, a);
                Ok(())
            }
            (false, false) => Err(GraphError::NotLinked(a, b)),
            (true, false) => Err(GraphError::Asymmetric(a, b)),
            (false, true) => Err(GraphError::Asymmetric(b, a)),
        }
    }

    /// Removes every link of `pin` and returns the former neighbours.
    ///
    /// All links are checked first; if any is one-sided nothing is removed.
    pub fn sever(&mut self, pin: PinRef) -> Result<Vec<PinRef>, GraphError> {
        let neighbours: Vec<PinRef> = self.neighbours(pin).collect();
        if let Some(&other) = neighbours.iter().find(|&&n| !self.has_record(n, pin)) {
            return Err(GraphError::Asymmetric(pin, other));
        }
        for &other in &neighbours {
            self.remove_record(pin, other);
            self.remove_record(other, pin);
        }
        Ok(neighbours)
    }

    /// Returns `true` if both records of `a <-> b` exist.
    pub fn is_linked(&self, a: PinRef, b: PinRef) -> bool {
        self.has_record(a, b) && self.has_record(b, a)
    }

    /// Pins linked to `pin`, in pin order.
    pub fn neighbours(&self, pin: PinRef) -> impl Iterator<Item = PinRef> + '_ {
        self.edges.get(&pin).into_iter().flatten().copied()
    }

    /// Number of links recorded on `pin`.
    pub fn degree(&self, pin: PinRef) -> usize {
        self.edges.get(&pin).map_or(0, BTreeSet::len)
    }

    /// Pins of `port` that carry at least one link, in index order.
    pub fn connected_pins(&self, port: PortId) -> impl Iterator<Item = u32> + '_ {
        self.edges
            .range(PinRef::new(port, 0)..=PinRef::new(port, u32::MAX))
            .map(|(pin, _)| pin.index)
    }

    /// Returns `true` if any pin of `port` carries a link.
    pub fn port_is_connected(&self, port: PortId) -> bool {
        self.connected_pins(port).next().is_some()
    }

    /// Number of distinct links.
    pub fn link_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Records whose mirror is missing, as `(holder, target)` pairs.
    pub fn asymmetric_records(&self) -> Vec<(PinRef, PinRef)> {
        self.edges
            .iter()
            .flat_map(|(&a, set)| set.iter().map(move |&b| (a, b)))
            .filter(|&(a, b)| !self.has_record(b, a))
            .collect()
    }

    fn has_record(&self, from: PinRef, to: PinRef) -> bool {
        self.edges.get(&from).is_some_and(|set| set.contains(&to))
    }

    fn remove_record(&mut self, from: PinRef, to: PinRef) {
        if let Some(set) = self.edges.get_mut(&from) {
            set.remove(&to);
            if set.is_empty() {
                self.edges.remove(&from);
            }
        }
    }

    /// Adds a record without its mirror.
    #[cfg(any(test, feature = "testing"))]
    #[doc(hidden)]
    pub fn insert_one_sided(&mut self, from: PinRef, to: PinRef) {
        self.edges.entry(from).or_default().insert(to);
    }
}
