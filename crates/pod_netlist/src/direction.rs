//! Port directions and which may drive which.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of a port, seen from the component that owns it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Driven by the component.
    Out,
    /// Read by the component.
    In,
    /// Bidirectional.
    InOut,
    /// PLL lock indicator.
    Lock,
    /// Clock input of a clock domain.
    Clock,
}

impl Direction {
    /// All directions, in matrix order.
    pub const ALL: [Direction; 5] = [
        Direction::Out,
        Direction::In,
        Direction::InOut,
        Direction::Lock,
        Direction::Clock,
    ];

    /// Whether a connection from a `self` pin to a `dest` pin is allowed.
    ///
    /// | src \ dst | out | in | inout | lock | clock |
    /// |-----------|-----|----|-------|------|-------|
    /// | out       |  0  | 1  |   1   |  0   |   0   |
    /// | in        |  1  | 1  |   1   |  0   |   1   |
    /// | inout     |  1  | 1  |   1   |  0   |   0   |
    /// | lock      |  1  | 1  |   1   |  0   |   0   |
    /// | clock     |  0  | 1  |   0   |  0   |   0   |
    pub fn can_connect_to(self, dest: Direction) -> bool {
        use Direction::*;
        match (self, dest) {
            (_, Lock) => false,
            (Out, In | InOut) => true,
            (Out, _) => false,
            (In, _) => true,
            (InOut | Lock, Out | In | InOut) => true,
            (InOut | Lock, Clock) => false,
            (Clock, In) => true,
            (Clock, _) => false,
        }
    }

    /// Whether a pin of this direction keeps at most one connection.
    pub fn is_single_driver(self) -> bool {
        matches!(self, Direction::In | Direction::Clock)
    }

    /// Direction of the mirror port an Intercon presents for this port.
    pub fn mirrored(self) -> Direction {
        match self {
            Direction::Out => Direction::In,
            Direction::In => Direction::Out,
            Direction::InOut => Direction::InOut,
            Direction::Lock | Direction::Clock => Direction::In,
        }
    }

    /// Keyword used in configuration files and VHDL.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Out => "out",
            Direction::In => "in",
            Direction::InOut => "inout",
            Direction::Lock => "lock",
            Direction::Clock => "clock",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a direction keyword that is not one of the five known ones.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown port direction '{0}'")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ParseDirectionError(s.to_string()))
    }
}
