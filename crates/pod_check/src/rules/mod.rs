//! All built-in check rule implementations.
//!
//! This module re-exports the individual rule types and provides
//! `register_builtin_rules` to add all 12 rules to a `CheckEngine`.

mod e101;
mod e102;
mod e103;
mod e104;
mod e201;
mod e202;
mod e203;
mod e204;
mod e301;
mod e302;
mod w101;
mod w102;

pub use e101::AsymmetricConnection;
pub use e102::ForcedPortConnected;
pub use e103::VariablePortGap;
pub use e104::PinOutOfRange;
pub use e201::MisalignedWindow;
pub use e202::OverlappingWindows;
pub use e203::RegisterCollision;
pub use e204::WindowOutOfRange;
pub use e301::MissingBusRole;
pub use e302::UnresolvedWidth;
pub use w101::UnboundSlave;
pub use w102::EmptyMaster;

use crate::CheckEngine;

/// Registers all 12 built-in rules with the engine.
///
/// This adds rules E101-E104, E201-E204, E301-E302 and W101-W102.
pub fn register_builtin_rules(engine: &mut CheckEngine) {
    engine.register(Box::new(AsymmetricConnection));
    engine.register(Box::new(ForcedPortConnected));
    engine.register(Box::new(VariablePortGap));
    engine.register(Box::new(PinOutOfRange));
    engine.register(Box::new(MisalignedWindow));
    engine.register(Box::new(OverlappingWindows));
    engine.register(Box::new(RegisterCollision));
    engine.register(Box::new(WindowOutOfRange));
    engine.register(Box::new(MissingBusRole));
    engine.register(Box::new(UnresolvedWidth));
    engine.register(Box::new(UnboundSlave));
    engine.register(Box::new(EmptyMaster));
}
