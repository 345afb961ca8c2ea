//! Shared foundational types for the pod IP-core assembly workspace.
//!
//! Interned names for instances, interfaces and ports, content hashing of
//! generated artifacts, and the internal error type used for invariant breaks.

#![warn(missing_docs)]

pub mod hash;
pub mod ident;
pub mod result;

pub use hash::ContentHash;
pub use ident::{Ident, Interner};
pub use result::{InternalError, PodResult};
