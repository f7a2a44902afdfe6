//! Covenant core library: signature collection, quorum, and finalization.
//!
//! The [`Registry`] is a deterministic state machine that:
//! - collects one signature record per identity, bound to a document hash
//! - rejects submissions at or after a fixed deadline
//! - lets a single owner identity anchor a combined hash, exactly once,
//!   after a minimum number of distinct signatures has been reached
//! - emits an event on each accepted mutation via a pluggable sink
//!
//! Off-chain credential checking, combined-hash computation, caller
//! authentication, and persistence are all out of scope here and belong to
//! the hosting process.

pub mod errors;
pub mod registry;
pub mod traits;
pub mod types;

pub use errors::RegistryError;
pub use registry::Registry;
pub use traits::{EventSink, NopSink};
pub use types::{Hash32, Identity, MalformedHash, RegistryEvent, SignatureRecord};

/// Library version string.
pub fn version() -> &'static str { "covenant-core 0.1.0" }

#[cfg(test)]
mod tests;
