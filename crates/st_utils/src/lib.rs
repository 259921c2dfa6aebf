//! Shared containers for the stripes crates.
//!
//! - [`hash`]: fixed-seed hashing and `hashbrown` container aliases.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId).

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
