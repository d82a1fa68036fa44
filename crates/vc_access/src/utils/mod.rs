//! Hash containers shared by the registry, the pools and the dispatch trees.

// -----------------------------------------------------------------------------
// Modules

mod hash;
mod typeid_map;

// -----------------------------------------------------------------------------
// Exports

pub use hash::{FixedHashState, HashMap, NoOpHashState};
pub use typeid_map::TypeIdMap;
