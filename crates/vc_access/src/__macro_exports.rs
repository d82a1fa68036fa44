//! Items referenced by `#[derive(Accessible)]` output. Not public API.

#[cfg(feature = "auto_register")]
pub use inventory;

pub use crate::declare::{Accessible, Declaration, RwField};
pub use crate::error::AccessResult;
pub use crate::info::Options;
pub use crate::registry::{AutoRegistration, Registry};
pub use crate::rw::{read_object, write_object};
pub use crate::value::{AccessValue, ValueReader, ValueWriter};

/// Builds the schema of `T`; the entry point of auto-registration.
pub fn prepare<T: Accessible>(registry: &'static Registry) -> AccessResult {
    registry.schema::<T>().map(drop)
}
