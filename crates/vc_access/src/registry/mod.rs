//! The registry: per-type schemas, options and value interface overrides.
//!
//! ## Menu
//!
//! - [`Registry`]: builds and caches the [`TypeSchema`](crate::TypeSchema)
//!   of each [`Accessible`](crate::Accessible) type, once, under a lock.
//! - [`RegistryConfig`]: the default options of a registry and whether it
//!   emits compiled readers/writers.
//!
//! [`Registry::global`] is the process-wide instance used by
//! [`ObjectRw::new`](crate::ObjectRw::new). Isolated registries are created
//! with [`Registry::new`] and leaked with [`Registry::leak`], since schemas
//! borrow their registry for `'static`.
//!
//! ## auto_register
//!
//! See [`Registry::auto_register`].
//!
//! Types deriving `Accessible` with `#[access(auto_register)]` are collected
//! with the [`inventory`] crate. Platforms it does not support simply
//! register nothing.

// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod interfaces;
mod registry;

// -----------------------------------------------------------------------------
// Exports

pub use auto_register::AutoRegistration;
pub use registry::{Registry, RegistryConfig};
