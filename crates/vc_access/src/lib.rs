#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code refers to `::vc_access`, which must also resolve inside
// this crate's own tests and doctests.
extern crate self as vc_access;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod discovery;
mod error;
mod plan;

pub mod declare;
pub mod emit;
pub mod info;
pub mod registry;
pub mod rw;
pub mod serde;
pub mod utils;
pub mod value;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use declare::{Accessible, Declaration, RwField};
pub use error::{AccessError, AccessResult, EmitError};
pub use info::{Options, TypeSchema};
pub use registry::{Registry, RegistryConfig};
pub use rw::{ObjectRef, ObjectRw};
pub use value::{AccessValue, Key, StopToken, Value};
pub use vc_access_derive as derive;
pub use vc_access_derive::Accessible;
