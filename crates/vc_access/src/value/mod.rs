//! The value protocol spoken between object readers/writers and their
//! collaborators.
//!
//! - [`ValueWriter`] is a sink for exactly one value.
//! - [`ValueReader`] is a source of exactly one value.
//! - [`DataWriter`] / [`DataReader`] are keyed containers of sinks/sources,
//!   one level of object or array nesting.
//! - [`AccessValue`] is the per-type value interface deciding how a Rust
//!   value is moved through a sink or out of a source.
//!
//! [`Value`] is an in-memory implementation of all four collaborator traits.

// -----------------------------------------------------------------------------
// Modules

mod dynamic;
mod interface;
mod key;
mod primitive;
mod stop;
mod traits;
mod zero;

// -----------------------------------------------------------------------------
// Exports

pub use dynamic::{Value, ValueObject};
pub use interface::{AccessValue, ValueInterface, read_dispatch, write_dispatch};
pub use key::{Key, KeyKind};
pub use primitive::{Primitive, PrimitiveKind};
pub use stop::StopToken;
pub use traits::{DataReader, DataSource, DataWriter, Discard, ValueReader, ValueWriter};
pub use zero::is_zeroed;
