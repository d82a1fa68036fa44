//! Object readers/writers: per-instance access to the members of a type.
//!
//! - [`ObjectRw`] owns its current object and can construct one; it is both
//!   a [`DataReader`](crate::value::DataReader) and a
//!   [`DataWriter`](crate::value::DataWriter), so it plugs directly into
//!   value sinks and sources.
//! - [`ObjectRef`] borrows an object and only reads from it.
//!
//! Both are cheap to create once the schema of the type exists; all
//! per-type state lives in the shared [`TypeSchema`](crate::TypeSchema).

// -----------------------------------------------------------------------------
// Modules

mod binding;
mod object;
mod pool;

// -----------------------------------------------------------------------------
// Exports

pub use object::{ObjectRef, ObjectRw, read_object, write_object};

pub(crate) use pool::with_instance;
