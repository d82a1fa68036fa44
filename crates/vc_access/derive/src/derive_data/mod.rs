//! Parsing of the derive input.

// -----------------------------------------------------------------------------
// Modules

mod access_struct;
mod field_attributes;
mod type_attributes;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use access_struct::{AccessField, AccessStruct};
pub(crate) use field_attributes::FieldAttributes;
pub(crate) use type_attributes::TypeAttributes;
