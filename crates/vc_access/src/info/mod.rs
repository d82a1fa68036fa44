//! Descriptions of a type's serializable surface.
//!
//! A [`TypeSchema`] is produced once per type and registry. It owns the
//! ordered [`MemberDescriptor`]s, one [`AccessPlan`] per member, the
//! [`KeyTable`] of serialized names and the frozen [`Options`].

// -----------------------------------------------------------------------------
// Modules

mod keys;
mod member;
mod options;
mod schema;

// -----------------------------------------------------------------------------
// Exports

pub use keys::{KeySpan, KeyTable};
pub use member::{DEFAULT_ORDER, MemberDescriptor, MemberKind, TypeRef};
pub use options::Options;
pub use schema::TypeSchema;

pub use crate::plan::{AccessPlan, AccessStrategy, ValueRoute};
