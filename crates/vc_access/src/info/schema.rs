use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use super::{KeyTable, MemberDescriptor, Options, TypeRef};
use crate::emit::{EmitMode, Factory, Lookup};
use crate::plan::AccessPlan;
use crate::registry::Registry;
use crate::value::Key;

// -----------------------------------------------------------------------------
// TypeSchema

/// The finalized, immutable serializable surface of a type.
///
/// Built once per registry by [`Registry::schema`] and leaked, so every
/// reader/writer of the type shares the same `&'static` schema.
///
/// # Examples
///
/// ```
/// use vc_access::{Accessible, Registry};
///
/// #[derive(Accessible, Default)]
/// #[access(default)]
/// pub struct Point {
///     pub y: i32,
///     pub x: i32,
/// }
///
/// let schema = Registry::global().schema::<Point>().unwrap();
///
/// // Ordinals follow the serialized names when no order is given.
/// assert_eq!(schema.member(0).unwrap().serialized_name(), "x");
/// assert_eq!(schema.ordinal_of("y".into()), Some(1));
/// ```
pub struct TypeSchema {
    pub(crate) ty: TypeRef,
    pub(crate) options: Options,
    pub(crate) members: Box<[MemberDescriptor]>,
    pub(crate) plans: Box<[AccessPlan]>,
    pub(crate) keys: KeyTable,
    pub(crate) lookup: Lookup,
    pub(crate) mode: EmitMode,
    pub(crate) registry: &'static Registry,
    pub(crate) factory: Box<dyn Any + Send + Sync>,
}

impl TypeSchema {
    #[inline]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.ty.name()
    }

    /// The frozen options the schema was built with.
    #[inline]
    pub const fn options(&self) -> Options {
        self.options
    }

    /// Members in ordinal order.
    #[inline]
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    #[inline]
    pub fn member(&self, ordinal: usize) -> Option<&MemberDescriptor> {
        self.members.get(ordinal)
    }

    #[inline]
    pub fn plan(&self, ordinal: usize) -> Option<&AccessPlan> {
        self.plans.get(ordinal)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[inline]
    pub const fn keys(&self) -> &KeyTable {
        &self.keys
    }

    /// How the reader/writer of the type was built.
    #[inline]
    pub const fn mode(&self) -> EmitMode {
        self.mode
    }

    /// The registry that built the schema.
    #[inline]
    pub const fn registry(&self) -> &'static Registry {
        self.registry
    }

    /// Resolves a key to an ordinal, regardless of the not-found policy.
    #[inline]
    pub fn ordinal_of(&self, key: Key<'_>) -> Option<usize> {
        self.lookup.find(key, &self.keys)
    }

    #[inline]
    pub(crate) fn factory<T: 'static>(&self) -> Option<&Factory<T>> {
        self.factory.downcast_ref()
    }
}

impl fmt::Debug for TypeSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSchema")
            .field("ty", &self.ty)
            .field("options", &self.options)
            .field("mode", &self.mode)
            .field("members", &self.members)
            .finish_non_exhaustive()
    }
}
