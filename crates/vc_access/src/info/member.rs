use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;

// -----------------------------------------------------------------------------
// TypeRef

/// Identity and name of a Rust type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeRef {
    id: TypeId,
    name: &'static str,
}

impl TypeRef {
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// -----------------------------------------------------------------------------
// MemberKind

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Property,
    /// A parameterized accessor. Never serialized.
    Indexer,
}

// -----------------------------------------------------------------------------
// MemberDescriptor

/// Order key of members without an explicit one.
pub const DEFAULT_ORDER: i32 = 999;

/// One serializable member of a [`TypeSchema`](crate::TypeSchema).
///
/// A member declared with several directives appears once per directive,
/// each with its own serialized name and ordinal.
#[derive(Clone, Debug)]
pub struct MemberDescriptor {
    pub(crate) name: &'static str,
    pub(crate) serialized_name: Box<str>,
    pub(crate) kind: MemberKind,
    pub(crate) declaring_type: &'static str,
    pub(crate) depth: usize,
    pub(crate) before_type: TypeRef,
    pub(crate) after_type: TypeRef,
    pub(crate) readable: bool,
    pub(crate) writable: bool,
    pub(crate) read_public: bool,
    pub(crate) write_public: bool,
    pub(crate) is_static: bool,
    pub(crate) ordinal: usize,
    pub(crate) order: i32,
    pub(crate) skip_default: bool,
    pub(crate) error_if_unreadable: bool,
    pub(crate) error_if_unwritable: bool,
    pub(crate) explicit: bool,
}

impl MemberDescriptor {
    /// The name the member was declared with.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The key the member is read and written under.
    #[inline]
    pub fn serialized_name(&self) -> &str {
        &self.serialized_name
    }

    #[inline]
    pub const fn kind(&self) -> MemberKind {
        self.kind
    }

    #[inline]
    pub const fn declaring_type(&self) -> &'static str {
        self.declaring_type
    }

    /// Inheritance depth of the declaring type; the root base is 0.
    #[inline]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// The type as stored in the object.
    #[inline]
    pub const fn before_type(&self) -> TypeRef {
        self.before_type
    }

    /// The type exposed to sinks and sources.
    ///
    /// Differs from [`before_type`](Self::before_type) for custom and
    /// converting accessors.
    #[inline]
    pub const fn after_type(&self) -> TypeRef {
        self.after_type
    }

    #[inline]
    pub const fn is_readable(&self) -> bool {
        self.readable
    }

    #[inline]
    pub const fn is_writable(&self) -> bool {
        self.writable
    }

    #[inline]
    pub const fn is_read_public(&self) -> bool {
        self.read_public
    }

    #[inline]
    pub const fn is_write_public(&self) -> bool {
        self.write_public
    }

    #[inline]
    pub const fn is_static(&self) -> bool {
        self.is_static
    }

    #[inline]
    pub const fn ordinal(&self) -> usize {
        self.ordinal
    }

    #[inline]
    pub const fn order(&self) -> i32 {
        self.order
    }

    #[inline]
    pub const fn skip_default(&self) -> bool {
        self.skip_default
    }

    #[inline]
    pub const fn error_if_unreadable(&self) -> bool {
        self.error_if_unreadable
    }

    #[inline]
    pub const fn error_if_unwritable(&self) -> bool {
        self.error_if_unwritable
    }

    /// Whether the member was selected by an explicit directive.
    #[inline]
    pub const fn is_explicit(&self) -> bool {
        self.explicit
    }
}
