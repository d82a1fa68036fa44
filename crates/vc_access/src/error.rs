use alloc::string::String;
use alloc::sync::Arc;

use thiserror::Error;

// -----------------------------------------------------------------------------
// AccessError

/// Errors raised while building or using an object reader/writer.
///
/// Configuration errors (`NamingConflict`, `AlreadyInitialized`,
/// `NoAccessor`) are returned as soon as they are detected.
/// Not-found and inaccessible-member errors are only produced when the
/// type's [`Options`](crate::Options) ask for them.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum AccessError {
    /// Two members declared on the same type resolve to the same serialized name.
    #[error("`{ty}` declares the serialized name `{name}` more than once at the same level")]
    NamingConflict { ty: &'static str, name: String },
    /// The options of a type were changed after its schema was built.
    #[error("the options of `{0}` are frozen, its schema has already been built")]
    AlreadyInitialized(&'static str),
    /// A member was declared without any accessor.
    #[error("member `{member}` of `{ty}` declares no accessor")]
    NoAccessor { ty: &'static str, member: &'static str },
    /// The key does not name a member, and `NOT_FOUND_ERROR` is set.
    #[error("`{ty}` has no member named `{key}`")]
    MissingMember { ty: &'static str, key: String },
    #[error("member `{member}` of `{ty}` cannot be read")]
    CannotRead { ty: &'static str, member: String },
    #[error("member `{member}` of `{ty}` cannot be written")]
    CannotWrite { ty: &'static str, member: String },
    /// `initialize` was called on a type with neither a constructor nor an allocator.
    #[error("`{0}` declares neither a constructor nor an allocator")]
    NoConstructor(&'static str),
    /// The reader/writer has no current object.
    #[error("the reader/writer of `{0}` is not bound to an object")]
    Unbound(&'static str),
    /// The reader/writer of the type could not be built.
    #[error("failed to build the reader/writer of `{ty}`: {source}")]
    Construction {
        ty: &'static str,
        source: Arc<EmitError>,
    },
    /// A value endpoint produced a different kind of value than requested.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// A numeric value does not fit into the requested type.
    #[error("{value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },
    #[error("{0} is not supported by this endpoint")]
    Unsupported(&'static str),
    /// Error raised by a collaborator, such as a serde serializer.
    #[error("{0}")]
    Custom(String),
}

/// Result type used throughout the crate.
pub type AccessResult<T = ()> = Result<T, AccessError>;

// -----------------------------------------------------------------------------
// EmitError

/// Errors raised while the reader/writer of a type is being built.
///
/// An `EmitError` does not abort the schema lookup: the schema is published
/// with a failed factory and every later attempt to create a reader/writer
/// returns [`AccessError::Construction`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// Two keys compare equal once case folding is applied.
    #[error("keys `{first}` and `{second}` are indistinguishable under case-insensitive lookup")]
    AmbiguousKey { first: String, second: String },
}
