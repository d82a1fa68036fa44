use super::Declaration;
use crate::info::Options;

/// A type whose members can be read and written by key.
///
/// `declare` is called once per registry, when the schema of the type is
/// built; it is never called on the hot path.
///
/// Usually implemented with `#[derive(Accessible)]`, which also implements
/// [`AccessValue`](crate::AccessValue) so the type can be nested inside
/// other accessible types.
pub trait Accessible: Sized + Send + Sync + 'static {
    /// Options of the type, used when the registry holds none for it.
    const OPTIONS: Option<Options> = None;

    fn declare(decl: &mut Declaration<Self>);
}
