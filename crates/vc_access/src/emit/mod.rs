//! Builds the reader/writer of a type from its planned members.
//!
//! Two flavours share the same observable behavior:
//!
//! - compiled: one specialized closure per member with the value route and
//!   the inaccessible-member policy baked in, plus [`dispatch`] trees for key
//!   resolution;
//! - reflective: a scan over the key table and interpretive member access,
//!   used for restricted types, when the `emit` feature is disabled, or when
//!   the registry asks for it.
//!
//! Emission failures do not fail schema construction; they are kept in a
//! failed [`Factory`] and reported whenever an instance is requested.

// -----------------------------------------------------------------------------
// Modules

mod compiled;
mod dispatch;
mod reflective;

// -----------------------------------------------------------------------------
// Exports

pub use dispatch::MAX_DISPATCH_DEPTH;

pub(crate) use dispatch::{KeyDispatch, LinearLookup};

// -----------------------------------------------------------------------------
// Internal

use alloc::boxed::Box;
use alloc::sync::Arc;

use compiled::CompiledRw;
use reflective::ReflectiveRw;

use crate::declare::Ctors;
use crate::error::{AccessResult, EmitError};
use crate::info::{KeyTable, Options};
use crate::plan::PlannedMember;
use crate::registry::Registry;
use crate::value::{DataReader, DataWriter, Key, StopToken, ValueReader, ValueWriter};

/// How the reader/writer of a type was built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EmitMode {
    Compiled,
    Reflective,
    /// Emission failed; creating an instance reports the error.
    Failed,
}

/// Member operations by ordinal.
///
/// Ordinals are resolved and range-checked by the caller.
pub(crate) trait RwOps<T>: Send + Sync {
    fn read(&self, target: &T, ordinal: usize, writer: &mut dyn ValueWriter, registry: &'static Registry) -> AccessResult;

    fn write(
        &self,
        target: &mut T,
        ordinal: usize,
        reader: &mut dyn ValueReader,
        registry: &'static Registry,
    ) -> AccessResult;

    fn read_all(&self, target: &T, writer: &mut dyn DataWriter, stop: &StopToken, registry: &'static Registry) -> AccessResult;

    fn write_all(
        &self,
        target: &mut T,
        reader: &mut dyn DataReader,
        stop: &StopToken,
        registry: &'static Registry,
    ) -> AccessResult;
}

/// The cached outcome of emission for one type.
pub(crate) enum Factory<T> {
    Ready { ops: Box<dyn RwOps<T>>, ctors: Ctors<T> },
    Failed(Arc<EmitError>),
}

/// Key resolution, matching the emitted flavour.
pub(crate) enum Lookup {
    Dispatch(KeyDispatch),
    Linear(LinearLookup),
}

impl Lookup {
    #[inline]
    pub fn find(&self, key: Key<'_>, keys: &KeyTable) -> Option<usize> {
        match self {
            Self::Dispatch(dispatch) => dispatch.find(key),
            Self::Linear(linear) => linear.find(key, keys),
        }
    }
}

pub(crate) struct Emitted<T> {
    pub lookup: Lookup,
    pub mode: EmitMode,
    pub factory: Factory<T>,
}

pub(crate) fn emit<T: 'static>(
    ty: &'static str,
    members: &[PlannedMember<T>],
    keys: &KeyTable,
    options: Options,
    compiled: bool,
    ctors: Ctors<T>,
) -> Emitted<T> {
    let ignore_case = options.contains(Options::IGNORE_CASE);
    let lookup = if compiled {
        KeyDispatch::build(keys, ignore_case).map(Lookup::Dispatch)
    } else {
        LinearLookup::build(keys, ignore_case).map(Lookup::Linear)
    };

    match lookup {
        Ok(lookup) => {
            let (mode, ops): (EmitMode, Box<dyn RwOps<T>>) = if compiled {
                (EmitMode::Compiled, Box::new(CompiledRw::new(ty, members)))
            } else {
                (EmitMode::Reflective, Box::new(ReflectiveRw::new(ty, members)))
            };
            log::trace!("emitted a {mode:?} reader/writer for `{ty}`");
            Emitted {
                lookup,
                mode,
                factory: Factory::Ready { ops, ctors },
            }
        }
        Err(error) => {
            log::error!("cannot emit the reader/writer of `{ty}`: {error}");
            Emitted {
                lookup: Lookup::Linear(LinearLookup::unchecked(keys, ignore_case)),
                mode: EmitMode::Failed,
                factory: Factory::Failed(Arc::new(error)),
            }
        }
    }
}
