use core::any::type_name;

use crate::declare::{Accessible, Ctors};
use crate::emit::{Factory, RwOps};
use crate::error::{AccessError, AccessResult};
use crate::info::{Options, TypeSchema};
use crate::registry::Registry;
use crate::value::{DataReader, DataWriter, Key, StopToken, ValueReader, ValueWriter};

/// The shared per-type state an instance works with.
pub(crate) struct Binding<T: 'static> {
    pub schema: &'static TypeSchema,
    ops: &'static dyn RwOps<T>,
    ctors: &'static Ctors<T>,
}

impl<T: 'static> Clone for Binding<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for Binding<T> {}

impl<T: Accessible> Binding<T> {
    pub fn resolve(registry: &'static Registry) -> AccessResult<Self> {
        let schema = registry.schema::<T>()?;
        let factory = schema
            .factory::<T>()
            .ok_or(AccessError::TypeMismatch {
                expected: type_name::<T>(),
                found: schema.type_name(),
            })?;
        match factory {
            Factory::Ready { ops, ctors } => Ok(Self {
                schema,
                ops: &**ops,
                ctors,
            }),
            Factory::Failed(error) => Err(AccessError::Construction {
                ty: schema.type_name(),
                source: error.clone(),
            }),
        }
    }

    #[inline]
    pub fn registry(&self) -> &'static Registry {
        self.schema.registry()
    }

    /// Resolves `key`, applying the not-found policy.
    pub fn ordinal(&self, key: Key<'_>) -> AccessResult<Option<usize>> {
        match self.schema.ordinal_of(key) {
            Some(ordinal) => Ok(Some(ordinal)),
            None if self.schema.options().contains(Options::NOT_FOUND_ERROR) => {
                Err(AccessError::MissingMember {
                    ty: self.schema.type_name(),
                    key: key.to_text().into_owned(),
                })
            }
            None => Ok(None),
        }
    }

    /// A new instance, from the allocator when `ALLOCATE` is set, otherwise
    /// from the constructor. Either falls back to the other.
    pub fn construct(&self) -> AccessResult<T> {
        let Ctors {
            constructor,
            allocator,
        } = self.ctors;
        let ctor = if self.schema.options().contains(Options::ALLOCATE) {
            allocator.as_ref().or(constructor.as_ref())
        } else {
            constructor.as_ref().or(allocator.as_ref())
        };
        match ctor {
            Some(ctor) => Ok(ctor()),
            None => Err(AccessError::NoConstructor(self.schema.type_name())),
        }
    }

    pub fn read_value(&self, target: &T, key: Key<'_>, writer: &mut dyn ValueWriter) -> AccessResult {
        match self.ordinal(key)? {
            Some(ordinal) => self.ops.read(target, ordinal, writer, self.registry()),
            None => writer.write_null(),
        }
    }

    pub fn write_value(&self, target: &mut T, key: Key<'_>, reader: &mut dyn ValueReader) -> AccessResult {
        match self.ordinal(key)? {
            Some(ordinal) => self.ops.write(target, ordinal, reader, self.registry()),
            None => reader.skip(),
        }
    }

    #[inline]
    pub fn read_ordinal(&self, target: &T, ordinal: usize, writer: &mut dyn ValueWriter) -> AccessResult {
        self.ops.read(target, ordinal, writer, self.registry())
    }

    #[inline]
    pub fn write_ordinal(&self, target: &mut T, ordinal: usize, reader: &mut dyn ValueReader) -> AccessResult {
        self.ops.write(target, ordinal, reader, self.registry())
    }

    #[inline]
    pub fn read_all(&self, target: &T, writer: &mut dyn DataWriter, stop: &StopToken) -> AccessResult {
        self.ops.read_all(target, writer, stop, self.registry())
    }

    #[inline]
    pub fn write_all(&self, target: &mut T, reader: &mut dyn DataReader, stop: &StopToken) -> AccessResult {
        self.ops.write_all(target, reader, stop, self.registry())
    }
}
