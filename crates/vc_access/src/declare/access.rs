use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::error::{AccessError, AccessResult};
use crate::info::TypeRef;
use crate::plan::ValueRoute;
use crate::registry::Registry;
use crate::value::{AccessValue, DataWriter, Key, PrimitiveKind, ValueReader, ValueWriter};
use crate::value::{read_dispatch, write_dispatch};

// -----------------------------------------------------------------------------
// Closure types

pub(crate) type RefGetter<T, V> = Arc<dyn Fn(&T) -> &V + Send + Sync>;
pub(crate) type MutGetter<T, V> = Arc<dyn Fn(&mut T) -> &mut V + Send + Sync>;
pub(crate) type Getter<T, V> = Arc<dyn Fn(&T) -> V + Send + Sync>;
pub(crate) type Setter<T, V> = Arc<dyn Fn(&mut T, V) + Send + Sync>;

pub(crate) type InterfaceRead<T> =
    Arc<dyn Fn(&T, &mut dyn ValueWriter, &'static Registry) -> AccessResult + Send + Sync>;
pub(crate) type InterfaceWrite<T> =
    Arc<dyn Fn(&mut T, &mut dyn ValueReader, &'static Registry) -> AccessResult + Send + Sync>;

pub(crate) type ReadFn<T> =
    Box<dyn Fn(&T, &mut dyn ValueWriter, &'static Registry) -> AccessResult + Send + Sync>;
pub(crate) type ReadEntryFn<T> = Box<
    dyn Fn(&T, &mut dyn DataWriter, Key<'_>, &'static Registry) -> AccessResult + Send + Sync,
>;
pub(crate) type WriteFn<T> =
    Box<dyn Fn(&mut T, &mut dyn ValueReader, &'static Registry) -> AccessResult + Send + Sync>;

type WriteValue<V> = fn(&V, &mut dyn ValueWriter, &'static Registry) -> AccessResult;
type ReadValue<V> = fn(&mut dyn ValueReader, &'static Registry) -> AccessResult<V>;

/// Picks the value interface calls for a route.
fn write_fn<V: AccessValue>(route: ValueRoute) -> WriteValue<V> {
    match route {
        ValueRoute::Direct(_) => V::write_value,
        ValueRoute::Interface => write_dispatch::<V>,
    }
}

fn read_fn<V: AccessValue>(route: ValueRoute) -> ReadValue<V> {
    match route {
        ValueRoute::Direct(_) => V::read_value,
        ValueRoute::Interface => read_dispatch::<V>,
    }
}

// -----------------------------------------------------------------------------
// CompiledMember

/// Specialized closures of one member, with the value route baked in.
///
/// `None` means the accessor lacks that direction.
pub(crate) struct CompiledMember<T> {
    pub read: Option<ReadFn<T>>,
    pub read_entry: Option<ReadEntryFn<T>>,
    pub write: Option<WriteFn<T>>,
}

impl<T> CompiledMember<T> {
    #[inline]
    const fn empty() -> Self {
        Self {
            read: None,
            read_entry: None,
            write: None,
        }
    }
}

// -----------------------------------------------------------------------------
// MemberAccess

/// Type-erased access to one member of `T`.
///
/// The `read`, `read_entry` and `write` calls are the interpretive path: they
/// pick the value interface call from the planned route on every call.
/// `compile` produces the specialized closures used by compiled
/// readers/writers.
pub(crate) trait MemberAccess<T>: Send + Sync {
    /// The type handed to sinks and taken from sources.
    fn exposed_type(&self) -> TypeRef;

    fn primitive(&self) -> Option<PrimitiveKind>;

    fn can_read(&self) -> bool;

    fn can_write(&self) -> bool;

    fn read(
        &self,
        target: &T,
        writer: &mut dyn ValueWriter,
        route: ValueRoute,
        registry: &'static Registry,
    ) -> AccessResult;

    fn read_entry(
        &self,
        target: &T,
        data: &mut dyn DataWriter,
        key: Key<'_>,
        route: ValueRoute,
        skip_default: bool,
        registry: &'static Registry,
    ) -> AccessResult;

    fn write(
        &self,
        target: &mut T,
        reader: &mut dyn ValueReader,
        route: ValueRoute,
        registry: &'static Registry,
    ) -> AccessResult;

    fn compile(&self, route: ValueRoute, skip_default: bool) -> CompiledMember<T>;
}

// -----------------------------------------------------------------------------
// ValueAccess

/// Where a member value is read from.
pub(crate) enum Source<T, V> {
    Borrowed(RefGetter<T, V>),
    Owned(Getter<T, V>),
}

impl<T, V> Clone for Source<T, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Borrowed(get) => Self::Borrowed(get.clone()),
            Self::Owned(get) => Self::Owned(get.clone()),
        }
    }
}

impl<T, V> Source<T, V> {
    #[inline]
    fn with<R>(&self, target: &T, f: impl FnOnce(&V) -> R) -> R {
        match self {
            Self::Borrowed(get) => f(get(target)),
            Self::Owned(get) => f(&get(target)),
        }
    }
}

/// Where a member value is stored to.
pub(crate) enum Sink<T, V> {
    Borrowed(MutGetter<T, V>),
    Setter(Setter<T, V>),
}

impl<T, V> Clone for Sink<T, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Borrowed(get) => Self::Borrowed(get.clone()),
            Self::Setter(set) => Self::Setter(set.clone()),
        }
    }
}

impl<T, V> Sink<T, V> {
    #[inline]
    fn store(&self, target: &mut T, value: V) {
        match self {
            Self::Borrowed(get) => *get(target) = value,
            Self::Setter(set) => set(target, value),
        }
    }
}

/// Typed access through a source and a sink.
///
/// Covers fields, backing fields, getter/setter properties, custom typed
/// accessors and converting accessors.
pub(crate) struct ValueAccess<T, V> {
    pub source: Option<Source<T, V>>,
    pub sink: Option<Sink<T, V>>,
}

impl<T: 'static, V: AccessValue> ValueAccess<T, V> {
    pub fn field(get: RefGetter<T, V>, get_mut: MutGetter<T, V>) -> Self {
        Self {
            source: Some(Source::Borrowed(get)),
            sink: Some(Sink::Borrowed(get_mut)),
        }
    }

    fn compile_read(source: Source<T, V>, write_value: WriteValue<V>) -> ReadFn<T> {
        match source {
            Source::Borrowed(get) => Box::new(
                move |target: &T, writer: &mut dyn ValueWriter, registry: &'static Registry| {
                    write_value(get(target), writer, registry)
                },
            ),
            Source::Owned(get) => Box::new(
                move |target: &T, writer: &mut dyn ValueWriter, registry: &'static Registry| {
                    write_value(&get(target), writer, registry)
                },
            ),
        }
    }

    fn compile_read_entry(
        source: Source<T, V>,
        write_value: WriteValue<V>,
        skip_default: bool,
    ) -> ReadEntryFn<T> {
        match (source, skip_default) {
            (Source::Borrowed(get), false) => Box::new(
                move |target: &T, data: &mut dyn DataWriter, key: Key<'_>, registry: &'static Registry| {
                    write_value(get(target), data.entry(key)?, registry)
                },
            ),
            (Source::Borrowed(get), true) => Box::new(
                move |target: &T, data: &mut dyn DataWriter, key: Key<'_>, registry: &'static Registry| {
                    let value = get(target);
                    if value.is_default_value() {
                        return Ok(());
                    }
                    write_value(value, data.entry(key)?, registry)
                },
            ),
            (Source::Owned(get), false) => Box::new(
                move |target: &T, data: &mut dyn DataWriter, key: Key<'_>, registry: &'static Registry| {
                    write_value(&get(target), data.entry(key)?, registry)
                },
            ),
            // The getter runs once; its result is checked and written.
            (Source::Owned(get), true) => Box::new(
                move |target: &T, data: &mut dyn DataWriter, key: Key<'_>, registry: &'static Registry| {
                    let value = get(target);
                    if value.is_default_value() {
                        return Ok(());
                    }
                    write_value(&value, data.entry(key)?, registry)
                },
            ),
        }
    }

    fn compile_write(sink: Sink<T, V>, read_value: ReadValue<V>) -> WriteFn<T> {
        match sink {
            Sink::Borrowed(get_mut) => Box::new(
                move |target: &mut T, reader: &mut dyn ValueReader, registry: &'static Registry| {
                    *get_mut(target) = read_value(reader, registry)?;
                    Ok(())
                },
            ),
            Sink::Setter(set) => Box::new(
                move |target: &mut T, reader: &mut dyn ValueReader, registry: &'static Registry| {
                    set(target, read_value(reader, registry)?);
                    Ok(())
                },
            ),
        }
    }
}

impl<T: 'static, V: AccessValue> MemberAccess<T> for ValueAccess<T, V> {
    #[inline]
    fn exposed_type(&self) -> TypeRef {
        TypeRef::of::<V>()
    }

    #[inline]
    fn primitive(&self) -> Option<PrimitiveKind> {
        V::PRIMITIVE
    }

    #[inline]
    fn can_read(&self) -> bool {
        self.source.is_some()
    }

    #[inline]
    fn can_write(&self) -> bool {
        self.sink.is_some()
    }

    fn read(
        &self,
        target: &T,
        writer: &mut dyn ValueWriter,
        route: ValueRoute,
        registry: &'static Registry,
    ) -> AccessResult {
        let write_value = write_fn::<V>(route);
        match &self.source {
            Some(source) => source.with(target, |value| write_value(value, writer, registry)),
            None => Err(AccessError::Unsupported("reading a member without a getter")),
        }
    }

    fn read_entry(
        &self,
        target: &T,
        data: &mut dyn DataWriter,
        key: Key<'_>,
        route: ValueRoute,
        skip_default: bool,
        registry: &'static Registry,
    ) -> AccessResult {
        let Some(source) = &self.source else {
            return Err(AccessError::Unsupported("reading a member without a getter"));
        };
        let write_value = write_fn::<V>(route);
        source.with(target, |value| {
            if skip_default && value.is_default_value() {
                return Ok(());
            }
            write_value(value, data.entry(key)?, registry)
        })
    }

    fn write(
        &self,
        target: &mut T,
        reader: &mut dyn ValueReader,
        route: ValueRoute,
        registry: &'static Registry,
    ) -> AccessResult {
        match &self.sink {
            Some(sink) => {
                sink.store(target, read_fn::<V>(route)(reader, registry)?);
                Ok(())
            }
            None => Err(AccessError::Unsupported("writing a member without a setter")),
        }
    }

    fn compile(&self, route: ValueRoute, skip_default: bool) -> CompiledMember<T> {
        let write_value = write_fn::<V>(route);
        let read_value = read_fn::<V>(route);
        CompiledMember {
            read: self
                .source
                .clone()
                .map(|source| Self::compile_read(source, write_value)),
            read_entry: self
                .source
                .clone()
                .map(|source| Self::compile_read_entry(source, write_value, skip_default)),
            write: self
                .sink
                .clone()
                .map(|sink| Self::compile_write(sink, read_value)),
        }
    }
}

// -----------------------------------------------------------------------------
// InterfaceAccess

/// Access through a pair that talks to sinks and sources directly.
pub(crate) struct InterfaceAccess<T> {
    pub read: Option<InterfaceRead<T>>,
    pub write: Option<InterfaceWrite<T>>,
}

impl<T: 'static> MemberAccess<T> for InterfaceAccess<T> {
    #[inline]
    fn exposed_type(&self) -> TypeRef {
        TypeRef::of::<dyn ValueWriter>()
    }

    #[inline]
    fn primitive(&self) -> Option<PrimitiveKind> {
        None
    }

    #[inline]
    fn can_read(&self) -> bool {
        self.read.is_some()
    }

    #[inline]
    fn can_write(&self) -> bool {
        self.write.is_some()
    }

    fn read(&self, target: &T, writer: &mut dyn ValueWriter, _: ValueRoute, registry: &'static Registry) -> AccessResult {
        match &self.read {
            Some(read) => read(target, writer, registry),
            None => Err(AccessError::Unsupported("reading a member without a getter")),
        }
    }

    fn read_entry(
        &self,
        target: &T,
        data: &mut dyn DataWriter,
        key: Key<'_>,
        _: ValueRoute,
        _: bool,
        registry: &'static Registry,
    ) -> AccessResult {
        match &self.read {
            Some(read) => read(target, data.entry(key)?, registry),
            None => Err(AccessError::Unsupported("reading a member without a getter")),
        }
    }

    fn write(
        &self,
        target: &mut T,
        reader: &mut dyn ValueReader,
        _: ValueRoute,
        registry: &'static Registry,
    ) -> AccessResult {
        match &self.write {
            Some(write) => write(target, reader, registry),
            None => Err(AccessError::Unsupported("writing a member without a setter")),
        }
    }

    fn compile(&self, _: ValueRoute, _: bool) -> CompiledMember<T> {
        let mut compiled = CompiledMember::empty();
        if let Some(read) = &self.read {
            let entry = read.clone();
            let read = read.clone();
            compiled.read = Some(Box::new(
                move |target: &T, writer: &mut dyn ValueWriter, registry: &'static Registry| {
                    read(target, writer, registry)
                },
            ));
            compiled.read_entry = Some(Box::new(
                move |target: &T, data: &mut dyn DataWriter, key: Key<'_>, registry: &'static Registry| {
                    entry(target, data.entry(key)?, registry)
                },
            ));
        }
        if let Some(write) = &self.write {
            let write = write.clone();
            compiled.write = Some(Box::new(
                move |target: &mut T, reader: &mut dyn ValueReader, registry: &'static Registry| {
                    write(target, reader, registry)
                },
            ));
        }
        compiled
    }
}

// -----------------------------------------------------------------------------
// Projected

/// A member of the base `B`, reached from `T` through a projection.
pub(crate) struct Projected<T, B> {
    pub inner: Arc<dyn MemberAccess<B>>,
    pub get: RefGetter<T, B>,
    pub get_mut: MutGetter<T, B>,
}

impl<T: 'static, B: 'static> MemberAccess<T> for Projected<T, B> {
    #[inline]
    fn exposed_type(&self) -> TypeRef {
        self.inner.exposed_type()
    }

    #[inline]
    fn primitive(&self) -> Option<PrimitiveKind> {
        self.inner.primitive()
    }

    #[inline]
    fn can_read(&self) -> bool {
        self.inner.can_read()
    }

    #[inline]
    fn can_write(&self) -> bool {
        self.inner.can_write()
    }

    fn read(
        &self,
        target: &T,
        writer: &mut dyn ValueWriter,
        route: ValueRoute,
        registry: &'static Registry,
    ) -> AccessResult {
        self.inner.read((self.get)(target), writer, route, registry)
    }

    fn read_entry(
        &self,
        target: &T,
        data: &mut dyn DataWriter,
        key: Key<'_>,
        route: ValueRoute,
        skip_default: bool,
        registry: &'static Registry,
    ) -> AccessResult {
        self.inner
            .read_entry((self.get)(target), data, key, route, skip_default, registry)
    }

    fn write(
        &self,
        target: &mut T,
        reader: &mut dyn ValueReader,
        route: ValueRoute,
        registry: &'static Registry,
    ) -> AccessResult {
        self.inner.write((self.get_mut)(target), reader, route, registry)
    }

    fn compile(&self, route: ValueRoute, skip_default: bool) -> CompiledMember<T> {
        let inner = self.inner.compile(route, skip_default);
        CompiledMember {
            read: inner.read.map(|read| -> ReadFn<T> {
                let get = self.get.clone();
                Box::new(
                    move |target: &T, writer: &mut dyn ValueWriter, registry: &'static Registry| {
                        read(get(target), writer, registry)
                    },
                )
            }),
            read_entry: inner.read_entry.map(|read_entry| -> ReadEntryFn<T> {
                let get = self.get.clone();
                Box::new(
                    move |target: &T, data: &mut dyn DataWriter, key: Key<'_>, registry: &'static Registry| {
                        read_entry(get(target), data, key, registry)
                    },
                )
            }),
            write: inner.write.map(|write| -> WriteFn<T> {
                let get_mut = self.get_mut.clone();
                Box::new(
                    move |target: &mut T, reader: &mut dyn ValueReader, registry: &'static Registry| {
                        write(get_mut(target), reader, registry)
                    },
                )
            }),
        }
    }
}
