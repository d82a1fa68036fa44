use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::type_name;
use core::mem;

use super::access::{InterfaceAccess, MemberAccess, MutGetter, Projected, RefGetter};
use super::access::{Sink, Source, ValueAccess};
use super::{Accessible, RwField};
use crate::error::AccessResult;
use crate::info::{MemberKind, TypeRef};
use crate::registry::Registry;
use crate::value::{AccessValue, ValueReader, ValueWriter};

// -----------------------------------------------------------------------------
// Internal parts

/// A factory producing fresh instances.
pub(crate) type Ctor<T> = Arc<dyn Fn() -> T + Send + Sync>;

pub(crate) struct Ctors<T> {
    pub constructor: Option<Ctor<T>>,
    pub allocator: Option<Ctor<T>>,
}

/// Kind of a custom accessor attached to a member.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CustomKind {
    Typed,
    Interface,
    Converting,
}

/// One declared member, as seen by Member Discovery.
pub(crate) struct MemberDecl<T> {
    pub name: &'static str,
    pub kind: MemberKind,
    pub value_type: TypeRef,
    pub read_public: bool,
    pub write_public: bool,
    pub is_static: bool,
    pub ignored: bool,
    pub directives: Vec<RwField>,
    pub primary: Option<Arc<dyn MemberAccess<T>>>,
    pub backing: Option<Arc<dyn MemberAccess<T>>>,
    pub custom: Option<(CustomKind, Arc<dyn MemberAccess<T>>)>,
}

impl<B: 'static> MemberDecl<B> {
    fn project<T: 'static>(self, get: &RefGetter<T, B>, get_mut: &MutGetter<T, B>) -> MemberDecl<T> {
        let project = |inner: Arc<dyn MemberAccess<B>>| -> Arc<dyn MemberAccess<T>> {
            Arc::new(Projected {
                inner,
                get: get.clone(),
                get_mut: get_mut.clone(),
            })
        };
        MemberDecl {
            name: self.name,
            kind: self.kind,
            value_type: self.value_type,
            read_public: self.read_public,
            write_public: self.write_public,
            is_static: self.is_static,
            ignored: self.ignored,
            directives: self.directives,
            primary: self.primary.map(project),
            backing: self.backing.map(project),
            custom: self.custom.map(|(kind, access)| (kind, project(access))),
        }
    }
}

/// The members declared by one type of an inheritance chain.
pub(crate) struct Level<T> {
    pub type_name: &'static str,
    pub members: Vec<MemberDecl<T>>,
}

/// A finished declaration.
///
/// `levels` run from the root base to the type itself.
pub(crate) struct DeclParts<T> {
    pub levels: Vec<Level<T>>,
    pub ctors: Ctors<T>,
    pub restricted: bool,
}

// -----------------------------------------------------------------------------
// Declaration

/// The member list of an [`Accessible`] type, filled by
/// [`Accessible::declare`].
///
/// Members are committed when the [`MemberBuilder`] returned by
/// [`field`](Self::field), [`property`](Self::property) or
/// [`ref_property`](Self::ref_property) is dropped, so builder calls can be
/// chained in a single statement.
pub struct Declaration<T: Accessible> {
    bases: Vec<Level<T>>,
    members: Vec<MemberDecl<T>>,
    constructor: Option<Ctor<T>>,
    allocator: Option<Ctor<T>>,
    restricted: bool,
}

impl<T: Accessible> Declaration<T> {
    pub(crate) fn of() -> DeclParts<T> {
        let mut decl = Self {
            bases: Vec::new(),
            members: Vec::new(),
            constructor: None,
            allocator: None,
            restricted: false,
        };
        T::declare(&mut decl);
        decl.into_parts()
    }

    fn into_parts(self) -> DeclParts<T> {
        let mut levels = self.bases;
        levels.push(Level {
            type_name: type_name::<T>(),
            members: self.members,
        });
        DeclParts {
            levels,
            ctors: Ctors {
                constructor: self.constructor,
                allocator: self.allocator,
            },
            restricted: self.restricted,
        }
    }

    /// Declares a public field.
    pub fn field<V: AccessValue>(
        &mut self,
        name: &'static str,
        get: impl Fn(&T) -> &V + Send + Sync + 'static,
        get_mut: impl Fn(&mut T) -> &mut V + Send + Sync + 'static,
    ) -> MemberBuilder<'_, T, V> {
        let mut builder = MemberBuilder::new(self, name, MemberKind::Field);
        builder.source = Some(Source::Borrowed(Arc::new(get)));
        builder.sink = Some(Sink::Borrowed(Arc::new(get_mut)));
        builder
    }

    /// Declares a public property.
    ///
    /// Attach accessors with [`MemberBuilder::getter`] and
    /// [`MemberBuilder::setter`]; a property without either is rejected when
    /// the schema is built.
    pub fn property<V: AccessValue>(&mut self, name: &'static str) -> MemberBuilder<'_, T, V> {
        MemberBuilder::new(self, name, MemberKind::Property)
    }

    /// Declares a property returning a reference.
    ///
    /// The reference getter serves both directions, so the property is
    /// writable whenever it is readable.
    pub fn ref_property<V: AccessValue>(
        &mut self,
        name: &'static str,
        get: impl Fn(&T) -> &V + Send + Sync + 'static,
        get_mut: impl Fn(&mut T) -> &mut V + Send + Sync + 'static,
    ) -> MemberBuilder<'_, T, V> {
        let mut builder = MemberBuilder::new(self, name, MemberKind::Property);
        builder.source = Some(Source::Borrowed(Arc::new(get)));
        builder.sink = Some(Sink::Borrowed(Arc::new(get_mut)));
        builder.by_ref = true;
        builder
    }

    /// Declares a parameterized property. Indexers are never serialized.
    pub fn indexer<V: 'static>(&mut self, name: &'static str) -> &mut Self {
        self.members.push(MemberDecl {
            name,
            kind: MemberKind::Indexer,
            value_type: TypeRef::of::<V>(),
            read_public: true,
            write_public: true,
            is_static: false,
            ignored: false,
            directives: Vec::new(),
            primary: None,
            backing: None,
            custom: None,
        });
        self
    }

    /// Inherits the members of `B`, reached through the given projections.
    ///
    /// Members of `T` take precedence over same-named members of `B`.
    pub fn inherit<B: Accessible>(
        &mut self,
        get: impl Fn(&T) -> &B + Send + Sync + 'static,
        get_mut: impl Fn(&mut T) -> &mut B + Send + Sync + 'static,
    ) -> &mut Self {
        if !self.bases.is_empty() {
            log::warn!(
                "`{}` inherits more than once, `{}` is treated as the most derived base",
                type_name::<T>(),
                type_name::<B>(),
            );
        }
        let get: RefGetter<T, B> = Arc::new(get);
        let get_mut: MutGetter<T, B> = Arc::new(get_mut);
        for level in Declaration::<B>::of().levels {
            self.bases.push(Level {
                type_name: level.type_name,
                members: level
                    .members
                    .into_iter()
                    .map(|member| member.project(&get, &get_mut))
                    .collect(),
            });
        }
        self
    }

    /// The constructor used by `initialize`.
    pub fn constructor(&mut self, f: impl Fn() -> T + Send + Sync + 'static) -> &mut Self {
        self.constructor = Some(Arc::new(f));
        self
    }

    /// The allocator used by `initialize` when `ALLOCATE` is set, or when no
    /// constructor exists.
    pub fn allocator(&mut self, f: impl Fn() -> T + Send + Sync + 'static) -> &mut Self {
        self.allocator = Some(Arc::new(f));
        self
    }

    /// Marks the type as unable to use compiled readers/writers.
    pub fn restricted(&mut self) -> &mut Self {
        self.restricted = true;
        self
    }
}

// -----------------------------------------------------------------------------
// MemberBuilder

/// Configures one member of a [`Declaration`].
///
/// The member is committed on drop.
pub struct MemberBuilder<'a, T: Accessible, V: AccessValue> {
    decl: &'a mut Declaration<T>,
    name: &'static str,
    kind: MemberKind,
    read_public: bool,
    write_public: bool,
    is_static: bool,
    ignored: bool,
    by_ref: bool,
    directives: Vec<RwField>,
    source: Option<Source<T, V>>,
    sink: Option<Sink<T, V>>,
    backing: Option<(RefGetter<T, V>, MutGetter<T, V>)>,
    custom: Option<(CustomKind, Arc<dyn MemberAccess<T>>)>,
}

impl<'a, T: Accessible, V: AccessValue> MemberBuilder<'a, T, V> {
    fn new(decl: &'a mut Declaration<T>, name: &'static str, kind: MemberKind) -> Self {
        Self {
            decl,
            name,
            kind,
            read_public: true,
            write_public: true,
            is_static: false,
            ignored: false,
            by_ref: false,
            directives: Vec::new(),
            source: None,
            sink: None,
            backing: None,
            custom: None,
        }
    }

    /// Makes both accessors non-public.
    #[inline]
    pub fn private(mut self) -> Self {
        self.read_public = false;
        self.write_public = false;
        self
    }

    #[inline]
    pub fn private_get(mut self) -> Self {
        self.read_public = false;
        self
    }

    #[inline]
    pub fn private_set(mut self) -> Self {
        self.write_public = false;
        self
    }

    /// Marks the member as static. Static members only participate through
    /// directives.
    #[inline]
    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Excludes the member, even when it carries directives.
    #[inline]
    pub fn ignore(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Adds an explicit serialization directive.
    #[inline]
    pub fn directive(mut self, directive: RwField) -> Self {
        self.directives.push(directive);
        self
    }

    #[inline]
    pub fn getter(mut self, get: impl Fn(&T) -> V + Send + Sync + 'static) -> Self {
        self.source = Some(Source::Owned(Arc::new(get)));
        self
    }

    #[inline]
    pub fn setter(mut self, set: impl Fn(&mut T, V) + Send + Sync + 'static) -> Self {
        self.sink = Some(Sink::Setter(Arc::new(set)));
        self
    }

    /// The storage behind a property, used when `BACKING_FIELDS` is set.
    pub fn backing_field(
        mut self,
        get: impl Fn(&T) -> &V + Send + Sync + 'static,
        get_mut: impl Fn(&mut T) -> &mut V + Send + Sync + 'static,
    ) -> Self {
        self.backing = Some((Arc::new(get), Arc::new(get_mut)));
        self
    }

    /// Replaces the member's accessors with a typed custom pair.
    pub fn custom<U: AccessValue>(
        mut self,
        read: impl Fn(&T) -> U + Send + Sync + 'static,
        write: impl Fn(&mut T, U) + Send + Sync + 'static,
    ) -> Self {
        let access = ValueAccess::<T, U> {
            source: Some(Source::Owned(Arc::new(read))),
            sink: Some(Sink::Setter(Arc::new(write))),
        };
        self.custom = Some((CustomKind::Typed, Arc::new(access)));
        self
    }

    /// Replaces the member's accessors with a pair that talks to sinks and
    /// sources directly.
    pub fn custom_interface(
        mut self,
        read: impl Fn(&T, &mut dyn ValueWriter, &'static Registry) -> AccessResult + Send + Sync + 'static,
        write: impl Fn(&mut T, &mut dyn ValueReader, &'static Registry) -> AccessResult + Send + Sync + 'static,
    ) -> Self {
        let access = InterfaceAccess::<T> {
            read: Some(Arc::new(read)),
            write: Some(Arc::new(write)),
        };
        self.custom = Some((CustomKind::Interface, Arc::new(access)));
        self
    }

    /// Exposes the member as `U`, converting on the way in and out.
    ///
    /// Wraps the accessors declared so far; call it after
    /// [`getter`](Self::getter) and [`setter`](Self::setter).
    pub fn convert<U: AccessValue>(
        mut self,
        into: impl Fn(&V) -> U + Send + Sync + 'static,
        from: impl Fn(U) -> V + Send + Sync + 'static,
    ) -> Self {
        let source = self.source.clone().map(|source| -> Source<T, U> {
            Source::Owned(Arc::new(move |target: &T| match &source {
                Source::Borrowed(get) => into(get(target)),
                Source::Owned(get) => into(&get(target)),
            }))
        });
        let sink = self.sink.clone().map(|sink| -> Sink<T, U> {
            Sink::Setter(Arc::new(move |target: &mut T, value: U| match &sink {
                Sink::Borrowed(get_mut) => *get_mut(target) = from(value),
                Sink::Setter(set) => set(target, from(value)),
            }))
        });
        let access = ValueAccess::<T, U> { source, sink };
        self.custom = Some((CustomKind::Converting, Arc::new(access)));
        self
    }
}

impl<T: Accessible, V: AccessValue> Drop for MemberBuilder<'_, T, V> {
    fn drop(&mut self) {
        let source = self.source.take();
        let sink = self.sink.take();
        let primary: Option<Arc<dyn MemberAccess<T>>> = if source.is_some() || sink.is_some() {
            Some(Arc::new(ValueAccess { source, sink }))
        } else {
            None
        };
        let backing = self.backing.take().map(|(get, get_mut)| -> Arc<dyn MemberAccess<T>> {
            Arc::new(ValueAccess::field(get, get_mut))
        });
        let write_public = if self.by_ref {
            self.read_public
        } else {
            self.write_public
        };
        self.decl.members.push(MemberDecl {
            name: self.name,
            kind: self.kind,
            value_type: TypeRef::of::<V>(),
            read_public: self.read_public,
            write_public,
            is_static: self.is_static,
            ignored: self.ignored,
            directives: mem::take(&mut self.directives),
            primary,
            backing,
            custom: self.custom.take(),
        });
    }
}
