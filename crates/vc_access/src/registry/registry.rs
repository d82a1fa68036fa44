use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{TypeId, type_name};
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use parking_lot::{Mutex, RwLock};

use super::interfaces::Interfaces;
use crate::declare::{Accessible, Declaration};
use crate::discovery::discover;
use crate::emit::{Emitted, emit};
use crate::error::{AccessError, AccessResult};
use crate::info::{KeyTable, Options, TypeRef, TypeSchema};
use crate::plan::plan_members;
use crate::rw::{ObjectRef, ObjectRw, read_object, with_instance};
use crate::utils::TypeIdMap;
use crate::value::{AccessValue, StopToken, Value, ValueInterface, ValueObject};

// -----------------------------------------------------------------------------
// RegistryConfig

/// Construction-time settings of a [`Registry`].
///
/// # Examples
///
/// ```
/// use vc_access::{Options, RegistryConfig};
///
/// let config = RegistryConfig::default()
///     .with_options(Options::default() | Options::IGNORE_CASE)
///     .reflective();
///
/// assert!(config.default_options().contains(Options::IGNORE_CASE));
/// assert!(!config.is_compiled());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    default_options: Options,
    compiled: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_options: Options::default(),
            compiled: cfg!(feature = "emit"),
        }
    }
}

impl RegistryConfig {
    /// Options of types that declare none and have none set.
    #[inline]
    pub const fn with_options(mut self, options: Options) -> Self {
        self.default_options = options;
        self
    }

    /// Serves every type through the reflective path.
    #[inline]
    pub const fn reflective(mut self) -> Self {
        self.compiled = false;
        self
    }

    #[inline]
    pub const fn default_options(&self) -> Options {
        self.default_options
    }

    /// Whether compiled readers/writers are emitted.
    ///
    /// Always `false` without the `emit` feature.
    #[inline]
    pub const fn is_compiled(&self) -> bool {
        self.compiled && cfg!(feature = "emit")
    }
}

// -----------------------------------------------------------------------------
// Registry

struct OptionsEntry {
    options: Options,
    frozen: bool,
}

/// Builds and caches type schemas.
///
/// Each type is built at most once per registry, whatever the number of
/// threads asking for it. Options of a type are frozen as soon as its
/// schema starts building.
///
/// # Examples
///
/// ```
/// use vc_access::{AccessError, Accessible, Options, Registry, RegistryConfig};
///
/// #[derive(Accessible, Default)]
/// #[access(default)]
/// pub struct User {
///     pub name: String,
/// }
///
/// let registry = Registry::new(RegistryConfig::default()).leak();
/// registry.set_options::<User>(Options::default() | Options::IGNORE_CASE).unwrap();
///
/// let schema = registry.schema::<User>().unwrap();
/// assert_eq!(schema.ordinal_of("NAME".into()), Some(0));
///
/// // Options are frozen once the schema exists.
/// let err = registry.set_options::<User>(Options::default()).unwrap_err();
/// assert!(matches!(err, AccessError::AlreadyInitialized(_)));
/// ```
pub struct Registry {
    config: RegistryConfig,
    schemas: RwLock<TypeIdMap<&'static TypeSchema>>,
    options: RwLock<TypeIdMap<OptionsEntry>>,
    build_lock: Mutex<()>,
    interfaces: Interfaces,
    builds: AtomicUsize,
}

impl Default for Registry {
    #[inline]
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("schemas", &self.schemas.read().len())
            .finish_non_exhaustive()
    }
}

impl Registry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            schemas: RwLock::new(TypeIdMap::new()),
            options: RwLock::new(TypeIdMap::new()),
            build_lock: Mutex::new(()),
            interfaces: Interfaces::new(),
            builds: AtomicUsize::new(0),
        }
    }

    /// The process-wide registry, with the default configuration.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::default)
    }

    /// Leaks the registry so schemas can borrow it for `'static`.
    #[inline]
    pub fn leak(self) -> &'static Registry {
        Box::leak(Box::new(self))
    }

    #[inline]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// How many schemas this registry has built.
    #[inline]
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    // -------------------------------------------------------------------------
    // Options

    fn default_options<T: Accessible>(&self) -> Options {
        T::OPTIONS.unwrap_or(self.config.default_options)
    }

    /// The effective options of `T`: the value set on this registry, else
    /// `T::OPTIONS`, else the registry default.
    pub fn options<T: Accessible>(&self) -> Options {
        match self.options.read().get_type::<T>() {
            Some(entry) => entry.options,
            None => self.default_options::<T>(),
        }
    }

    /// Replaces the options of `T`.
    ///
    /// Fails with [`AccessError::AlreadyInitialized`] once the schema of `T`
    /// has been built by this registry.
    #[inline]
    pub fn set_options<T: Accessible>(&self, options: Options) -> AccessResult {
        self.update_options::<T>(|_| options)
    }

    /// Updates the options of `T` in place.
    pub fn update_options<T: Accessible>(&self, f: impl FnOnce(Options) -> Options) -> AccessResult {
        let default = self.default_options::<T>();
        let mut table = self.options.write();
        let entry = table.get_or_insert_type::<T>(|| OptionsEntry {
            options: default,
            frozen: false,
        });
        if entry.frozen {
            return Err(AccessError::AlreadyInitialized(type_name::<T>()));
        }
        entry.options = f(entry.options);
        Ok(())
    }

    fn freeze_options<T: Accessible>(&self, frozen: bool) -> Options {
        let default = self.default_options::<T>();
        let mut table = self.options.write();
        let entry = table.get_or_insert_type::<T>(|| OptionsEntry {
            options: default,
            frozen,
        });
        entry.frozen = frozen;
        entry.options
    }

    // -------------------------------------------------------------------------
    // Schemas

    /// Whether the schema of `T` has been built by this registry.
    #[inline]
    pub fn is_initialized<T: Accessible>(&self) -> bool {
        self.schemas.read().contains_type::<T>()
    }

    /// The schema of `T`, built on first use.
    ///
    /// Configuration errors are returned without caching anything, so a
    /// later call runs discovery again.
    pub fn schema<T: Accessible>(&'static self) -> AccessResult<&'static TypeSchema> {
        if let Some(schema) = self.schemas.read().get_type::<T>().copied() {
            return Ok(schema);
        }

        let _guard = self.build_lock.lock();
        if let Some(schema) = self.schemas.read().get_type::<T>().copied() {
            return Ok(schema);
        }

        let options = self.freeze_options::<T>(true);
        let schema = match self.build::<T>(options) {
            Ok(schema) => schema,
            Err(error) => {
                self.freeze_options::<T>(false);
                log::warn!("cannot build the schema of `{}`: {error}", type_name::<T>());
                return Err(error);
            }
        };

        let schema: &'static TypeSchema = Box::leak(Box::new(schema));
        self.schemas.write().insert_type::<T>(schema);
        self.builds.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "built the schema of `{}`: {} members, {:?}",
            schema.type_name(),
            schema.len(),
            schema.mode(),
        );
        Ok(schema)
    }

    fn build<T: Accessible>(&'static self, options: Options) -> AccessResult<TypeSchema> {
        let ty = TypeRef::of::<T>();
        let parts = Declaration::<T>::of();

        let candidates = discover(ty.name(), parts.levels, options)?;
        let members = plan_members(candidates, options, self);
        let keys = KeyTable::build(members.iter().map(|member| member.descriptor.serialized_name()));

        let compiled = self.config.is_compiled() && !parts.restricted;
        if self.config.is_compiled() && parts.restricted {
            log::warn!("`{}` is restricted, using the reflective reader/writer", ty.name());
        }

        let Emitted {
            lookup,
            mode,
            factory,
        } = emit(ty.name(), &members, &keys, options, compiled, parts.ctors);

        let (descriptors, plans): (Vec<_>, Vec<_>) = members
            .into_iter()
            .map(|member| (member.descriptor, member.plan))
            .unzip();

        Ok(TypeSchema {
            ty,
            options,
            members: descriptors.into_boxed_slice(),
            plans: plans.into_boxed_slice(),
            keys,
            lookup,
            mode,
            registry: self,
            factory: Box::new(factory),
        })
    }

    // -------------------------------------------------------------------------
    // Value interfaces

    /// Replaces the value interface of `T` for every schema built afterwards.
    ///
    /// Members of type `T` in schemas built before the call keep the route
    /// they were planned with.
    pub fn set_interface<T: AccessValue>(&self, interface: impl ValueInterface<T>) {
        self.interfaces.set::<T>(Arc::new(interface));
    }

    /// Whether the value interface of `T` is overridden.
    #[inline]
    pub fn has_interface<T: AccessValue>(&self) -> bool {
        self.interfaces.contains(TypeId::of::<T>())
    }

    #[inline]
    pub(crate) fn interface<T: AccessValue>(&self) -> Option<Arc<dyn ValueInterface<T>>> {
        self.interfaces.get::<T>()
    }

    #[inline]
    pub(crate) fn has_interface_id(&self, type_id: TypeId) -> bool {
        self.interfaces.contains(type_id)
    }

    // -------------------------------------------------------------------------
    // Instances

    /// A fresh, unbound reader/writer of `T`.
    #[inline]
    pub fn create<T: Accessible>(&'static self) -> AccessResult<ObjectRw<T>> {
        ObjectRw::new_in(self)
    }

    /// Runs `f` with a pooled reader/writer of `T`.
    ///
    /// The instance is unbound when handed out and cleared when `f` returns.
    #[inline]
    pub fn with_instance<T: Accessible, R>(
        &'static self,
        f: impl FnOnce(&mut ObjectRw<T>) -> AccessResult<R>,
    ) -> AccessResult<R> {
        with_instance(self, f)
    }

    /// Reads every readable member of `value` into a dynamic object.
    pub fn to_value<T: Accessible>(&'static self, value: &T) -> AccessResult<Value> {
        let mut object = ValueObject::new();
        ObjectRef::new_in(self, value)?.read_all(&mut object, &StopToken::none())?;
        Ok(Value::Object(object))
    }

    /// Builds a `T` from a dynamic object.
    pub fn from_value<T: Accessible>(&'static self, value: &Value) -> AccessResult<T> {
        let mut source = value.clone();
        read_object::<T>(&mut source, self)
    }
}
