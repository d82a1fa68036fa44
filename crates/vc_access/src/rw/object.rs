use core::any::type_name;
use core::fmt;

use super::binding::Binding;
use crate::declare::Accessible;
use crate::error::{AccessError, AccessResult};
use crate::info::TypeSchema;
use crate::registry::Registry;
use crate::value::{DataReader, DataSource, DataWriter, Key, Primitive, StopToken, Value};
use crate::value::{ValueReader, ValueWriter};

// -----------------------------------------------------------------------------
// Slot

/// The current object and the member a keyed write targets.
///
/// Values written to the slot are stored into the pending member; without
/// one, they are dropped.
struct Slot<T: 'static> {
    binding: Binding<T>,
    content: Option<T>,
    pending: Option<usize>,
}

impl<T: Accessible> Slot<T> {
    fn store(&mut self, source: &mut dyn ValueReader) -> AccessResult {
        let Some(ordinal) = self.pending.take() else {
            return source.skip();
        };
        let content = self
            .content
            .as_mut()
            .ok_or(AccessError::Unbound(type_name::<T>()))?;
        self.binding.write_ordinal(content, ordinal, source)
    }
}

impl<T: Accessible> ValueWriter for Slot<T> {
    fn write_null(&mut self) -> AccessResult {
        self.store(&mut Value::Null)
    }

    fn write_primitive(&mut self, value: Primitive<'_>) -> AccessResult {
        self.store(&mut Value::from(value))
    }

    fn write_object(&mut self, reader: &mut dyn DataReader) -> AccessResult {
        self.store(&mut DataSource::object(reader))
    }

    fn write_array(&mut self, reader: &mut dyn DataReader) -> AccessResult {
        self.store(&mut DataSource::array(reader))
    }

    fn write_direct(&mut self, value: &Value) -> AccessResult {
        self.store(&mut value.clone())
    }
}

// -----------------------------------------------------------------------------
// ObjectRw

/// Reads and writes the members of an owned `T` by key.
///
/// Unknown keys follow the `NOT_FOUND_ERROR` option: an error, or a null
/// read and an ignored write. Members that exist but cannot be accessed
/// follow `CANNOT_READ_ERROR` and `CANNOT_WRITE_ERROR` the same way.
///
/// # Examples
///
/// ```
/// use vc_access::{Accessible, Key, ObjectRw, Value};
///
/// #[derive(Accessible, Default)]
/// #[access(default)]
/// pub struct Account {
///     pub id: u64,
///     pub owner: String,
/// }
///
/// let mut rw = ObjectRw::<Account>::new().unwrap();
/// rw.initialize().unwrap();
///
/// rw.write_value("owner".into(), &mut Value::from("ada")).unwrap();
/// rw.write_value(Key::Ordinal(0), &mut Value::UInt(7)).unwrap();
///
/// let account = rw.content().unwrap();
/// assert_eq!((account.id, account.owner.as_str()), (7, "ada"));
///
/// // Unknown keys read as null.
/// let mut out = Value::Bool(true);
/// rw.read_value("missing".into(), &mut out).unwrap();
/// assert!(out.is_null());
/// ```
pub struct ObjectRw<T: Accessible> {
    slot: Slot<T>,
    scratch: Value,
}

impl<T: Accessible> ObjectRw<T> {
    /// An unbound reader/writer using the global registry.
    #[inline]
    pub fn new() -> AccessResult<Self> {
        Self::new_in(Registry::global())
    }

    /// An unbound reader/writer using `registry`.
    ///
    /// Fails with [`AccessError::Construction`] when the reader/writer of
    /// `T` could not be emitted.
    pub fn new_in(registry: &'static Registry) -> AccessResult<Self> {
        Ok(Self {
            slot: Slot {
                binding: Binding::resolve(registry)?,
                content: None,
                pending: None,
            },
            scratch: Value::Null,
        })
    }

    /// A reader/writer bound to `content`, using the global registry.
    #[inline]
    pub fn with_content(content: T) -> AccessResult<Self> {
        let mut rw = Self::new()?;
        rw.slot.content = Some(content);
        Ok(rw)
    }

    #[inline]
    pub fn schema(&self) -> &'static TypeSchema {
        self.slot.binding.schema
    }

    /// Replaces the current object with a new one.
    pub fn initialize(&mut self) -> AccessResult {
        self.slot.content = Some(self.slot.binding.construct()?);
        Ok(())
    }

    #[inline]
    pub fn initialize_with(&mut self, content: T) {
        self.slot.content = Some(content);
    }

    #[inline]
    pub fn content(&self) -> Option<&T> {
        self.slot.content.as_ref()
    }

    #[inline]
    pub fn content_mut(&mut self) -> Option<&mut T> {
        self.slot.content.as_mut()
    }

    #[inline]
    pub fn take_content(&mut self) -> Option<T> {
        self.slot.content.take()
    }

    #[inline]
    pub fn into_content(self) -> Option<T> {
        self.slot.content
    }

    /// Unbinds the current object.
    #[inline]
    pub fn clear(&mut self) {
        self.slot.content = None;
        self.slot.pending = None;
        self.scratch = Value::Null;
    }

    /// The ordinal of `key`, applying the not-found policy.
    #[inline]
    pub fn get_ordinal(&self, key: Key<'_>) -> AccessResult<Option<usize>> {
        self.slot.binding.ordinal(key)
    }

    fn target(&self) -> AccessResult<&T> {
        self.slot
            .content
            .as_ref()
            .ok_or(AccessError::Unbound(type_name::<T>()))
    }

    /// Reads one member into `writer`.
    pub fn read_value(&self, key: Key<'_>, writer: &mut dyn ValueWriter) -> AccessResult {
        self.slot.binding.read_value(self.target()?, key, writer)
    }

    /// Writes one member from `reader`.
    pub fn write_value(&mut self, key: Key<'_>, reader: &mut dyn ValueReader) -> AccessResult {
        let binding = self.slot.binding;
        let target = self
            .slot
            .content
            .as_mut()
            .ok_or(AccessError::Unbound(type_name::<T>()))?;
        binding.write_value(target, key, reader)
    }

    /// Reads every readable member in ordinal order.
    ///
    /// When `stop` is requested during a member, returns after that member;
    /// calling again with the same token resumes with the next one.
    pub fn read_all(&self, writer: &mut dyn DataWriter, stop: &StopToken) -> AccessResult {
        self.slot.binding.read_all(self.target()?, writer, stop)
    }

    /// Writes every writable member `reader` has an entry for.
    ///
    /// Members without an entry keep their value. Stops and resumes like
    /// [`read_all`](Self::read_all).
    pub fn write_all(&mut self, reader: &mut dyn DataReader, stop: &StopToken) -> AccessResult {
        let binding = self.slot.binding;
        let target = self
            .slot
            .content
            .as_mut()
            .ok_or(AccessError::Unbound(type_name::<T>()))?;
        binding.write_all(target, reader, stop)
    }
}

impl<T: Accessible + fmt::Debug> fmt::Debug for ObjectRw<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRw")
            .field("type", &self.schema().type_name())
            .field("content", &self.slot.content)
            .finish()
    }
}

impl<T: Accessible> DataReader for ObjectRw<T> {
    #[inline]
    fn len(&self) -> usize {
        self.schema().len()
    }

    fn entry(&mut self, key: Key<'_>) -> AccessResult<Option<&mut dyn ValueReader>> {
        let binding = self.slot.binding;
        let Some(ordinal) = binding.ordinal(key)? else {
            return Ok(None);
        };
        let target = self
            .slot
            .content
            .as_ref()
            .ok_or(AccessError::Unbound(type_name::<T>()))?;
        self.scratch = Value::Null;
        binding.read_ordinal(target, ordinal, &mut self.scratch)?;
        Ok(Some(&mut self.scratch))
    }

    #[inline]
    fn read_value(&mut self, key: Key<'_>, writer: &mut dyn ValueWriter) -> AccessResult {
        Self::read_value(self, key, writer)
    }

    #[inline]
    fn read_all(&mut self, writer: &mut dyn DataWriter, stop: &StopToken) -> AccessResult {
        Self::read_all(self, writer, stop)
    }
}

impl<T: Accessible> DataWriter for ObjectRw<T> {
    #[inline]
    fn initialize(&mut self, _: Option<usize>) -> AccessResult {
        Self::initialize(self)
    }

    fn entry(&mut self, key: Key<'_>) -> AccessResult<&mut dyn ValueWriter> {
        if self.slot.content.is_none() {
            return Err(AccessError::Unbound(type_name::<T>()));
        }
        self.slot.pending = self.slot.binding.ordinal(key)?;
        Ok(&mut self.slot)
    }

    #[inline]
    fn write_value(&mut self, key: Key<'_>, reader: &mut dyn ValueReader) -> AccessResult {
        Self::write_value(self, key, reader)
    }

    #[inline]
    fn write_all(&mut self, reader: &mut dyn DataReader, stop: &StopToken) -> AccessResult {
        Self::write_all(self, reader, stop)
    }
}

// -----------------------------------------------------------------------------
// ObjectRef

/// Reads the members of a borrowed `T` by key.
///
/// # Examples
///
/// ```
/// use vc_access::{Accessible, ObjectRef, StopToken};
/// use vc_access::value::ValueObject;
///
/// #[derive(Accessible)]
/// pub struct Pair {
///     pub left: i32,
///     pub right: i32,
/// }
///
/// let pair = Pair { left: 1, right: 2 };
/// let mut object = ValueObject::new();
/// ObjectRef::new(&pair).unwrap().read_all(&mut object, &StopToken::none()).unwrap();
///
/// assert_eq!(object.keys().collect::<Vec<_>>(), ["left", "right"]);
/// ```
pub struct ObjectRef<'a, T: Accessible> {
    binding: Binding<T>,
    target: &'a T,
    scratch: Value,
}

impl<'a, T: Accessible> ObjectRef<'a, T> {
    /// A reader over `target`, using the global registry.
    #[inline]
    pub fn new(target: &'a T) -> AccessResult<Self> {
        Self::new_in(Registry::global(), target)
    }

    pub fn new_in(registry: &'static Registry, target: &'a T) -> AccessResult<Self> {
        Ok(Self {
            binding: Binding::resolve(registry)?,
            target,
            scratch: Value::Null,
        })
    }

    #[inline]
    pub fn schema(&self) -> &'static TypeSchema {
        self.binding.schema
    }

    #[inline]
    pub fn target(&self) -> &'a T {
        self.target
    }

    #[inline]
    pub fn get_ordinal(&self, key: Key<'_>) -> AccessResult<Option<usize>> {
        self.binding.ordinal(key)
    }

    #[inline]
    pub fn read_value(&self, key: Key<'_>, writer: &mut dyn ValueWriter) -> AccessResult {
        self.binding.read_value(self.target, key, writer)
    }

    #[inline]
    pub fn read_all(&self, writer: &mut dyn DataWriter, stop: &StopToken) -> AccessResult {
        self.binding.read_all(self.target, writer, stop)
    }
}

impl<T: Accessible> DataReader for ObjectRef<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.schema().len()
    }

    fn entry(&mut self, key: Key<'_>) -> AccessResult<Option<&mut dyn ValueReader>> {
        let Some(ordinal) = self.binding.ordinal(key)? else {
            return Ok(None);
        };
        self.scratch = Value::Null;
        self.binding
            .read_ordinal(self.target, ordinal, &mut self.scratch)?;
        Ok(Some(&mut self.scratch))
    }

    #[inline]
    fn read_value(&mut self, key: Key<'_>, writer: &mut dyn ValueWriter) -> AccessResult {
        Self::read_value(self, key, writer)
    }

    #[inline]
    fn read_all(&mut self, writer: &mut dyn DataWriter, stop: &StopToken) -> AccessResult {
        Self::read_all(self, writer, stop)
    }
}

// -----------------------------------------------------------------------------
// Nesting

/// Writes `value` as an object; used by derived value interfaces.
pub fn write_object<T: Accessible>(
    value: &T,
    writer: &mut dyn ValueWriter,
    registry: &'static Registry,
) -> AccessResult {
    writer.write_object(&mut ObjectRef::new_in(registry, value)?)
}

/// Reads an object into a new `T`; used by derived value interfaces.
pub fn read_object<T: Accessible>(reader: &mut dyn ValueReader, registry: &'static Registry) -> AccessResult<T> {
    let mut rw = ObjectRw::<T>::new_in(registry)?;
    reader.read_object(&mut rw)?;
    rw.take_content()
        .ok_or(AccessError::Unbound(type_name::<T>()))
}
