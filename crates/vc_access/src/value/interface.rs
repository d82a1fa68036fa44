use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use super::zero::is_zeroed;
use super::{DataReader, DataWriter, Key, PrimitiveKind, StopToken, Value, ValueReader, ValueWriter};
use crate::error::{AccessError, AccessResult};
use crate::registry::Registry;

// -----------------------------------------------------------------------------
// AccessValue

/// The value interface of a type: how one value moves into a
/// [`ValueWriter`] and out of a [`ValueReader`].
///
/// Implemented for primitives, `String`, [`Duration`], `Option<T>`,
/// `Vec<T>`, `Box<T>`, [`Value`] and every type deriving
/// [`Accessible`](crate::Accessible).
///
/// The registry passed along is the one the enclosing schema was built by;
/// nested objects are resolved through it.
pub trait AccessValue: Sized + Send + Sync + 'static {
    /// The primitive kind of the type, if it has a typed sink/source call.
    const PRIMITIVE: Option<PrimitiveKind> = None;

    fn write_value(&self, writer: &mut dyn ValueWriter, registry: &'static Registry) -> AccessResult;

    fn read_value(reader: &mut dyn ValueReader, registry: &'static Registry) -> AccessResult<Self>;

    /// Whether the value equals the zero value of its type.
    ///
    /// Members holding such a value are omitted from skip-default bulk reads.
    /// `#[derive(Accessible)]` types always answer `false`.
    fn is_default_value(&self) -> bool;

    /// The zero value, used to allocate objects without a constructor.
    fn zeroed() -> Self;
}

// -----------------------------------------------------------------------------
// ValueInterface

/// A replacement value interface for `T`, registered with
/// [`Registry::set_interface`].
///
/// While an override exists, members of type `T` never take the direct
/// primitive path.
pub trait ValueInterface<T>: Send + Sync + 'static {
    fn write_value(&self, value: &T, writer: &mut dyn ValueWriter, registry: &'static Registry) -> AccessResult;

    fn read_value(&self, reader: &mut dyn ValueReader, registry: &'static Registry) -> AccessResult<T>;
}

/// Writes `value` through the registry's override for `T`, or through
/// `T`'s own value interface.
#[inline]
pub fn write_dispatch<T: AccessValue>(
    value: &T,
    writer: &mut dyn ValueWriter,
    registry: &'static Registry,
) -> AccessResult {
    match registry.interface::<T>() {
        Some(interface) => interface.write_value(value, writer, registry),
        None => value.write_value(writer, registry),
    }
}

/// Reads a `T` through the registry's override for `T`, or through `T`'s
/// own value interface.
#[inline]
pub fn read_dispatch<T: AccessValue>(
    reader: &mut dyn ValueReader,
    registry: &'static Registry,
) -> AccessResult<T> {
    match registry.interface::<T>() {
        Some(interface) => interface.read_value(reader, registry),
        None => T::read_value(reader, registry),
    }
}

// -----------------------------------------------------------------------------
// Primitives

macro_rules! impl_numeric {
    ($($ty:ty => $kind:ident, $write:ident, $read:ident;)*) => {$(
        impl AccessValue for $ty {
            const PRIMITIVE: Option<PrimitiveKind> = Some(PrimitiveKind::$kind);

            #[inline]
            fn write_value(&self, writer: &mut dyn ValueWriter, _: &'static Registry) -> AccessResult {
                writer.$write(*self)
            }

            #[inline]
            fn read_value(reader: &mut dyn ValueReader, _: &'static Registry) -> AccessResult<Self> {
                reader.$read()
            }

            #[inline]
            fn is_default_value(&self) -> bool {
                is_zeroed(&self.to_ne_bytes())
            }

            #[inline]
            fn zeroed() -> Self {
                <$ty>::default()
            }
        }
    )*};
}

impl_numeric! {
    i8 => I8, write_i8, read_i8;
    i16 => I16, write_i16, read_i16;
    i32 => I32, write_i32, read_i32;
    i64 => I64, write_i64, read_i64;
    i128 => I128, write_i128, read_i128;
    isize => Isize, write_isize, read_isize;
    u8 => U8, write_u8, read_u8;
    u16 => U16, write_u16, read_u16;
    u32 => U32, write_u32, read_u32;
    u64 => U64, write_u64, read_u64;
    u128 => U128, write_u128, read_u128;
    usize => Usize, write_usize, read_usize;
    f32 => F32, write_f32, read_f32;
    f64 => F64, write_f64, read_f64;
}

impl AccessValue for bool {
    const PRIMITIVE: Option<PrimitiveKind> = Some(PrimitiveKind::Bool);

    #[inline]
    fn write_value(&self, writer: &mut dyn ValueWriter, _: &'static Registry) -> AccessResult {
        writer.write_bool(*self)
    }

    #[inline]
    fn read_value(reader: &mut dyn ValueReader, _: &'static Registry) -> AccessResult<Self> {
        reader.read_bool()
    }

    #[inline]
    fn is_default_value(&self) -> bool {
        is_zeroed(&[u8::from(*self)])
    }

    #[inline]
    fn zeroed() -> Self {
        false
    }
}

impl AccessValue for char {
    const PRIMITIVE: Option<PrimitiveKind> = Some(PrimitiveKind::Char);

    #[inline]
    fn write_value(&self, writer: &mut dyn ValueWriter, _: &'static Registry) -> AccessResult {
        writer.write_char(*self)
    }

    #[inline]
    fn read_value(reader: &mut dyn ValueReader, _: &'static Registry) -> AccessResult<Self> {
        reader.read_char()
    }

    #[inline]
    fn is_default_value(&self) -> bool {
        is_zeroed(&u32::from(*self).to_ne_bytes())
    }

    #[inline]
    fn zeroed() -> Self {
        '\0'
    }
}

impl AccessValue for String {
    const PRIMITIVE: Option<PrimitiveKind> = Some(PrimitiveKind::Str);

    #[inline]
    fn write_value(&self, writer: &mut dyn ValueWriter, _: &'static Registry) -> AccessResult {
        writer.write_str(self)
    }

    #[inline]
    fn read_value(reader: &mut dyn ValueReader, _: &'static Registry) -> AccessResult<Self> {
        reader.read_string()
    }

    #[inline]
    fn is_default_value(&self) -> bool {
        self.is_empty()
    }

    #[inline]
    fn zeroed() -> Self {
        String::new()
    }
}

impl AccessValue for Duration {
    const PRIMITIVE: Option<PrimitiveKind> = Some(PrimitiveKind::Duration);

    #[inline]
    fn write_value(&self, writer: &mut dyn ValueWriter, _: &'static Registry) -> AccessResult {
        writer.write_duration(*self)
    }

    #[inline]
    fn read_value(reader: &mut dyn ValueReader, _: &'static Registry) -> AccessResult<Self> {
        reader.read_duration()
    }

    fn is_default_value(&self) -> bool {
        let mut bytes = [0_u8; 12];
        bytes[..8].copy_from_slice(&self.as_secs().to_ne_bytes());
        bytes[8..].copy_from_slice(&self.subsec_nanos().to_ne_bytes());
        is_zeroed(&bytes)
    }

    #[inline]
    fn zeroed() -> Self {
        Duration::ZERO
    }
}

impl AccessValue for Value {
    fn write_value(&self, writer: &mut dyn ValueWriter, _: &'static Registry) -> AccessResult {
        writer.write_direct(self)
    }

    fn read_value(reader: &mut dyn ValueReader, _: &'static Registry) -> AccessResult<Self> {
        reader.read_direct()
    }

    #[inline]
    fn is_default_value(&self) -> bool {
        self.is_null()
    }

    #[inline]
    fn zeroed() -> Self {
        Value::Null
    }
}

// -----------------------------------------------------------------------------
// Containers

impl<T: AccessValue> AccessValue for Option<T> {
    fn write_value(&self, writer: &mut dyn ValueWriter, registry: &'static Registry) -> AccessResult {
        match self {
            Some(value) => write_dispatch(value, writer, registry),
            None => writer.write_null(),
        }
    }

    fn read_value(reader: &mut dyn ValueReader, registry: &'static Registry) -> AccessResult<Self> {
        if reader.is_null()? {
            reader.skip()?;
            Ok(None)
        } else {
            read_dispatch(reader, registry).map(Some)
        }
    }

    #[inline]
    fn is_default_value(&self) -> bool {
        self.is_none()
    }

    #[inline]
    fn zeroed() -> Self {
        None
    }
}

impl<T: AccessValue> AccessValue for Box<T> {
    fn write_value(&self, writer: &mut dyn ValueWriter, registry: &'static Registry) -> AccessResult {
        write_dispatch(&**self, writer, registry)
    }

    fn read_value(reader: &mut dyn ValueReader, registry: &'static Registry) -> AccessResult<Self> {
        read_dispatch(reader, registry).map(Box::new)
    }

    #[inline]
    fn is_default_value(&self) -> bool {
        false
    }

    #[inline]
    fn zeroed() -> Self {
        Box::new(T::zeroed())
    }
}

impl<T: AccessValue> AccessValue for Vec<T> {
    fn write_value(&self, writer: &mut dyn ValueWriter, registry: &'static Registry) -> AccessResult {
        writer.write_array(&mut SliceReader {
            items: self,
            registry,
            scratch: Value::Null,
        })
    }

    fn read_value(reader: &mut dyn ValueReader, registry: &'static Registry) -> AccessResult<Self> {
        let mut sink = VecSink {
            items: Vec::new(),
            registry,
        };
        reader.read_array(&mut sink)?;
        Ok(sink.items)
    }

    #[inline]
    fn is_default_value(&self) -> bool {
        self.is_empty()
    }

    #[inline]
    fn zeroed() -> Self {
        Vec::new()
    }
}

/// Index-keyed reader over a typed slice.
struct SliceReader<'a, T> {
    items: &'a [T],
    registry: &'static Registry,
    scratch: Value,
}

impl<T: AccessValue> DataReader for SliceReader<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.items.len()
    }

    fn entry(&mut self, key: Key<'_>) -> AccessResult<Option<&mut dyn ValueReader>> {
        let Key::Ordinal(index) = key else {
            return Ok(None);
        };
        let Some(item) = self.items.get(index) else {
            return Ok(None);
        };
        self.scratch = Value::Null;
        write_dispatch(item, &mut self.scratch, self.registry)?;
        Ok(Some(&mut self.scratch))
    }

    fn read_value(&mut self, key: Key<'_>, writer: &mut dyn ValueWriter) -> AccessResult {
        match key {
            Key::Ordinal(index) if index < self.items.len() => {
                write_dispatch(&self.items[index], writer, self.registry)
            }
            _ => writer.write_null(),
        }
    }

    fn read_all(&mut self, writer: &mut dyn DataWriter, stop: &StopToken) -> AccessResult {
        let start = stop.take_saved().unwrap_or(0);
        for (index, item) in self.items.iter().enumerate().skip(start) {
            write_dispatch(item, writer.entry(Key::Ordinal(index))?, self.registry)?;
            if stop.checkpoint(index) {
                return Ok(());
            }
        }
        Ok(())
    }
}

/// Index-keyed writer collecting typed items.
struct VecSink<T> {
    items: Vec<T>,
    registry: &'static Registry,
}

impl<T: AccessValue> DataWriter for VecSink<T> {
    fn initialize(&mut self, capacity: Option<usize>) -> AccessResult {
        self.items.clear();
        self.items.reserve(capacity.unwrap_or(0));
        Ok(())
    }

    fn entry(&mut self, _: Key<'_>) -> AccessResult<&mut dyn ValueWriter> {
        Err(AccessError::Unsupported("keyed entries of a typed array"))
    }

    fn write_value(&mut self, key: Key<'_>, reader: &mut dyn ValueReader) -> AccessResult {
        let index = key.array_slot(self.items.len())?;
        let item = read_dispatch::<T>(reader, self.registry)?;
        match self.items.get_mut(index) {
            Some(slot) => *slot = item,
            None => self.items.push(item),
        }
        Ok(())
    }

    fn write_all(&mut self, reader: &mut dyn DataReader, stop: &StopToken) -> AccessResult {
        let start = stop.take_saved().unwrap_or(0);
        for index in start..reader.len() {
            if let Some(source) = reader.entry(Key::Ordinal(index))? {
                let item = read_dispatch::<T>(source, self.registry)?;
                self.items.push(item);
            }
            if stop.checkpoint(index) {
                return Ok(());
            }
        }
        Ok(())
    }
}
