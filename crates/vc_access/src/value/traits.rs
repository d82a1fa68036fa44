use alloc::borrow::Cow;
use alloc::string::String;
use core::time::Duration;

use super::{Key, Primitive, PrimitiveKind, StopToken, Value};
use crate::error::{AccessError, AccessResult};

// -----------------------------------------------------------------------------
// ValueWriter

macro_rules! typed_writes {
    ($($(#[$attr:meta])* $method:ident($ty:ty) => $variant:ident;)*) => {$(
        $(#[$attr])*
        #[inline]
        fn $method(&mut self, value: $ty) -> AccessResult {
            self.write_primitive(Primitive::$variant(value))
        }
    )*};
}

/// A sink accepting exactly one value.
///
/// Implementors provide [`write_null`], [`write_primitive`],
/// [`write_object`] and [`write_array`]; the typed writes forward to
/// [`write_primitive`] unless overridden.
///
/// [`write_null`]: ValueWriter::write_null
/// [`write_primitive`]: ValueWriter::write_primitive
/// [`write_object`]: ValueWriter::write_object
/// [`write_array`]: ValueWriter::write_array
pub trait ValueWriter {
    fn write_null(&mut self) -> AccessResult;

    fn write_primitive(&mut self, value: Primitive<'_>) -> AccessResult;

    /// Writes a nested object whose entries are keyed by name.
    fn write_object(&mut self, reader: &mut dyn DataReader) -> AccessResult;

    /// Writes a nested array whose entries are keyed by index.
    fn write_array(&mut self, reader: &mut dyn DataReader) -> AccessResult;

    /// Writes an opaque value.
    fn write_direct(&mut self, value: &Value) -> AccessResult {
        value.write_into(self)
    }

    typed_writes! {
        write_bool(bool) => Bool;
        write_i8(i8) => I8;
        write_i16(i16) => I16;
        write_i32(i32) => I32;
        write_i64(i64) => I64;
        write_i128(i128) => I128;
        write_isize(isize) => Isize;
        write_u8(u8) => U8;
        write_u16(u16) => U16;
        write_u32(u32) => U32;
        write_u64(u64) => U64;
        write_u128(u128) => U128;
        write_usize(usize) => Usize;
        write_f32(f32) => F32;
        write_f64(f64) => F64;
        write_char(char) => Char;
        write_duration(Duration) => Duration;
    }

    #[inline]
    fn write_str(&mut self, value: &str) -> AccessResult {
        self.write_primitive(Primitive::Str(Cow::Borrowed(value)))
    }
}

// -----------------------------------------------------------------------------
// ValueReader

macro_rules! typed_reads {
    ($($method:ident => $ty:ty, $kind:ident;)*) => {$(
        #[inline]
        fn $method(&mut self) -> AccessResult<$ty> {
            <$ty>::try_from(self.read_primitive(PrimitiveKind::$kind)?)
        }
    )*};
}

/// A source producing exactly one value.
///
/// `read_primitive` receives the kind the caller wants as a hint; the
/// typed reads convert whatever primitive the source produces, failing with
/// [`AccessError::TypeMismatch`] or [`AccessError::OutOfRange`].
///
/// `read_object` and `read_array` must call [`DataWriter::initialize`]
/// before writing any entry.
pub trait ValueReader {
    fn is_null(&mut self) -> AccessResult<bool>;

    fn read_primitive(&mut self, hint: PrimitiveKind) -> AccessResult<Primitive<'static>>;

    fn read_object(&mut self, writer: &mut dyn DataWriter) -> AccessResult;

    fn read_array(&mut self, writer: &mut dyn DataWriter) -> AccessResult;

    /// Reads the value as an opaque [`Value`].
    fn read_direct(&mut self) -> AccessResult<Value>;

    /// Consumes the value without using it.
    fn skip(&mut self) -> AccessResult {
        self.read_direct().map(drop)
    }

    typed_reads! {
        read_bool => bool, Bool;
        read_i8 => i8, I8;
        read_i16 => i16, I16;
        read_i32 => i32, I32;
        read_i64 => i64, I64;
        read_i128 => i128, I128;
        read_isize => isize, Isize;
        read_u8 => u8, U8;
        read_u16 => u16, U16;
        read_u32 => u32, U32;
        read_u64 => u64, U64;
        read_u128 => u128, U128;
        read_usize => usize, Usize;
        read_f32 => f32, F32;
        read_f64 => f64, F64;
        read_char => char, Char;
        read_string => String, Str;
        read_duration => Duration, Duration;
    }
}

// -----------------------------------------------------------------------------
// DataWriter & DataReader

/// A keyed container of value sinks.
pub trait DataWriter {
    /// Prepares the container for `capacity` entries, discarding previous content.
    fn initialize(&mut self, capacity: Option<usize>) -> AccessResult {
        let _ = capacity;
        Ok(())
    }

    /// The sink for `key`.
    fn entry(&mut self, key: Key<'_>) -> AccessResult<&mut dyn ValueWriter>;

    /// Pulls one value from `reader` into the entry `key`.
    fn write_value(&mut self, key: Key<'_>, reader: &mut dyn ValueReader) -> AccessResult {
        let value = reader.read_direct()?;
        value.write_into(self.entry(key)?)
    }

    /// Pulls every entry this container accepts from `reader`.
    fn write_all(&mut self, reader: &mut dyn DataReader, stop: &StopToken) -> AccessResult;
}

/// A keyed container of value sources.
pub trait DataReader {
    fn len(&self) -> usize;

    /// The source for `key`, or `None` if the container has no such entry.
    fn entry(&mut self, key: Key<'_>) -> AccessResult<Option<&mut dyn ValueReader>>;

    /// Pushes the entry `key` into `writer`.
    fn read_value(&mut self, key: Key<'_>, writer: &mut dyn ValueWriter) -> AccessResult;

    /// Pushes every entry into `writer`, in the container's order.
    fn read_all(&mut self, writer: &mut dyn DataWriter, stop: &StopToken) -> AccessResult;
}

// -----------------------------------------------------------------------------
// Discard

/// A sink that accepts and drops every value.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl ValueWriter for Discard {
    #[inline]
    fn write_null(&mut self) -> AccessResult {
        Ok(())
    }

    #[inline]
    fn write_primitive(&mut self, _: Primitive<'_>) -> AccessResult {
        Ok(())
    }

    #[inline]
    fn write_object(&mut self, _: &mut dyn DataReader) -> AccessResult {
        Ok(())
    }

    #[inline]
    fn write_array(&mut self, _: &mut dyn DataReader) -> AccessResult {
        Ok(())
    }

    #[inline]
    fn write_direct(&mut self, _: &Value) -> AccessResult {
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// DataSource

/// A value source over a [`DataReader`].
///
/// Turns a nested object or array handed to [`ValueWriter::write_object`]
/// or [`ValueWriter::write_array`] back into a source, so that the value
/// interface of the target type can pull from it.
pub struct DataSource<'a> {
    reader: &'a mut dyn DataReader,
    array: bool,
}

impl<'a> DataSource<'a> {
    #[inline]
    pub fn object(reader: &'a mut dyn DataReader) -> Self {
        Self {
            reader,
            array: false,
        }
    }

    #[inline]
    pub fn array(reader: &'a mut dyn DataReader) -> Self {
        Self {
            reader,
            array: true,
        }
    }

    fn found(&self) -> &'static str {
        if self.array { "array" } else { "object" }
    }
}

impl ValueReader for DataSource<'_> {
    #[inline]
    fn is_null(&mut self) -> AccessResult<bool> {
        Ok(false)
    }

    fn read_primitive(&mut self, hint: PrimitiveKind) -> AccessResult<Primitive<'static>> {
        Err(AccessError::TypeMismatch {
            expected: hint.name(),
            found: self.found(),
        })
    }

    fn read_object(&mut self, writer: &mut dyn DataWriter) -> AccessResult {
        writer.initialize(Some(self.reader.len()))?;
        writer.write_all(self.reader, &StopToken::none())
    }

    fn read_array(&mut self, writer: &mut dyn DataWriter) -> AccessResult {
        writer.initialize(Some(self.reader.len()))?;
        writer.write_all(self.reader, &StopToken::none())
    }

    fn read_direct(&mut self) -> AccessResult<Value> {
        let mut value = Value::Null;
        if self.array {
            value.write_array(self.reader)?;
        } else {
            value.write_object(self.reader)?;
        }
        Ok(value)
    }
}
