use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use super::{DataReader, DataWriter, Key, Primitive, PrimitiveKind, StopToken, ValueReader, ValueWriter};
use crate::error::{AccessError, AccessResult};

// -----------------------------------------------------------------------------
// Value

/// An in-memory value tree.
///
/// `Value` is a sink and a source for one value, so it can be handed to any
/// reader/writer operation. Objects keep their entries in insertion order.
///
/// # Examples
///
/// ```
/// use vc_access::Value;
/// use vc_access::value::{ValueObject, ValueWriter};
///
/// let mut value = Value::Null;
/// value.write_i32(7).unwrap();
/// assert_eq!(value, Value::Int(7));
///
/// let mut object = ValueObject::new();
/// object.insert("Name", Value::from("x"));
/// assert_eq!(object.get("Name"), Some(&Value::Str("x".into())));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    /// Signed integers up to 64 bits.
    Int(i64),
    /// Unsigned integers up to 64 bits.
    UInt(u64),
    Int128(i128),
    UInt128(u128),
    Float(f64),
    Char(char),
    Str(String),
    Duration(Duration),
    Object(ValueObject),
    Array(Vec<Value>),
}

impl Value {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The name of the variant, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) | Value::Int128(_) | Value::UInt128(_) => "integer",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::Str(_) => "string",
            Value::Duration(_) => "duration",
            Value::Object(_) => "object",
            Value::Array(_) => "array",
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&ValueObject> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Replays this value into `writer`.
    pub fn write_into<W: ValueWriter + ?Sized>(&self, writer: &mut W) -> AccessResult {
        match self {
            Value::Null => writer.write_null(),
            Value::Bool(v) => writer.write_bool(*v),
            Value::Int(v) => writer.write_i64(*v),
            Value::UInt(v) => writer.write_u64(*v),
            Value::Int128(v) => writer.write_i128(*v),
            Value::UInt128(v) => writer.write_u128(*v),
            Value::Float(v) => writer.write_f64(*v),
            Value::Char(v) => writer.write_char(*v),
            Value::Str(v) => writer.write_str(v),
            Value::Duration(v) => writer.write_duration(*v),
            Value::Object(object) => writer.write_object(&mut ObjectView::new(object)),
            Value::Array(items) => writer.write_array(&mut ArrayView::new(items)),
        }
    }

    fn primitive(&self) -> Option<Primitive<'static>> {
        Some(match self {
            Value::Bool(v) => Primitive::Bool(*v),
            Value::Int(v) => Primitive::I64(*v),
            Value::UInt(v) => Primitive::U64(*v),
            Value::Int128(v) => Primitive::I128(*v),
            Value::UInt128(v) => Primitive::U128(*v),
            Value::Float(v) => Primitive::F64(*v),
            Value::Char(v) => Primitive::Char(*v),
            Value::Str(v) => Primitive::Str(Cow::Owned(v.clone())),
            Value::Duration(v) => Primitive::Duration(*v),
            _ => return None,
        })
    }

    fn mismatch(&self, expected: &'static str) -> AccessError {
        AccessError::TypeMismatch {
            expected,
            found: self.kind_name(),
        }
    }
}

impl From<Primitive<'_>> for Value {
    fn from(value: Primitive<'_>) -> Self {
        match value {
            Primitive::Bool(v) => Value::Bool(v),
            Primitive::I8(v) => Value::Int(v.into()),
            Primitive::I16(v) => Value::Int(v.into()),
            Primitive::I32(v) => Value::Int(v.into()),
            Primitive::I64(v) => Value::Int(v),
            Primitive::Isize(v) => Value::Int(v as i64),
            Primitive::I128(v) => Value::Int128(v),
            Primitive::U8(v) => Value::UInt(v.into()),
            Primitive::U16(v) => Value::UInt(v.into()),
            Primitive::U32(v) => Value::UInt(v.into()),
            Primitive::U64(v) => Value::UInt(v),
            Primitive::Usize(v) => Value::UInt(v as u64),
            Primitive::U128(v) => Value::UInt128(v),
            Primitive::F32(v) => Value::Float(v.into()),
            Primitive::F64(v) => Value::Float(v),
            Primitive::Char(v) => Value::Char(v),
            Primitive::Str(v) => Value::Str(v.into_owned()),
            Primitive::Duration(v) => Value::Duration(v),
        }
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::Str(value.into())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<ValueObject> for Value {
    #[inline]
    fn from(value: ValueObject) -> Self {
        Value::Object(value)
    }
}

impl ValueWriter for Value {
    #[inline]
    fn write_null(&mut self) -> AccessResult {
        *self = Value::Null;
        Ok(())
    }

    #[inline]
    fn write_primitive(&mut self, value: Primitive<'_>) -> AccessResult {
        *self = Value::from(value);
        Ok(())
    }

    fn write_object(&mut self, reader: &mut dyn DataReader) -> AccessResult {
        let mut object = ValueObject::with_capacity(reader.len());
        reader.read_all(&mut object, &StopToken::none())?;
        *self = Value::Object(object);
        Ok(())
    }

    fn write_array(&mut self, reader: &mut dyn DataReader) -> AccessResult {
        let mut items = ArrayBuilder(Vec::with_capacity(reader.len()));
        reader.read_all(&mut items, &StopToken::none())?;
        *self = Value::Array(items.0);
        Ok(())
    }

    #[inline]
    fn write_direct(&mut self, value: &Value) -> AccessResult {
        *self = value.clone();
        Ok(())
    }
}

impl ValueReader for Value {
    #[inline]
    fn is_null(&mut self) -> AccessResult<bool> {
        Ok(Value::is_null(self))
    }

    fn read_primitive(&mut self, hint: PrimitiveKind) -> AccessResult<Primitive<'static>> {
        self.primitive().ok_or_else(|| self.mismatch(hint.name()))
    }

    fn read_object(&mut self, writer: &mut dyn DataWriter) -> AccessResult {
        let Value::Object(object) = self else {
            return Err(self.mismatch("object"));
        };
        writer.initialize(Some(object.len()))?;
        for (key, value) in &mut object.entries {
            writer.write_value(Key::Str(key), value)?;
        }
        Ok(())
    }

    fn read_array(&mut self, writer: &mut dyn DataWriter) -> AccessResult {
        let Value::Array(items) = self else {
            return Err(self.mismatch("array"));
        };
        writer.initialize(Some(items.len()))?;
        for (index, item) in items.iter_mut().enumerate() {
            writer.write_value(Key::Ordinal(index), item)?;
        }
        Ok(())
    }

    #[inline]
    fn read_direct(&mut self) -> AccessResult<Value> {
        Ok(self.clone())
    }

    #[inline]
    fn skip(&mut self) -> AccessResult {
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// ValueObject

/// Name-keyed entries of a [`Value::Object`], in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueObject {
    entries: Vec<(String, Value)>,
}

impl ValueObject {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Inserts or replaces an entry, keeping the position of a replaced one.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => Some(core::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    fn slot(&mut self, key: Key<'_>) -> &mut Value {
        let name = key.to_text();
        let index = match self.entries.iter().position(|(k, _)| *k == *name) {
            Some(index) => index,
            None => {
                self.entries.push((name.into_owned(), Value::Null));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    fn find(&self, key: Key<'_>) -> Option<usize> {
        match key {
            Key::Ordinal(index) => (index < self.entries.len()).then_some(index),
            _ => {
                let name = key.to_text();
                self.entries.iter().position(|(k, _)| *k == *name)
            }
        }
    }
}

impl FromIterator<(String, Value)> for ValueObject {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut object = ValueObject::new();
        for (key, value) in iter {
            object.insert(key, value);
        }
        object
    }
}

impl DataWriter for ValueObject {
    fn initialize(&mut self, capacity: Option<usize>) -> AccessResult {
        self.entries.clear();
        self.entries.reserve(capacity.unwrap_or(0));
        Ok(())
    }

    #[inline]
    fn entry(&mut self, key: Key<'_>) -> AccessResult<&mut dyn ValueWriter> {
        Ok(self.slot(key))
    }

    fn write_value(&mut self, key: Key<'_>, reader: &mut dyn ValueReader) -> AccessResult {
        *self.slot(key) = reader.read_direct()?;
        Ok(())
    }

    fn write_all(&mut self, reader: &mut dyn DataReader, stop: &StopToken) -> AccessResult {
        reader.read_all(self, stop)
    }
}

impl DataReader for ValueObject {
    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entry(&mut self, key: Key<'_>) -> AccessResult<Option<&mut dyn ValueReader>> {
        Ok(match self.find(key) {
            Some(index) => Some(&mut self.entries[index].1),
            None => None,
        })
    }

    fn read_value(&mut self, key: Key<'_>, writer: &mut dyn ValueWriter) -> AccessResult {
        ObjectView::new(self).read_value(key, writer)
    }

    fn read_all(&mut self, writer: &mut dyn DataWriter, stop: &StopToken) -> AccessResult {
        ObjectView::new(self).read_all(writer, stop)
    }
}

// -----------------------------------------------------------------------------
// Views

/// Read-only [`DataReader`] over a borrowed object.
///
/// `entry` copies the entry into a scratch value, since a shared borrow
/// cannot hand out a mutable source.
struct ObjectView<'a> {
    object: &'a ValueObject,
    scratch: Value,
}

impl<'a> ObjectView<'a> {
    #[inline]
    fn new(object: &'a ValueObject) -> Self {
        Self {
            object,
            scratch: Value::Null,
        }
    }
}

impl DataReader for ObjectView<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.object.len()
    }

    fn entry(&mut self, key: Key<'_>) -> AccessResult<Option<&mut dyn ValueReader>> {
        let Some(index) = self.object.find(key) else {
            return Ok(None);
        };
        self.scratch = self.object.entries[index].1.clone();
        Ok(Some(&mut self.scratch))
    }

    fn read_value(&mut self, key: Key<'_>, writer: &mut dyn ValueWriter) -> AccessResult {
        match self.object.find(key) {
            Some(index) => self.object.entries[index].1.write_into(writer),
            None => writer.write_null(),
        }
    }

    fn read_all(&mut self, writer: &mut dyn DataWriter, stop: &StopToken) -> AccessResult {
        let start = stop.take_saved().unwrap_or(0);
        for (index, (key, value)) in self.object.entries.iter().enumerate().skip(start) {
            value.write_into(writer.entry(Key::Str(key))?)?;
            if stop.checkpoint(index) {
                return Ok(());
            }
        }
        Ok(())
    }
}

/// Read-only [`DataReader`] over borrowed array items.
struct ArrayView<'a> {
    items: &'a [Value],
    scratch: Value,
}

impl<'a> ArrayView<'a> {
    #[inline]
    fn new(items: &'a [Value]) -> Self {
        Self {
            items,
            scratch: Value::Null,
        }
    }
}

impl DataReader for ArrayView<'_> {
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
        self.scratch = item.clone();
        Ok(Some(&mut self.scratch))
    }

    fn read_value(&mut self, key: Key<'_>, writer: &mut dyn ValueWriter) -> AccessResult {
        match key {
            Key::Ordinal(index) if index < self.items.len() => self.items[index].write_into(writer),
            _ => writer.write_null(),
        }
    }

    fn read_all(&mut self, writer: &mut dyn DataWriter, stop: &StopToken) -> AccessResult {
        let start = stop.take_saved().unwrap_or(0);
        for (index, item) in self.items.iter().enumerate().skip(start) {
            item.write_into(writer.entry(Key::Ordinal(index))?)?;
            if stop.checkpoint(index) {
                return Ok(());
            }
        }
        Ok(())
    }
}

/// Index-keyed [`DataWriter`] collecting array items.
struct ArrayBuilder(Vec<Value>);

impl DataWriter for ArrayBuilder {
    fn initialize(&mut self, capacity: Option<usize>) -> AccessResult {
        self.0.clear();
        self.0.reserve(capacity.unwrap_or(0));
        Ok(())
    }

    fn entry(&mut self, key: Key<'_>) -> AccessResult<&mut dyn ValueWriter> {
        let index = key.array_slot(self.0.len())?;
        if index == self.0.len() {
            self.0.push(Value::Null);
        }
        Ok(&mut self.0[index])
    }

    fn write_all(&mut self, reader: &mut dyn DataReader, stop: &StopToken) -> AccessResult {
        reader.read_all(self, stop)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Value, ValueObject};
    use crate::StopToken;
    use crate::value::{DataReader, DataWriter, Key, ValueReader, ValueWriter};

    fn sample() -> ValueObject {
        let mut object = ValueObject::new();
        object.insert("a", Value::Int(1));
        object.insert("b", Value::Array(vec![Value::Bool(true), Value::Null]));
        object.insert("c", Value::from("three"));
        object
    }

    #[test]
    fn insert_keeps_position() {
        let mut object = sample();
        assert_eq!(object.insert("a", Value::Int(9)), Some(Value::Int(1)));
        assert_eq!(object.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
    }

    #[test]
    fn write_into_copies_nested_values() {
        let source = Value::Object(sample());
        let mut target = Value::Null;
        source.write_into(&mut target).unwrap();
        assert_eq!(source, target);
    }

    #[test]
    fn typed_reads_convert() {
        let mut value = Value::UInt(200);
        assert_eq!(value.read_i32().unwrap(), 200);
        assert!(value.read_i8().is_err());
        assert!(Value::Null.read_bool().is_err());
    }

    #[test]
    fn read_all_resumes_after_stop() {
        struct StopAfterFirst {
            seen: Vec<String>,
            stop: StopToken,
            scratch: Value,
        }

        impl DataWriter for StopAfterFirst {
            fn entry(&mut self, key: Key<'_>) -> crate::AccessResult<&mut dyn ValueWriter> {
                self.seen.push(key.to_text().into_owned());
                if self.seen.len() == 1 {
                    self.stop.request();
                }
                Ok(&mut self.scratch)
            }

            fn write_all(
                &mut self,
                reader: &mut dyn DataReader,
                stop: &StopToken,
            ) -> crate::AccessResult {
                reader.read_all(self, stop)
            }
        }

        let stop = StopToken::new();
        let mut writer = StopAfterFirst {
            seen: Vec::new(),
            stop: stop.clone(),
            scratch: Value::Null,
        };
        let mut object = sample();

        object.read_all(&mut writer, &stop).unwrap();
        assert_eq!(writer.seen, ["a"]);

        stop.resume();
        object.read_all(&mut writer, &stop).unwrap();
        assert_eq!(writer.seen, ["a", "b", "c"]);
    }

    #[test]
    fn object_entries_by_key_kind() {
        let mut object = sample();
        let utf16: Vec<u16> = "c".encode_utf16().collect();
        assert!(DataReader::entry(&mut object, Key::Utf16(&utf16)).unwrap().is_some());
        assert!(DataReader::entry(&mut object, Key::Utf8(b"b")).unwrap().is_some());
        assert!(DataReader::entry(&mut object, Key::Str("z")).unwrap().is_none());

        let mut out = Value::Null;
        object.read_value(Key::Ordinal(0), &mut out).unwrap();
        assert_eq!(out, Value::Int(1));
    }
}
