use alloc::string::{String, ToString};
use core::mem;

use serde_core::ser::{Error, SerializeMap, SerializeSeq};
use serde_core::{Serialize, Serializer};

use crate::declare::Accessible;
use crate::error::{AccessError, AccessResult};
use crate::registry::Registry;
use crate::rw::ObjectRef;
use crate::value::{DataReader, DataWriter, Key, StopToken, Value, ValueWriter};

// -----------------------------------------------------------------------------
// Value

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::UInt(v) => serializer.serialize_u64(*v),
            Value::Int128(v) => serializer.serialize_i128(*v),
            Value::UInt128(v) => serializer.serialize_u128(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Char(v) => serializer.serialize_char(*v),
            Value::Str(v) => serializer.serialize_str(v),
            Value::Duration(v) => v.serialize(serializer),
            Value::Object(object) => {
                let mut map = serializer.serialize_map(Some(object.len()))?;
                for (key, value) in object.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

// -----------------------------------------------------------------------------
// SerializeObject

/// Serializes an [`Accessible`] value as a map of its readable members.
pub struct SerializeObject<'a, T: Accessible> {
    object: ObjectRef<'a, T>,
}

impl<'a, T: Accessible> SerializeObject<'a, T> {
    #[inline]
    pub fn new(target: &'a T) -> AccessResult<Self> {
        Self::new_in(Registry::global(), target)
    }

    #[inline]
    pub fn new_in(registry: &'static Registry, target: &'a T) -> AccessResult<Self> {
        Ok(Self {
            object: ObjectRef::new_in(registry, target)?,
        })
    }
}

impl<T: Accessible> Serialize for SerializeObject<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut sink = MapSink {
            map: serializer.serialize_map(None)?,
            pending: None,
            scratch: Value::Null,
            error: None,
        };
        let result = self
            .object
            .read_all(&mut sink, &StopToken::none())
            .and_then(|()| sink.flush());
        if let Err(error) = result {
            return Err(sink.error.take().unwrap_or_else(|| S::Error::custom(error)));
        }
        sink.map.end()
    }
}

/// Streams member entries into a serde map.
///
/// A member value is buffered until the next entry starts, since sinks get
/// the value after the key.
struct MapSink<M: SerializeMap> {
    map: M,
    pending: Option<String>,
    scratch: Value,
    error: Option<M::Error>,
}

impl<M: SerializeMap> MapSink<M> {
    fn flush(&mut self) -> AccessResult {
        let Some(key) = self.pending.take() else {
            return Ok(());
        };
        let value = mem::take(&mut self.scratch);
        self.map.serialize_entry(&key, &value).map_err(|error| {
            let message = error.to_string();
            self.error = Some(error);
            AccessError::Custom(message)
        })
    }
}

impl<M: SerializeMap> DataWriter for MapSink<M> {
    fn entry(&mut self, key: Key<'_>) -> AccessResult<&mut dyn ValueWriter> {
        self.flush()?;
        self.pending = Some(key.to_text().into_owned());
        Ok(&mut self.scratch)
    }

    fn write_all(&mut self, reader: &mut dyn DataReader, stop: &StopToken) -> AccessResult {
        reader.read_all(self, stop)
    }
}
