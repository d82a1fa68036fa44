use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::values::Order;
use super::{Record, registries};
use crate::value::{DataReader, DataWriter, ValueObject, ValueReader, ValueWriter};
use crate::{AccessResult, Key, ObjectRef, ObjectRw, Options, StopToken, Value};

// -----------------------------------------------------------------------------
// Skipping defaults

#[test]
fn default_values_are_skipped_when_asked() {
    for registry in registries() {
        let value = registry.to_value(&Record::sample()).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["Id", "Name", "Tag"]);
    }

    for registry in registries() {
        registry
            .update_options::<Record>(|options| options | Options::SKIP_DEFAULT)
            .unwrap();
        let value = registry.to_value(&Record::sample()).unwrap();
        let entries: Vec<(&str, &Value)> = value.as_object().unwrap().iter().collect();
        assert_eq!(entries, [("Name", &Value::from("x"))]);
    }
}

#[test]
fn nested_objects_are_never_default() {
    for registry in registries() {
        registry
            .update_options::<Order>(|options| options | Options::SKIP_DEFAULT)
            .unwrap();
        let value = registry.to_value(&Order::default()).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["customer"]);
    }
}

// -----------------------------------------------------------------------------
// Stopping and resuming

/// Raises `stop` once the entry `at` has been handed out.
struct StopAt {
    stop: StopToken,
    at: &'static str,
    seen: Vec<String>,
    scratch: Value,
}

impl DataWriter for StopAt {
    fn entry(&mut self, key: Key<'_>) -> AccessResult<&mut dyn ValueWriter> {
        let name = key.to_text().into_owned();
        if name == self.at {
            self.stop.request();
        }
        self.seen.push(name);
        Ok(&mut self.scratch)
    }

    fn write_all(&mut self, _: &mut dyn DataReader, _: &StopToken) -> AccessResult {
        Ok(())
    }
}

#[test]
fn read_all_resumes_after_a_stop() {
    for registry in registries() {
        let record = Record {
            id: 1,
            name: "n".into(),
            tag: 3,
        };
        let stop = StopToken::new();
        let mut sink = StopAt {
            stop: stop.clone(),
            at: "Name",
            seen: Vec::new(),
            scratch: Value::Null,
        };

        let reader = ObjectRef::new_in(registry, &record).unwrap();
        reader.read_all(&mut sink, &stop).unwrap();
        assert_eq!(sink.seen, ["Id", "Name"]);
        assert_eq!(stop.saved(), Some(2));

        stop.resume();
        reader.read_all(&mut sink, &stop).unwrap();
        assert_eq!(sink.seen, ["Id", "Name", "Tag"]);
        assert_eq!(stop.saved(), None);
    }
}

#[test]
fn a_saved_position_follows_the_token() {
    for registry in registries() {
        let stop = StopToken::new();
        let mut sink = StopAt {
            stop: stop.clone(),
            at: "Name",
            seen: Vec::new(),
            scratch: Value::Null,
        };
        let first = Record::sample();
        ObjectRef::new_in(registry, &first)
            .unwrap()
            .read_all(&mut sink, &stop)
            .unwrap();
        assert_eq!(stop.saved(), Some(2));

        stop.resume();
        sink.seen.clear();
        let second = Record::sample();
        ObjectRef::new_in(registry, &second)
            .unwrap()
            .read_all(&mut sink, &stop)
            .unwrap();
        assert_eq!(sink.seen, ["Tag"]);
    }
}

/// Counts the entries pulled from it and stops after `limit` of them.
struct Counting {
    values: ValueObject,
    pulled: Vec<String>,
    stop: StopToken,
    limit: usize,
    current: Value,
}

impl DataReader for Counting {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn entry(&mut self, key: Key<'_>) -> AccessResult<Option<&mut dyn ValueReader>> {
        let name = key.to_text();
        let Some(value) = self.values.get(&name) else {
            return Ok(None);
        };
        self.current = value.clone();
        self.pulled.push(name.into_owned());
        if self.pulled.len() == self.limit {
            self.stop.request();
        }
        Ok(Some(&mut self.current))
    }

    fn read_value(&mut self, key: Key<'_>, writer: &mut dyn ValueWriter) -> AccessResult {
        match self.entry(key)? {
            Some(value) => value.read_direct()?.write_into(writer),
            None => writer.write_null(),
        }
    }

    fn read_all(&mut self, _: &mut dyn DataWriter, _: &StopToken) -> AccessResult {
        Ok(())
    }
}

#[test]
fn write_all_resumes_without_repeating_members() {
    for registry in registries() {
        let stop = StopToken::new();
        let mut source = Counting {
            values: [
                ("Id".to_string(), Value::Int(4)),
                ("Name".to_string(), Value::from("four")),
                ("Tag".to_string(), Value::Int(44)),
                ("Extra".to_string(), Value::Bool(true)),
            ]
            .into_iter()
            .collect(),
            pulled: Vec::new(),
            stop: stop.clone(),
            limit: 2,
            current: Value::Null,
        };

        let mut rw = ObjectRw::<Record>::new_in(registry).unwrap();
        rw.initialize().unwrap();
        rw.write_all(&mut source, &stop).unwrap();
        assert_eq!(source.pulled, ["Id", "Name"]);
        assert_eq!(rw.content().unwrap().tag, 0);

        stop.resume();
        rw.write_all(&mut source, &stop).unwrap();
        assert_eq!(source.pulled, ["Id", "Name", "Tag"]);
        assert_eq!(
            rw.content(),
            Some(&Record {
                id: 4,
                name: "four".into(),
                tag: 44,
            })
        );
    }
}

#[test]
fn missing_entries_keep_their_values() {
    for registry in registries() {
        let mut source: ValueObject = [("Tag".to_string(), Value::Int(8))].into_iter().collect();
        let mut rw = ObjectRw::<Record>::new_in(registry).unwrap();
        rw.initialize_with(Record::sample());
        rw.write_all(&mut source, &StopToken::none()).unwrap();
        let record = rw.content().unwrap();
        assert_eq!((record.name.as_str(), record.tag), ("x", 8));
    }
}

// -----------------------------------------------------------------------------
// Ordering

#[test]
fn both_paths_emit_the_same_order() {
    let [compiled, reflective] = registries();
    let record = Record {
        id: 2,
        name: "b".into(),
        tag: 9,
    };
    let left = compiled.to_value(&record).unwrap();
    let right = reflective.to_value(&record).unwrap();
    assert_eq!(left, right);
    assert_eq!(compiled.to_value(&record).unwrap(), left);
}
