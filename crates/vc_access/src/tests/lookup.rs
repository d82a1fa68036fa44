use alloc::string::String;
use alloc::vec::Vec;

use super::{Record, registries};
use crate::emit::MAX_DISPATCH_DEPTH;
use crate::{AccessError, Accessible, Declaration, Key, ObjectRw, Options, Value};

#[derive(Accessible, Default)]
#[access(default)]
pub struct Person {
    pub name: String,
    pub age: u32,
    #[access(rename = "ID", order = -1)]
    id: u64,
    secret: String,
}

#[test]
fn ordinals_follow_order_then_name() {
    for registry in registries() {
        let schema = registry.schema::<Person>().unwrap();
        let names: Vec<&str> = schema.members().iter().map(|m| m.serialized_name()).collect();
        assert_eq!(names, ["ID", "age", "name"]);

        for (ordinal, member) in schema.members().iter().enumerate() {
            assert_eq!(member.ordinal(), ordinal);
        }
        assert_eq!(schema.member(0).unwrap().order(), -1);
        assert!(schema.member(0).unwrap().is_explicit());
    }
}

#[test]
fn every_key_form_names_the_same_member() {
    for registry in registries() {
        let schema = registry.schema::<Record>().unwrap();
        let utf16: Vec<u16> = "Name".encode_utf16().collect();

        assert_eq!(schema.ordinal_of(Key::Str("Name")), Some(1));
        assert_eq!(schema.ordinal_of(Key::Utf8(b"Name")), Some(1));
        assert_eq!(schema.ordinal_of(Key::Utf16(&utf16)), Some(1));
        assert_eq!(schema.ordinal_of(Key::Ordinal(1)), Some(1));
        assert_eq!(schema.ordinal_of(Key::Ordinal(3)), None);
        assert_eq!(schema.ordinal_of(Key::Str("name")), None);
    }
}

#[test]
fn ignore_case_folds_every_key_form() {
    for registry in registries() {
        registry
            .set_options::<Record>(Options::DEFAULT | Options::IGNORE_CASE)
            .unwrap();
        let rw = ObjectRw::<Record>::new_in(registry).unwrap();

        assert_eq!(rw.get_ordinal(Key::Str("id")).unwrap(), Some(0));
        assert_eq!(rw.get_ordinal(Key::Str("NAME")).unwrap(), Some(1));
        assert_eq!(rw.get_ordinal(Key::Str("Name")).unwrap(), Some(1));
        assert_eq!(rw.get_ordinal(Key::Utf8(b"tAg")).unwrap(), Some(2));

        let utf16: Vec<u16> = "nAmE".encode_utf16().collect();
        assert_eq!(rw.get_ordinal(Key::Utf16(&utf16)).unwrap(), Some(1));
    }
}

#[test]
fn unknown_keys_are_ignored_by_default() {
    for registry in registries() {
        let mut rw = ObjectRw::<Record>::new_in(registry).unwrap();
        rw.initialize_with(Record::sample());

        let mut out = Value::Int(1);
        rw.read_value(Key::Str("doesNotExist"), &mut out).unwrap();
        assert_eq!(out, Value::Null);

        rw.write_value(Key::Str("doesNotExist"), &mut Value::from("y"))
            .unwrap();
        assert_eq!(rw.content(), Some(&Record::sample()));
        assert_eq!(rw.get_ordinal(Key::Str("doesNotExist")).unwrap(), None);
    }
}

#[test]
fn unknown_keys_raise_when_asked() {
    for registry in registries() {
        registry
            .update_options::<Record>(|options| options | Options::NOT_FOUND_ERROR)
            .unwrap();
        let mut rw = ObjectRw::<Record>::new_in(registry).unwrap();
        rw.initialize_with(Record::sample());

        let error = rw
            .read_value(Key::Str("doesNotExist"), &mut Value::Null)
            .unwrap_err();
        assert!(matches!(error, AccessError::MissingMember { key, .. } if key == "doesNotExist"));

        let error = rw
            .write_value(Key::Str("doesNotExist"), &mut Value::Null)
            .unwrap_err();
        assert!(matches!(error, AccessError::MissingMember { .. }));

        assert!(rw.get_ordinal(Key::Str("doesNotExist")).is_err());
    }
}

#[test]
fn private_fields_need_a_directive() {
    for registry in registries() {
        let schema = registry.schema::<Person>().unwrap();
        assert_eq!(schema.ordinal_of(Key::Str("secret")), None);

        let id = schema.member(0).unwrap();
        assert_eq!(id.name(), "id");
        assert!(!id.is_read_public());
        assert!(id.is_readable());
    }
}

// -----------------------------------------------------------------------------
// Deep dispatch

const CHAIN: usize = 20;

/// Name `i` of a chain: `i` times `a`, then `b`, then `c` up to `CHAIN` units.
///
/// Every split of these names peels off two of them, so the dispatch tree
/// runs out of depth before it runs out of names.
fn chain_name(i: usize) -> String {
    let mut name = "a".repeat(i);
    name.push('b');
    name.push_str(&"c".repeat(CHAIN - 1 - i));
    name
}

struct Chain {
    slots: Vec<u32>,
}

impl Accessible for Chain {
    fn declare(decl: &mut Declaration<Self>) {
        for i in 0..CHAIN {
            decl.property::<u32>(chain_name(i).leak())
                .getter(move |t| t.slots[i])
                .setter(move |t, v| t.slots[i] = v);
        }
        decl.constructor(|| Chain {
            slots: alloc::vec![0; CHAIN],
        });
    }
}

#[test]
fn deep_prefixes_fall_back_to_hashing() {
    assert!(CHAIN > 2 * MAX_DISPATCH_DEPTH);

    for registry in registries() {
        let mut rw = ObjectRw::<Chain>::new_in(registry).unwrap();
        rw.initialize().unwrap();

        for i in 0..CHAIN {
            let name = chain_name(i);
            rw.write_value(Key::Str(&name), &mut Value::UInt(i as u64))
                .unwrap();
        }
        assert_eq!(rw.content().unwrap().slots, (0..CHAIN as u32).collect::<Vec<_>>());

        for i in 0..CHAIN {
            let name = chain_name(i);
            let utf16: Vec<u16> = name.encode_utf16().collect();
            let ordinal = rw.get_ordinal(Key::Str(&name)).unwrap();
            assert!(ordinal.is_some());
            assert_eq!(rw.get_ordinal(Key::Utf8(name.as_bytes())).unwrap(), ordinal);
            assert_eq!(rw.get_ordinal(Key::Utf16(&utf16)).unwrap(), ordinal);

            let mut out = Value::Null;
            rw.read_value(Key::Utf16(&utf16), &mut out).unwrap();
            assert_eq!(out, Value::UInt(i as u64));
        }

        let stranger = "a".repeat(CHAIN);
        assert_eq!(rw.get_ordinal(Key::Str(&stranger)).unwrap(), None);
        let near = chain_name(CHAIN - 1).replace('b', "c");
        assert_eq!(rw.get_ordinal(Key::Str(&near)).unwrap(), None);
    }
}
