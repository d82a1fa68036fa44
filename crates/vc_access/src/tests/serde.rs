use alloc::string::ToString;
use alloc::vec;

use super::values::{Customer, Line, Order};
use super::{Record, registries};
use crate::serde::{SerializeObject, deserialize_object_in};
use crate::{Options, Value};

#[test]
fn values_round_trip_through_json() {
    let json = r#"{"a":[1,-2,"s",null,true,1.5],"b":{}}"#;
    let value: Value = serde_json::from_str(json).unwrap();

    let object = value.as_object().unwrap();
    assert_eq!(
        object.get("a").and_then(Value::as_array).unwrap(),
        [
            Value::UInt(1),
            Value::Int(-2),
            Value::from("s"),
            Value::Null,
            Value::Bool(true),
            Value::Float(1.5),
        ],
    );
    assert_eq!(serde_json::to_string(&value).unwrap(), json);
}

#[test]
fn nested_objects_serialize_in_ordinal_order() {
    let order = Order {
        id: 7,
        customer: Customer {
            name: "Lin".to_string(),
        },
        lines: vec![Line {
            sku: "C-3".to_string(),
            qty: 5,
        }],
        note: Some("rush".to_string()),
    };

    for registry in registries() {
        let object = SerializeObject::new_in(registry, &order).unwrap();
        assert_eq!(
            serde_json::to_string(&object).unwrap(),
            r#"{"customer":{"name":"Lin"},"id":7,"lines":[{"qty":5,"sku":"C-3"}],"note":"rush"}"#,
        );

        let json = serde_json::to_string(&object).unwrap();
        let mut de = serde_json::Deserializer::from_str(&json);
        let back: Order = deserialize_object_in(registry, &mut de).unwrap();
        assert_eq!(back, order);
    }
}

#[test]
fn skipped_defaults_are_left_out_of_the_map() {
    for registry in registries() {
        registry
            .update_options::<Record>(|options| options | Options::SKIP_DEFAULT)
            .unwrap();
        let record = Record::sample();
        let object = SerializeObject::new_in(registry, &record).unwrap();
        assert_eq!(serde_json::to_string(&object).unwrap(), r#"{"Name":"x"}"#);
    }
}

#[test]
fn unknown_fields_follow_the_not_found_policy() {
    let json = r#"{"Id":3,"Bogus":true,"Name":"z"}"#;

    for registry in registries() {
        let mut de = serde_json::Deserializer::from_str(json);
        let record: Record = deserialize_object_in(registry, &mut de).unwrap();
        assert_eq!((record.id, record.name.as_str(), record.tag), (3, "z", 0));
    }

    for registry in registries() {
        registry
            .update_options::<Record>(|options| options | Options::NOT_FOUND_ERROR)
            .unwrap();
        let mut de = serde_json::Deserializer::from_str(json);
        let error = deserialize_object_in::<Record, _>(registry, &mut de).unwrap_err();
        assert!(error.to_string().contains("no member named `Bogus`"));
    }
}
