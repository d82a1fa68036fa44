use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use super::{Record, registries};
use crate::plan::{AccessStrategy, ValueRoute};
use crate::value::{DataReader, DataWriter, Primitive, PrimitiveKind, read_dispatch};
use crate::value::{ValueInterface, ValueObject, ValueReader, ValueWriter};
use crate::{AccessError, AccessResult, Accessible, Declaration, Key, ObjectRw, Options, Registry};
use crate::{RegistryConfig, StopToken, Value};

// -----------------------------------------------------------------------------
// Ordinal round-trip

#[test]
fn ordinal_writes_read_back() {
    for registry in registries() {
        let mut rw = ObjectRw::<Record>::new_in(registry).unwrap();
        rw.initialize().unwrap();

        let inputs = [Value::Int(7), Value::from("seven"), Value::Int(-7)];
        for (ordinal, input) in inputs.iter().enumerate() {
            rw.write_value(Key::Ordinal(ordinal), &mut input.clone())
                .unwrap();
            let mut out = Value::Null;
            rw.read_value(Key::Ordinal(ordinal), &mut out).unwrap();
            assert_eq!(&out, input);
        }
    }
}

#[test]
fn mismatched_values_are_reported() {
    for registry in registries() {
        let mut rw = ObjectRw::<Record>::new_in(registry).unwrap();
        rw.initialize().unwrap();

        let error = rw
            .write_value(Key::Str("Id"), &mut Value::from("nope"))
            .unwrap_err();
        assert!(matches!(error, AccessError::TypeMismatch { .. }));

        let error = rw
            .write_value(Key::Str("Id"), &mut Value::Int(i64::MAX))
            .unwrap_err();
        assert!(matches!(error, AccessError::OutOfRange { .. }));
    }
}

#[test]
fn unbound_instances_refuse_access() {
    let registry = Registry::new(RegistryConfig::default()).leak();
    let mut rw = ObjectRw::<Record>::new_in(registry).unwrap();
    let error = rw
        .write_value(Key::Str("Id"), &mut Value::Int(1))
        .unwrap_err();
    assert!(matches!(error, AccessError::Unbound(_)));
}

// -----------------------------------------------------------------------------
// Converting accessors

mod tenths {
    pub fn into(raw: &i32) -> f64 {
        f64::from(*raw) / 10.0
    }

    pub fn from(value: f64) -> i32 {
        (value * 10.0).round() as i32
    }
}

#[derive(Accessible, Default)]
#[access(default)]
pub struct Reading {
    #[access(convert = tenths)]
    pub celsius: i32,
}

#[test]
fn converting_accessors_expose_the_converted_type() {
    for registry in registries() {
        let schema = registry.schema::<Reading>().unwrap();
        let member = schema.member(0).unwrap();
        assert!(member.before_type().is::<i32>());
        assert!(member.after_type().is::<f64>());
        assert_eq!(schema.plan(0).unwrap().strategy(), AccessStrategy::Converting);

        let mut rw = ObjectRw::<Reading>::new_in(registry).unwrap();
        rw.initialize_with(Reading { celsius: 215 });

        let mut out = Value::Null;
        rw.read_value(Key::Str("celsius"), &mut out).unwrap();
        assert_eq!(out, Value::Float(21.5));

        rw.write_value(Key::Str("celsius"), &mut Value::Float(3.2))
            .unwrap();
        assert_eq!(rw.content().unwrap().celsius, 32);
    }
}

// -----------------------------------------------------------------------------
// Custom accessors

struct Label {
    parts: Vec<String>,
    x: i32,
    y: i32,
}

impl Accessible for Label {
    fn declare(decl: &mut Declaration<Self>) {
        decl.property::<Vec<String>>("text").custom::<String>(
            |t| t.parts.join(" "),
            |t, v| t.parts = v.split(' ').map(String::from).collect(),
        );
        decl.property::<String>("at").custom_interface(
            |t, writer, _| writer.write_str(&format!("{},{}", t.x, t.y)),
            |t, reader, _| {
                let text = reader.read_string()?;
                let invalid = || AccessError::Custom(format!("`{text}` is not `x,y`"));
                let (x, y) = text.split_once(',').ok_or_else(invalid)?;
                t.x = x.parse().map_err(|_| invalid())?;
                t.y = y.parse().map_err(|_| invalid())?;
                Ok(())
            },
        );
        decl.constructor(|| Label {
            parts: Vec::new(),
            x: 0,
            y: 0,
        });
    }
}

#[test]
fn custom_accessors_replace_the_member() {
    for registry in registries() {
        let schema = registry.schema::<Label>().unwrap();
        assert_eq!(schema.plan(0).unwrap().strategy(), AccessStrategy::Interface);
        assert_eq!(schema.plan(1).unwrap().strategy(), AccessStrategy::Custom);
        assert!(schema.member(1).unwrap().after_type().is::<String>());

        let mut rw = ObjectRw::<Label>::new_in(registry).unwrap();
        rw.initialize().unwrap();
        rw.write_value(Key::Str("text"), &mut Value::from("hello world"))
            .unwrap();
        rw.write_value(Key::Str("at"), &mut Value::from("3,-4")).unwrap();

        let label = rw.content().unwrap();
        assert_eq!(label.parts, ["hello", "world"]);
        assert_eq!((label.x, label.y), (3, -4));

        let mut out = Value::Null;
        rw.read_value(Key::Str("at"), &mut out).unwrap();
        assert_eq!(out, Value::from("3,-4"));

        let error = rw
            .write_value(Key::Str("at"), &mut Value::from("3;4"))
            .unwrap_err();
        assert!(matches!(error, AccessError::Custom(_)));
    }
}

// -----------------------------------------------------------------------------
// Backing fields

struct Gauge {
    raw: u16,
}

impl Accessible for Gauge {
    fn declare(decl: &mut Declaration<Self>) {
        decl.property::<u16>("level")
            .getter(|t| t.raw * 2)
            .setter(|t, v| t.raw = v / 2)
            .backing_field(|t| &t.raw, |t| &mut t.raw);
        decl.constructor(|| Gauge { raw: 5 });
    }
}

#[test]
fn backing_fields_bypass_property_logic() {
    for registry in registries() {
        let mut rw = ObjectRw::<Gauge>::new_in(registry).unwrap();
        rw.initialize().unwrap();
        let mut out = Value::Null;
        rw.read_value(Key::Str("level"), &mut out).unwrap();
        assert_eq!(out, Value::UInt(10));
    }

    for registry in registries() {
        registry
            .update_options::<Gauge>(|options| options | Options::BACKING_FIELDS)
            .unwrap();
        let schema = registry.schema::<Gauge>().unwrap();
        assert_eq!(schema.plan(0).unwrap().strategy(), AccessStrategy::BackingField);

        let mut rw = ObjectRw::<Gauge>::new_in(registry).unwrap();
        rw.initialize().unwrap();
        let mut out = Value::Null;
        rw.read_value(Key::Str("level"), &mut out).unwrap();
        assert_eq!(out, Value::UInt(5));

        rw.write_value(Key::Str("level"), &mut Value::UInt(8)).unwrap();
        assert_eq!(rw.content().unwrap().raw, 8);
    }
}

// -----------------------------------------------------------------------------
// Construction

#[derive(Accessible)]
#[access(constructor = Session::fresh)]
pub struct Session {
    pub user: String,
    pub hits: u32,
}

impl Session {
    fn fresh() -> Self {
        Self {
            user: "guest".to_string(),
            hits: 1,
        }
    }
}

#[test]
fn allocate_prefers_zero_values() {
    for registry in registries() {
        let mut rw = ObjectRw::<Session>::new_in(registry).unwrap();
        rw.initialize().unwrap();
        assert_eq!(rw.content().unwrap().user, "guest");
    }

    for registry in registries() {
        registry
            .update_options::<Session>(|options| options | Options::ALLOCATE)
            .unwrap();
        let mut rw = ObjectRw::<Session>::new_in(registry).unwrap();
        rw.initialize().unwrap();
        let session = rw.content().unwrap();
        assert_eq!((session.user.as_str(), session.hits), ("", 0));
    }
}

struct Bare {
    flag: bool,
}

impl Accessible for Bare {
    fn declare(decl: &mut Declaration<Self>) {
        decl.field::<bool>("flag", |t| &t.flag, |t| &mut t.flag);
    }
}

#[test]
fn types_without_constructors_cannot_initialize() {
    for registry in registries() {
        let mut rw = ObjectRw::<Bare>::new_in(registry).unwrap();
        assert!(matches!(rw.initialize(), Err(AccessError::NoConstructor(_))));

        rw.initialize_with(Bare { flag: true });
        let mut out = Value::Null;
        rw.read_value(Key::Str("flag"), &mut out).unwrap();
        assert_eq!(out, Value::Bool(true));
    }
}

// -----------------------------------------------------------------------------
// Nesting

#[derive(Accessible, Default, Debug, Clone, PartialEq)]
#[access(default)]
pub struct Customer {
    pub name: String,
}

#[derive(Accessible, Default, Debug, Clone, PartialEq)]
#[access(default)]
pub struct Line {
    pub sku: String,
    pub qty: u16,
}

#[derive(Accessible, Default, Debug, Clone, PartialEq)]
#[access(default)]
pub struct Order {
    pub id: u64,
    pub customer: Customer,
    pub lines: Vec<Line>,
    pub note: Option<String>,
}

#[test]
fn nested_objects_round_trip() {
    let order = Order {
        id: 42,
        customer: Customer {
            name: "Ada".into(),
        },
        lines: vec![
            Line {
                sku: "A-1".into(),
                qty: 2,
            },
            Line {
                sku: "B-7".into(),
                qty: 1,
            },
        ],
        note: None,
    };

    for registry in registries() {
        let value = registry.to_value(&order).unwrap();
        let object = value.as_object().unwrap();
        let keys: Vec<&str> = object.keys().collect();
        assert_eq!(keys, ["customer", "id", "lines", "note"]);
        assert_eq!(object.get("note"), Some(&Value::Null));
        assert_eq!(
            object.get("customer").and_then(Value::as_object).and_then(|c| c.get("name")),
            Some(&Value::from("Ada")),
        );
        assert_eq!(object.get("lines").and_then(Value::as_array).map(<[_]>::len), Some(2));

        let back: Order = registry.from_value(&value).unwrap();
        assert_eq!(back, order);
    }
}

// -----------------------------------------------------------------------------
// Interface overrides

struct Hex;

impl ValueInterface<i16> for Hex {
    fn write_value(&self, value: &i16, writer: &mut dyn ValueWriter, _: &'static Registry) -> AccessResult {
        writer.write_str(&format!("{value:#x}"))
    }

    fn read_value(&self, reader: &mut dyn ValueReader, _: &'static Registry) -> AccessResult<i16> {
        let text = reader.read_string()?;
        i16::from_str_radix(text.trim_start_matches("0x"), 16)
            .map_err(|error| AccessError::Custom(error.to_string()))
    }
}

#[derive(Accessible, Default, Debug, PartialEq)]
#[access(default)]
pub struct Pixel {
    pub x: i16,
    pub y: i16,
}

#[test]
fn interface_overrides_take_the_member_off_the_direct_path() {
    let [plain, _] = registries();
    assert_eq!(
        plain.schema::<Pixel>().unwrap().plan(0).unwrap().route(),
        ValueRoute::Direct(PrimitiveKind::I16),
    );
    let value = plain.to_value(&Pixel { x: 255, y: 1 }).unwrap();
    assert_eq!(value.as_object().unwrap().get("x"), Some(&Value::Int(255)));

    for registry in registries() {
        registry.set_interface::<i16>(Hex);
        assert!(registry.has_interface::<i16>());
        let schema = registry.schema::<Pixel>().unwrap();
        assert_eq!(schema.plan(0).unwrap().route(), ValueRoute::Interface);

        let value = registry.to_value(&Pixel { x: 255, y: 1 }).unwrap();
        assert_eq!(value.as_object().unwrap().get("x"), Some(&Value::from("0xff")));

        let source: ValueObject = [
            ("x".to_string(), Value::from("0x10")),
            ("y".to_string(), Value::from("0x2")),
        ]
        .into_iter()
        .collect();
        let pixel: Pixel = registry.from_value(&Value::Object(source)).unwrap();
        assert_eq!(pixel, Pixel { x: 16, y: 2 });
    }
}

#[test]
fn late_overrides_leave_built_schemas_alone() {
    let pixel = Pixel { x: 255, y: 1 };
    let outputs = registries().map(|registry| {
        let schema = registry.schema::<Pixel>().unwrap();
        registry.set_interface::<i16>(Hex);
        assert_eq!(
            schema.plan(0).unwrap().route(),
            ValueRoute::Direct(PrimitiveKind::I16),
        );

        let value = registry.to_value(&pixel).unwrap();
        assert_eq!(value.as_object().unwrap().get("x"), Some(&Value::Int(255)));

        let mut rw = ObjectRw::<Pixel>::new_in(registry).unwrap();
        rw.initialize().unwrap();
        rw.write_value(Key::Str("y"), &mut Value::Int(16)).unwrap();
        assert_eq!(rw.content().unwrap().y, 16);
        value
    });
    assert_eq!(outputs[0], outputs[1]);
}

// -----------------------------------------------------------------------------
// Array slots

/// An array of one item, handed out under the ordinal `index`.
struct Sparse {
    index: usize,
    item: Value,
}

impl DataReader for Sparse {
    fn len(&self) -> usize {
        1
    }

    fn entry(&mut self, key: Key<'_>) -> AccessResult<Option<&mut dyn ValueReader>> {
        Ok((key == Key::Ordinal(self.index)).then_some(&mut self.item as &mut dyn ValueReader))
    }

    fn read_value(&mut self, _: Key<'_>, writer: &mut dyn ValueWriter) -> AccessResult {
        self.item.write_into(writer)
    }

    fn read_all(&mut self, writer: &mut dyn DataWriter, _: &StopToken) -> AccessResult {
        writer.write_value(Key::Ordinal(self.index), &mut self.item)
    }
}

impl ValueReader for Sparse {
    fn is_null(&mut self) -> AccessResult<bool> {
        Ok(false)
    }

    fn read_primitive(&mut self, _: PrimitiveKind) -> AccessResult<Primitive<'static>> {
        Err(AccessError::Unsupported("primitives from an array"))
    }

    fn read_object(&mut self, _: &mut dyn DataWriter) -> AccessResult {
        Err(AccessError::Unsupported("objects from an array"))
    }

    fn read_array(&mut self, writer: &mut dyn DataWriter) -> AccessResult {
        writer.initialize(Some(1))?;
        self.read_all(writer, &StopToken::none())
    }

    fn read_direct(&mut self) -> AccessResult<Value> {
        let mut value = Value::Null;
        value.write_array(self)?;
        Ok(value)
    }
}

#[test]
fn array_items_cannot_leave_gaps() {
    let registry = Registry::new(RegistryConfig::default()).leak();

    for index in [2, 1 << 40, usize::MAX] {
        let mut sparse = Sparse {
            index,
            item: Value::Int(7),
        };
        let error = Value::Null.write_array(&mut sparse).unwrap_err();
        assert!(matches!(error, AccessError::OutOfRange { target: "array index", .. }));

        let error = read_dispatch::<Vec<i32>>(&mut sparse, registry).unwrap_err();
        assert!(matches!(error, AccessError::OutOfRange { ref value, .. } if *value == index.to_string()));
    }

    let mut sparse = Sparse {
        index: 0,
        item: Value::Int(7),
    };
    let mut value = Value::Null;
    value.write_array(&mut sparse).unwrap();
    assert_eq!(value, Value::Array(vec![Value::Int(7)]));
    assert_eq!(read_dispatch::<Vec<i32>>(&mut sparse, registry).unwrap(), [7]);
}
