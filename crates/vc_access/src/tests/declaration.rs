use alloc::string::String;
use alloc::vec::Vec;

use super::registries;
use super::lookup::Person;
use crate::info::MemberKind;
use crate::{AccessError, Accessible, Declaration, Key, ObjectRw, Options, RwField, Value};

// -----------------------------------------------------------------------------
// Naming

struct Clash {
    a: i32,
    b: i32,
}

impl Accessible for Clash {
    fn declare(decl: &mut Declaration<Self>) {
        decl.field::<i32>("a", |t| &t.a, |t| &mut t.a)
            .directive(RwField::new().name("key"));
        decl.field::<i32>("b", |t| &t.b, |t| &mut t.b)
            .directive(RwField::new().name("key"));
        decl.constructor(|| Clash { a: 0, b: 0 });
    }
}

#[test]
fn same_level_collisions_fail_the_build() {
    for registry in registries() {
        let error = registry.schema::<Clash>().unwrap_err();
        assert!(matches!(error, AccessError::NamingConflict { ref name, .. } if name == "key"));
        assert!(!registry.is_initialized::<Clash>());

        // A failed build leaves the options open.
        registry
            .set_options::<Clash>(Options::DEFAULT | Options::IGNORE_CASE)
            .unwrap();
        assert!(ObjectRw::<Clash>::new_in(registry).is_err());
    }
}

struct Shadow {
    a: i32,
    b: i32,
}

impl Accessible for Shadow {
    fn declare(decl: &mut Declaration<Self>) {
        decl.field::<i32>("a", |t| &t.a, |t| &mut t.a);
        decl.field::<i32>("b", |t| &t.b, |t| &mut t.b)
            .directive(RwField::new().name("a"));
        decl.constructor(|| Shadow { a: 1, b: 2 });
    }
}

#[test]
fn explicit_names_beat_implicit_ones() {
    for registry in registries() {
        let schema = registry.schema::<Shadow>().unwrap();
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.member(0).unwrap().name(), "b");

        let mut rw = ObjectRw::<Shadow>::new_in(registry).unwrap();
        rw.initialize().unwrap();
        let mut out = Value::Null;
        rw.read_value(Key::Str("a"), &mut out).unwrap();
        assert_eq!(out, Value::Int(2));
        assert_eq!(schema.ordinal_of(Key::Str("b")), None);
    }
}

#[derive(Accessible, Default)]
#[access(default)]
pub struct Alias {
    #[access(rename = "size")]
    #[access(rename = "len", order = 1)]
    pub value: u32,
}

#[test]
fn each_directive_publishes_a_name() {
    for registry in registries() {
        let schema = registry.schema::<Alias>().unwrap();
        let names: Vec<&str> = schema.members().iter().map(|m| m.serialized_name()).collect();
        assert_eq!(names, ["len", "size"]);
        assert!(schema.members().iter().all(|m| m.name() == "value"));

        let mut rw = ObjectRw::<Alias>::new_in(registry).unwrap();
        rw.initialize().unwrap();
        rw.write_value(Key::Str("size"), &mut Value::UInt(6)).unwrap();
        let mut out = Value::Null;
        rw.read_value(Key::Str("len"), &mut out).unwrap();
        assert_eq!(out, Value::UInt(6));
    }
}

// -----------------------------------------------------------------------------
// Inheritance

#[derive(Accessible, Default)]
#[access(default)]
pub struct Base {
    pub id: u32,
    pub name: String,
}

#[derive(Accessible, Default)]
#[access(default)]
pub struct Derived {
    #[access(base)]
    pub base: Base,
    pub name: String,
    pub extra: bool,
}

#[test]
fn derived_members_hide_base_members() {
    for registry in registries() {
        let schema = registry.schema::<Derived>().unwrap();
        let names: Vec<&str> = schema.members().iter().map(|m| m.serialized_name()).collect();
        assert_eq!(names, ["extra", "id", "name"]);

        let name = schema.member(2).unwrap();
        assert_eq!(name.depth(), 1);
        assert!(name.declaring_type().ends_with("Derived"));
        assert_eq!(schema.member(1).unwrap().depth(), 0);

        let mut rw = ObjectRw::<Derived>::new_in(registry).unwrap();
        rw.initialize().unwrap();
        rw.write_value(Key::Str("name"), &mut Value::from("derived"))
            .unwrap();
        rw.write_value(Key::Str("id"), &mut Value::Int(9)).unwrap();

        let content = rw.content().unwrap();
        assert_eq!(content.name, "derived");
        assert_eq!(content.base.name, "");
        assert_eq!(content.base.id, 9);
    }
}

#[derive(Accessible, Default)]
#[access(default)]
pub struct Leaf {
    #[access(base)]
    pub derived: Derived,
    pub name: String,
}

#[test]
fn the_most_derived_declaration_wins() {
    for registry in registries() {
        let schema = registry.schema::<Leaf>().unwrap();
        let names: Vec<&str> = schema.members().iter().map(|m| m.serialized_name()).collect();
        assert_eq!(names, ["extra", "id", "name"]);

        let name = schema.member(2).unwrap();
        assert_eq!(name.depth(), 2);
        assert!(name.declaring_type().ends_with("Leaf"));
        assert_eq!(schema.member(0).unwrap().depth(), 1);

        let mut rw = ObjectRw::<Leaf>::new_in(registry).unwrap();
        rw.initialize().unwrap();
        rw.write_value(Key::Str("name"), &mut Value::from("leaf")).unwrap();
        rw.write_value(Key::Str("extra"), &mut Value::Bool(true)).unwrap();

        let content = rw.content().unwrap();
        assert_eq!(content.name, "leaf");
        assert_eq!(content.derived.name, "");
        assert_eq!(content.derived.base.name, "");
        assert!(content.derived.extra);
    }
}

#[test]
fn inherited_members_follow_the_option() {
    for registry in registries() {
        registry
            .set_options::<Derived>(Options::DEFAULT - Options::INHERITED)
            .unwrap();
        let schema = registry.schema::<Derived>().unwrap();
        let names: Vec<&str> = schema.members().iter().map(|m| m.serialized_name()).collect();
        assert_eq!(names, ["extra", "name"]);
    }
}

// -----------------------------------------------------------------------------
// Selection

#[test]
fn opt_in_takes_directed_members_only() {
    for registry in registries() {
        registry
            .update_options::<Person>(|options| options | Options::OPT_IN)
            .unwrap();
        let schema = registry.schema::<Person>().unwrap();
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.member(0).unwrap().serialized_name(), "ID");
    }
}

struct Gadget {
    level: u8,
}

impl Accessible for Gadget {
    fn declare(decl: &mut Declaration<Self>) {
        decl.field::<u8>("level", |t| &t.level, |t| &mut t.level);
        decl.indexer::<u8>("Item");
        decl.property::<u32>("Count").static_member().getter(|_| 7);
        decl.property::<u32>("Version")
            .static_member()
            .getter(|_| 2)
            .directive(RwField::new());
        decl.constructor(|| Gadget { level: 1 });
    }
}

#[test]
fn indexers_and_undirected_statics_are_skipped() {
    for registry in registries() {
        let schema = registry.schema::<Gadget>().unwrap();
        let names: Vec<&str> = schema.members().iter().map(|m| m.serialized_name()).collect();
        assert_eq!(names, ["Version", "level"]);

        let version = schema.member(0).unwrap();
        assert!(version.is_static());
        assert_eq!(version.kind(), MemberKind::Property);
        assert!(version.is_readable());
        assert!(!version.is_writable());

        let mut rw = ObjectRw::<Gadget>::new_in(registry).unwrap();
        rw.initialize().unwrap();
        let mut out = Value::Null;
        rw.read_value(Key::Str("Version"), &mut out).unwrap();
        assert_eq!(out, Value::UInt(2));
    }
}

// -----------------------------------------------------------------------------
// Accessibility

struct Vault {
    open: u32,
    shut: u32,
    hidden: u32,
    shown: u32,
}

impl Accessible for Vault {
    fn declare(decl: &mut Declaration<Self>) {
        decl.ref_property::<u32>("open", |t| &t.open, |t| &mut t.open);
        decl.ref_property::<u32>("shut", |t| &t.shut, |t| &mut t.shut)
            .private_set();
        decl.ref_property::<u32>("hidden", |t| &t.hidden, |t| &mut t.hidden)
            .private_get();
        decl.ref_property::<u32>("shown", |t| &t.shown, |t| &mut t.shown)
            .private()
            .directive(RwField::new());
        decl.constructor(|| Vault {
            open: 0,
            shut: 0,
            hidden: 0,
            shown: 0,
        });
    }
}

#[test]
fn reference_properties_write_when_they_read() {
    for registry in registries() {
        let schema = registry.schema::<Vault>().unwrap();
        let names: Vec<&str> = schema.members().iter().map(|m| m.serialized_name()).collect();
        assert_eq!(names, ["open", "shown", "shut"]);
        for member in schema.members() {
            assert!(member.is_readable());
            assert!(member.is_writable());
        }

        let mut rw = ObjectRw::<Vault>::new_in(registry).unwrap();
        rw.initialize().unwrap();
        for (ordinal, name) in names.iter().enumerate() {
            let value = 10 + ordinal as u64;
            rw.write_value(Key::Str(name), &mut Value::UInt(value)).unwrap();
        }
        rw.write_value(Key::Str("hidden"), &mut Value::UInt(99)).unwrap();

        let vault = rw.content().unwrap();
        assert_eq!((vault.open, vault.shown, vault.shut), (10, 11, 12));
        assert_eq!(vault.hidden, 0);
    }
}


struct Thermostat {
    target: i32,
}

impl Accessible for Thermostat {
    fn declare(decl: &mut Declaration<Self>) {
        decl.property::<i32>("Target")
            .getter(|t| t.target)
            .setter(|t, v| t.target = v)
            .private_get();
        decl.property::<i32>("Reading").getter(|t| t.target * 10);
        decl.constructor(|| Thermostat { target: 0 });
    }
}

#[test]
fn inaccessible_members_are_silent_by_default() {
    for registry in registries() {
        let schema = registry.schema::<Thermostat>().unwrap();
        assert!(!schema.member(1).unwrap().is_readable());
        assert!(schema.member(1).unwrap().is_writable());

        let mut rw = ObjectRw::<Thermostat>::new_in(registry).unwrap();
        rw.initialize().unwrap();
        rw.write_value(Key::Str("Target"), &mut Value::Int(5)).unwrap();
        rw.write_value(Key::Str("Reading"), &mut Value::Int(1)).unwrap();

        let mut out = Value::Int(-1);
        rw.read_value(Key::Str("Target"), &mut out).unwrap();
        assert_eq!(out, Value::Null);
        rw.read_value(Key::Str("Reading"), &mut out).unwrap();
        assert_eq!(out, Value::Int(50));
    }
}

#[test]
fn inaccessible_members_raise_when_asked() {
    for registry in registries() {
        registry
            .update_options::<Thermostat>(|options| {
                options | Options::CANNOT_READ_ERROR | Options::CANNOT_WRITE_ERROR
            })
            .unwrap();
        let mut rw = ObjectRw::<Thermostat>::new_in(registry).unwrap();
        rw.initialize().unwrap();

        let error = rw
            .read_value(Key::Str("Target"), &mut Value::Null)
            .unwrap_err();
        assert!(matches!(error, AccessError::CannotRead { ref member, .. } if member == "Target"));

        let error = rw
            .write_value(Key::Str("Reading"), &mut Value::Int(1))
            .unwrap_err();
        assert!(matches!(error, AccessError::CannotWrite { ref member, .. } if member == "Reading"));
    }
}

struct Hollow;

impl Accessible for Hollow {
    fn declare(decl: &mut Declaration<Self>) {
        decl.property::<i32>("Missing");
        decl.constructor(|| Hollow);
    }
}

#[test]
fn members_without_accessors_are_rejected() {
    for registry in registries() {
        let error = registry.schema::<Hollow>().unwrap_err();
        assert!(matches!(error, AccessError::NoAccessor { member: "Missing", .. }));
    }
}

// -----------------------------------------------------------------------------
// Options

#[test]
fn options_freeze_once_built() {
    for registry in registries() {
        registry
            .set_options::<Person>(Options::DEFAULT | Options::SKIP_DEFAULT)
            .unwrap();
        registry.schema::<Person>().unwrap();

        let error = registry
            .set_options::<Person>(Options::DEFAULT)
            .unwrap_err();
        assert!(matches!(error, AccessError::AlreadyInitialized(_)));
        assert!(registry.update_options::<Person>(|o| o).is_err());
        assert!(registry.options::<Person>().contains(Options::SKIP_DEFAULT));
    }
}
