//! How a type describes its members.
//!
//! [`Accessible::declare`] fills a [`Declaration`] with fields, properties,
//! indexers, a base type, a constructor and an allocator. Member Discovery
//! later turns the declaration into ordered member descriptors, applying the
//! type's [`Options`](crate::Options).
//!
//! Most types use `#[derive(Accessible)]`; declaring by hand is needed for
//! properties, custom accessors and conversions the derive does not cover.
//!
//! # Examples
//!
//! ```
//! use vc_access::{Accessible, Declaration, ObjectRw, RwField, Value};
//!
//! pub struct Celsius {
//!     tenths: i32,
//!     pub label: String,
//! }
//!
//! impl Accessible for Celsius {
//!     fn declare(decl: &mut Declaration<Self>) {
//!         decl.field("label", |c| &c.label, |c| &mut c.label);
//!         decl.property::<f64>("degrees")
//!             .getter(|c| f64::from(c.tenths) / 10.0)
//!             .setter(|c, v| c.tenths = (v * 10.0) as i32);
//!         decl.field("tenths", |c| &c.tenths, |c| &mut c.tenths)
//!             .private()
//!             .directive(RwField::new().name("raw").order(-1));
//!         decl.constructor(|| Celsius { tenths: 0, label: String::new() });
//!     }
//! }
//!
//! let mut rw = ObjectRw::<Celsius>::new().unwrap();
//! rw.initialize_with(Celsius { tenths: 215, label: "room".into() });
//!
//! let mut out = Value::Null;
//! rw.read_value("degrees".into(), &mut out).unwrap();
//! assert_eq!(out, Value::Float(21.5));
//!
//! // Explicit order keys sort first.
//! assert_eq!(rw.get_ordinal("raw".into()).unwrap(), Some(0));
//! ```

// -----------------------------------------------------------------------------
// Modules

mod access;
mod accessible;
mod declaration;
mod directive;

// -----------------------------------------------------------------------------
// Exports

pub use accessible::Accessible;
pub use declaration::{Declaration, MemberBuilder};
pub use directive::RwField;

pub(crate) use access::{CompiledMember, MemberAccess, ReadEntryFn, ReadFn, WriteFn};
pub(crate) use declaration::{Ctor, Ctors, CustomKind, DeclParts, Level, MemberDecl};
