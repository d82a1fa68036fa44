//! Bridges object readers/writers and `serde`.
//!
//! - [`Value`](crate::Value) implements `Serialize` and `Deserialize`.
//! - [`SerializeObject`] serializes any [`Accessible`](crate::Accessible)
//!   value as a map, streaming members in ordinal order through its reader.
//! - [`deserialize_object`] builds an `Accessible` value from any
//!   self-describing format, through its writer.
//!
//! Neither side requires the type to implement `serde` traits.
//!
//! # Examples
//!
//! ```
//! use vc_access::Accessible;
//! use vc_access::serde::{SerializeObject, deserialize_object};
//!
//! #[derive(Accessible, Default, Debug, PartialEq)]
//! #[access(default)]
//! pub struct Point {
//!     pub x: i32,
//!     pub y: i32,
//! }
//!
//! let point = Point { x: 1, y: -2 };
//! let json = serde_json::to_string(&SerializeObject::new(&point).unwrap()).unwrap();
//! assert_eq!(json, r#"{"x":1,"y":-2}"#);
//!
//! let mut de = serde_json::Deserializer::from_str(r#"{"y":5,"x":4}"#);
//! let back: Point = deserialize_object(&mut de).unwrap();
//! assert_eq!(back, Point { x: 4, y: 5 });
//! ```

// -----------------------------------------------------------------------------
// Modules

mod de;
mod ser;

// -----------------------------------------------------------------------------
// Exports

pub use de::{deserialize_object, deserialize_object_in};
pub use ser::SerializeObject;
