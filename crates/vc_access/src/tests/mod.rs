//! Behavior shared by the compiled and reflective paths.
//!
//! Every scenario runs against both flavours through [`registries`]; each
//! call hands out fresh registries so options never leak between tests.

use alloc::string::String;

use crate::{Accessible, Registry, RegistryConfig};

mod bulk;
mod declaration;
mod lookup;
mod serde;
mod values;

/// A compiled and a reflective registry, both isolated.
fn registries() -> [&'static Registry; 2] {
    [
        Registry::new(RegistryConfig::default()).leak(),
        Registry::new(RegistryConfig::default().reflective()).leak(),
    ]
}

#[derive(Accessible, Default, Debug, Clone, PartialEq)]
#[access(default)]
pub struct Record {
    #[access(rename = "Id")]
    pub id: i32,
    #[access(rename = "Name")]
    pub name: String,
    #[access(rename = "Tag")]
    pub tag: i32,
}

impl Record {
    fn sample() -> Self {
        Self {
            id: 0,
            name: "x".into(),
            tag: 0,
        }
    }
}
