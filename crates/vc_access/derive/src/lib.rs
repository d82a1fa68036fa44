//! See [`Accessible`](derive_accessible).
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static ACCESS_ATTRIBUTE_NAME: &str = "access";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Derive `Accessible`
///
/// `#[derive(Accessible)]` on a struct with named fields implements:
///
/// - `Accessible`, declaring every field as a member;
/// - `AccessValue`, so the struct can be nested in other accessible types.
///
/// Private fields are declared as non-public members: the ambient policy
/// excludes them unless they carry a field attribute.
///
/// ## Type Attributes
///
/// ```rust, ignore
/// #[derive(Accessible)]
/// #[access(default, auto_register, options(IGNORE_CASE, SKIP_DEFAULT))]
/// struct Foo { /* ... */ }
/// ```
///
/// - `default`: construct objects with `Default::default`.
/// - `constructor = path`: construct objects with `path()`.
/// - `restricted`: never use the compiled reader/writer for this type.
/// - `auto_register`: collect the type for `Registry::auto_register`.
///   No effect on generic types, or without the `auto_register` feature.
/// - `options(FLAG, ...)`: flags added to `Options::default()` for this type.
/// - `AccessValue = false`: skip the `AccessValue` implementation, so a
///   hand-written one can be provided.
///
/// An allocator building the struct from zero values is always declared,
/// used under `Options::ALLOCATE` or when no constructor exists.
///
/// ## Field Attributes
///
/// ```rust, ignore
/// #[derive(Accessible)]
/// struct Foo {
///     #[access(rename = "ID", order = -1)]
///     id: u64,
///     #[access(ignore)]
///     cache: Vec<u8>,
///     #[access(base)]
///     base: Bar,
/// }
/// ```
///
/// Attributes that make the field an explicitly directed member. Each
/// `#[access(...)]` carrying one of them is a separate directive, so
/// repeating the attribute publishes the field under several names:
///
/// - `include`: participate with default settings.
/// - `rename = "name"`: the serialized name.
/// - `order = n`: the sort key; members without one use `DEFAULT_ORDER` (`999`).
/// - `skip_default`: omit the field from bulk reads while it holds its zero value.
///   Derived types never count as zero, so nested objects are always written.
/// - `must_read` / `must_write`: raise an error if the member cannot be read/written.
///
/// Other field attributes:
///
/// - `ignore`: the field is not declared. It is zero-allocated with `Default::default`.
/// - `base`: the field holds a base type; its members are inherited.
/// - `convert = path`: expose the field through `path::into(&V) -> U` and
///   `path::from(U) -> V`.
#[proc_macro_derive(Accessible, attributes(access))]
pub fn derive_accessible(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    derive_data::AccessStruct::parse(&ast)
        .map(|info| impls::impl_accessible(&info))
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
