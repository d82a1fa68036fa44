//! Paths of the items generated code refers to.
//!
//! Everything goes through `__macro_exports`, so the layout of `vc_access`
//! can change without touching the generator.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// The path of `vc_access` as seen from the crate being compiled.
///
/// 1. `::vc_access` when the crate depends on it directly.
/// 2. `::vc_rw::access` when the crate depends on the `vc_rw` facade.
/// 3. `::vc_access` otherwise, which `vc_access` itself resolves through
///    `extern crate self`.
///
/// Reading the manifest is not cheap, call this once per derive.
pub(crate) fn vc_access() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_access"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn macro_exports_(vc_access_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_access_path::__macro_exports
    }
}

#[inline(always)]
pub(crate) fn accessible_(vc_access_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_access_path::__macro_exports::Accessible
    }
}

#[inline(always)]
pub(crate) fn access_value_(vc_access_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_access_path::__macro_exports::AccessValue
    }
}

#[inline(always)]
pub(crate) fn options_(vc_access_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_access_path::__macro_exports::Options
    }
}

#[inline(always)]
pub(crate) fn rw_field_(vc_access_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_access_path::__macro_exports::RwField
    }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn inventory_(vc_access_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_access_path::__macro_exports::inventory
    }
}
