// -----------------------------------------------------------------------------
// Modules

mod access_value;
mod accessible;
mod auto_register;

// -----------------------------------------------------------------------------
// Internal API

use access_value::impl_access_value;
use accessible::impl_trait_accessible;
use auto_register::get_auto_register_impl;

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::AccessStruct;

/// Implement `Accessible`, and `AccessValue` unless disabled.
pub(crate) fn impl_accessible(info: &AccessStruct) -> TokenStream {
    let accessible_tokens = impl_trait_accessible(info);

    let access_value_tokens = if info.attrs().impl_access_value {
        impl_access_value(info)
    } else {
        TokenStream::new()
    };

    let auto_register_tokens = get_auto_register_impl(info);

    quote! {
        #accessible_tokens

        #access_value_tokens

        #auto_register_tokens
    }
}
