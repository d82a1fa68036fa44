use proc_macro2::TokenStream;

use crate::derive_data::AccessStruct;

/// Generate `auto_register` implementation
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(info: &AccessStruct) -> TokenStream {
    use quote::quote_spanned;

    let Some(span) = info.attrs().auto_register else {
        return TokenStream::new();
    };
    // Invalid for generic types.
    if info.is_generic() {
        return TokenStream::new();
    }

    let vc_access_path = info.vc_access_path();
    let macro_exports_ = crate::path::macro_exports_(vc_access_path);
    let inventory_ = crate::path::inventory_(vc_access_path);
    let ident = info.ident();

    quote_spanned! { span =>
        #inventory_::submit! {
            #macro_exports_::AutoRegistration::new(#macro_exports_::prepare::<#ident>)
        }
    }
}

/// Generate `auto_register` implementation
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &AccessStruct) -> TokenStream {
    TokenStream::new()
}
