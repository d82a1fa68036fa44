use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::AccessStruct;

/// Generates `impl AccessValue`, moving the struct as a nested object.
///
/// `is_default_value` is always `false`: a nested object is never skipped.
pub(crate) fn impl_access_value(info: &AccessStruct) -> TokenStream {
    let vc_access_path = info.vc_access_path();
    let macro_exports_ = crate::path::macro_exports_(vc_access_path);
    let access_value_ = crate::path::access_value_(vc_access_path);

    let ident = info.ident();
    let generics = info.bounded_generics();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let zeroed = info.zeroed_expression();

    quote! {
        impl #impl_generics #access_value_ for #ident #ty_generics #where_clause {
            #[inline]
            fn write_value(
                &self,
                writer: &mut dyn #macro_exports_::ValueWriter,
                registry: &'static #macro_exports_::Registry,
            ) -> #macro_exports_::AccessResult {
                #macro_exports_::write_object::<Self>(self, writer, registry)
            }

            #[inline]
            fn read_value(
                reader: &mut dyn #macro_exports_::ValueReader,
                registry: &'static #macro_exports_::Registry,
            ) -> #macro_exports_::AccessResult<Self> {
                #macro_exports_::read_object::<Self>(reader, registry)
            }

            #[inline]
            fn is_default_value(&self) -> bool {
                false
            }

            fn zeroed() -> Self {
                #zeroed
            }
        }
    }
}
