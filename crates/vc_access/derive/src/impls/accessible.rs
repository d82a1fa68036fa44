use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};

use crate::derive_data::{AccessField, AccessStruct};

/// Generates `impl Accessible`.
///
/// ```ignore
/// impl Accessible for Foo {
///     const OPTIONS: Option<Options> = Some(Options::DEFAULT.union(...));
///
///     fn declare(decl: &mut Declaration<Self>) {
///         decl.inherit::<Base>(|this| &this.base, |this| &mut this.base);
///         decl.field::<u32>("id", |this| &this.id, |this| &mut this.id)
///             .private()
///             .directive(RwField::new().name("ID"));
///         decl.constructor(<Self as Default>::default);
///         decl.allocator(|| Self { ... });
///     }
/// }
/// ```
pub(crate) fn impl_trait_accessible(info: &AccessStruct) -> TokenStream {
    let vc_access_path = info.vc_access_path();
    let macro_exports_ = crate::path::macro_exports_(vc_access_path);
    let accessible_ = crate::path::accessible_(vc_access_path);
    let options_ = crate::path::options_(vc_access_path);

    let ident = info.ident();
    let generics = info.bounded_generics();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let attrs = info.attrs();

    let options_tokens = attrs.options.as_ref().map(|flags| {
        quote! {
            const OPTIONS: ::core::option::Option<#options_> =
                ::core::option::Option::Some(#options_::DEFAULT #(.union(#options_::#flags))*);
        }
    });

    let base_tokens = info
        .fields()
        .iter()
        .filter(|field| field.attrs.base.is_some())
        .map(|field| {
            let field_ident = field.ident;
            let ty = field.ty;
            quote! {
                decl.inherit::<#ty>(|this| &this.#field_ident, |this| &mut this.#field_ident);
            }
        });

    let member_tokens = info
        .fields()
        .iter()
        .filter(|field| field.is_member())
        .map(|field| get_member_tokens(info, field));

    let constructor_tokens = if let Some(span) = attrs.default {
        quote_spanned! { span =>
            decl.constructor(<Self as ::core::default::Default>::default);
        }
    } else if let Some(path) = &attrs.constructor {
        quote! {
            decl.constructor(#path);
        }
    } else {
        TokenStream::new()
    };

    let zeroed = info.zeroed_expression();

    let restricted_tokens = attrs.restricted.map(|span| {
        quote_spanned! { span =>
            decl.restricted();
        }
    });

    quote! {
        impl #impl_generics #accessible_ for #ident #ty_generics #where_clause {
            #options_tokens

            fn declare(decl: &mut #macro_exports_::Declaration<Self>) {
                #(#base_tokens)*
                #(#member_tokens)*
                #constructor_tokens
                decl.allocator(|| #zeroed);
                #restricted_tokens
            }
        }
    }
}

fn get_member_tokens(info: &AccessStruct, field: &AccessField) -> TokenStream {
    let rw_field_ = crate::path::rw_field_(info.vc_access_path());

    let field_ident = field.ident;
    let ty = field.ty;
    let name = field.member_name();
    let attrs = &field.attrs;

    let private_tokens = (!field.is_public).then(|| quote!(.private()));

    let directive_tokens = attrs.directives.iter().map(|directive| {
        let rename = directive.rename.as_ref().map(|name| quote!(.name(#name)));
        let order = directive.order.as_ref().map(|order| quote!(.order(#order)));
        let skip_default = directive.skip_default.map(|_| quote!(.skip_default(true)));
        let must_read = directive.must_read.map(|_| quote!(.must_read(true)));
        let must_write = directive.must_write.map(|_| quote!(.must_write(true)));
        quote! {
            .directive(#rw_field_::new() #rename #order #skip_default #must_read #must_write)
        }
    });

    let convert_tokens = attrs
        .convert
        .as_ref()
        .map(|path| quote!(.convert(#path::into, #path::from)));

    quote! {
        decl.field::<#ty>(#name, |this| &this.#field_ident, |this| &mut this.#field_ident)
            #private_tokens
            #(#directive_tokens)*
            #convert_tokens;
    }
}
