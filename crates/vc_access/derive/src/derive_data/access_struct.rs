use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Field, Fields, Generics, Ident, Path, Type, Visibility};

use super::{FieldAttributes, TypeAttributes};

// -----------------------------------------------------------------------------
// AccessField

pub(crate) struct AccessField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
    pub is_public: bool,
}

impl<'a> AccessField<'a> {
    fn parse(field: &'a Field) -> syn::Result<Self> {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;
        Ok(Self {
            ident,
            ty: &field.ty,
            attrs: FieldAttributes::parse_attrs(&field.attrs)?,
            is_public: matches!(field.vis, Visibility::Public(_)),
        })
    }

    /// The member name, without any raw identifier prefix.
    pub fn member_name(&self) -> String {
        self.ident.unraw().to_string()
    }

    #[inline]
    pub fn is_member(&self) -> bool {
        self.attrs.ignore.is_none() && self.attrs.base.is_none()
    }
}

// -----------------------------------------------------------------------------
// AccessStruct

pub(crate) struct AccessStruct<'a> {
    vc_access_path: Path,
    attrs: TypeAttributes,
    ident: &'a Ident,
    generics: &'a Generics,
    fields: Vec<AccessField<'a>>,
}

impl<'a> AccessStruct<'a> {
    pub fn parse(ast: &'a DeriveInput) -> syn::Result<Self> {
        let fields = match &ast.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named
                    .named
                    .iter()
                    .map(AccessField::parse)
                    .collect::<syn::Result<Vec<_>>>()?,
                Fields::Unit => Vec::new(),
                Fields::Unnamed(unnamed) => {
                    return Err(syn::Error::new(
                        unnamed.span(),
                        "`Accessible` cannot be derived for tuple structs, members need names",
                    ));
                }
            },
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span,
                    "`Accessible` can only be derived for structs",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span,
                    "`Accessible` can only be derived for structs",
                ));
            }
        };

        if let Some(span) = fields.iter().filter_map(|field| field.attrs.base).nth(1) {
            return Err(syn::Error::new(span, "only one field can be marked `base`"));
        }

        Ok(Self {
            vc_access_path: crate::path::vc_access(),
            attrs: TypeAttributes::parse_attrs(&ast.attrs)?,
            ident: &ast.ident,
            generics: &ast.generics,
            fields,
        })
    }

    #[inline]
    pub fn vc_access_path(&self) -> &Path {
        &self.vc_access_path
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn ident(&self) -> &Ident {
        self.ident
    }

    #[inline]
    pub fn fields(&self) -> &[AccessField<'a>] {
        &self.fields
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        self.generics.type_params().next().is_some() || self.generics.const_params().next().is_some()
    }

    /// Generics with the bounds required by the generated impls.
    ///
    /// Type parameters must be shareable and `'static`. Member types must
    /// implement `AccessValue`, base types also `Accessible`.
    pub fn bounded_generics(&self) -> Generics {
        let mut generics = self.generics.clone();
        if !self.is_generic() {
            return generics;
        }

        let accessible_ = crate::path::accessible_(&self.vc_access_path);
        let access_value_ = crate::path::access_value_(&self.vc_access_path);
        let params: Vec<Ident> = generics.type_params().map(|param| param.ident.clone()).collect();

        let where_clause = generics.make_where_clause();
        for param in params {
            where_clause
                .predicates
                .push(syn::parse_quote!(#param: ::core::marker::Send + ::core::marker::Sync + 'static));
        }
        for field in &self.fields {
            let ty = field.ty;
            if field.attrs.base.is_some() {
                where_clause
                    .predicates
                    .push(syn::parse_quote!(#ty: #accessible_ + #access_value_));
            } else if field.attrs.ignore.is_some() {
                where_clause
                    .predicates
                    .push(syn::parse_quote!(#ty: ::core::default::Default));
            } else {
                where_clause.predicates.push(syn::parse_quote!(#ty: #access_value_));
            }
        }
        generics
    }

    /// `Self { field: zero, ... }`, with every field at its zero value.
    pub fn zeroed_expression(&self) -> TokenStream {
        let access_value_ = crate::path::access_value_(&self.vc_access_path);
        let inits = self.fields.iter().map(|field| {
            let ident = field.ident;
            let ty = field.ty;
            if field.attrs.ignore.is_some() {
                quote!(#ident: <#ty as ::core::default::Default>::default())
            } else {
                quote!(#ident: <#ty as #access_value_>::zeroed())
            }
        });
        quote! {
            Self { #(#inits),* }
        }
    }
}
