use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Ident, LitBool, Path};

use crate::ACCESS_ATTRIBUTE_NAME;

/// Attributes placed on the type, `#[access(...)]`.
#[derive(Debug)]
pub(crate) struct TypeAttributes {
    pub default: Option<Span>,
    pub constructor: Option<Path>,
    pub restricted: Option<Span>,
    pub auto_register: Option<Span>,
    /// Flags added to `Options::DEFAULT`; `None` keeps the registry's options.
    pub options: Option<Vec<Ident>>,
    /// Default is `true`, use `#[access(AccessValue = false)]` to disable it.
    pub impl_access_value: bool,
}

impl Default for TypeAttributes {
    fn default() -> Self {
        Self {
            default: None,
            constructor: None,
            restricted: None,
            auto_register: None,
            options: None,
            impl_access_value: true,
        }
    }
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if attr.path().is_ident(ACCESS_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
            }
        }
        this.validity()?;
        Ok(this)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta<'_>) -> syn::Result<()> {
        let span = meta.path.get_ident().map_or_else(Span::call_site, Ident::span);

        if meta.path.is_ident("default") {
            self.default = Some(span);
        } else if meta.path.is_ident("constructor") {
            self.constructor = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("restricted") {
            self.restricted = Some(span);
        } else if meta.path.is_ident("auto_register") {
            self.auto_register = Some(span);
        } else if meta.path.is_ident("options") {
            let flags = self.options.get_or_insert_with(Vec::new);
            meta.parse_nested_meta(|flag| match flag.path.get_ident() {
                Some(ident) => {
                    flags.push(ident.clone());
                    Ok(())
                }
                None => Err(flag.error("expected an `Options` flag, such as `IGNORE_CASE`")),
            })?;
        } else if meta.path.is_ident("AccessValue") {
            self.impl_access_value = meta.value()?.parse::<LitBool>()?.value;
        } else {
            return Err(meta.error("unknown type attribute, expected one of `default`, `constructor`, `restricted`, `auto_register`, `options`, `AccessValue`"));
        }
        Ok(())
    }

    fn validity(&self) -> syn::Result<()> {
        if let (Some(span), Some(_)) = (self.default, &self.constructor) {
            return Err(syn::Error::new(
                span,
                "`default` and `constructor` cannot be used together",
            ));
        }
        Ok(())
    }
}
