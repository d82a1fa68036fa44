use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Expr, Ident, LitStr, Path};

use crate::ACCESS_ATTRIBUTE_NAME;

/// One explicit directive: the directive keys of a single `#[access(...)]`.
#[derive(Debug, Default)]
pub(crate) struct DirectiveAttributes {
    pub include: Option<Span>,
    pub rename: Option<LitStr>,
    pub order: Option<Expr>,
    pub skip_default: Option<Span>,
    pub must_read: Option<Span>,
    pub must_write: Option<Span>,
}

impl DirectiveAttributes {
    fn is_empty(&self) -> bool {
        self.include.is_none()
            && self.rename.is_none()
            && self.order.is_none()
            && self.skip_default.is_none()
            && self.must_read.is_none()
            && self.must_write.is_none()
    }
}

/// Attributes placed on a field, `#[access(...)]`.
///
/// Every attribute with directive keys adds one directive, so a field can
/// be published under several names.
#[derive(Debug, Default)]
pub(crate) struct FieldAttributes {
    pub directives: Vec<DirectiveAttributes>,
    pub ignore: Option<Span>,
    pub base: Option<Span>,
    pub convert: Option<Path>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if attr.path().is_ident(ACCESS_ATTRIBUTE_NAME) {
                let mut directive = DirectiveAttributes::default();
                attr.parse_nested_meta(|meta| this.parse_meta(&mut directive, meta))?;
                if !directive.is_empty() {
                    this.directives.push(directive);
                }
            }
        }
        this.validity()?;
        Ok(this)
    }

    fn parse_meta(&mut self, directive: &mut DirectiveAttributes, meta: ParseNestedMeta<'_>) -> syn::Result<()> {
        let span = meta.path.get_ident().map_or_else(Span::call_site, Ident::span);

        if meta.path.is_ident("include") {
            directive.include = Some(span);
        } else if meta.path.is_ident("rename") {
            directive.rename = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("order") {
            directive.order = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("skip_default") {
            directive.skip_default = Some(span);
        } else if meta.path.is_ident("must_read") {
            directive.must_read = Some(span);
        } else if meta.path.is_ident("must_write") {
            directive.must_write = Some(span);
        } else if meta.path.is_ident("ignore") {
            self.ignore = Some(span);
        } else if meta.path.is_ident("base") {
            self.base = Some(span);
        } else if meta.path.is_ident("convert") {
            self.convert = Some(meta.value()?.parse()?);
        } else {
            return Err(meta.error("unknown field attribute, expected one of `include`, `rename`, `order`, `skip_default`, `must_read`, `must_write`, `ignore`, `base`, `convert`"));
        }
        Ok(())
    }

    /// Whether the field carries an explicit directive.
    #[inline]
    pub fn is_directed(&self) -> bool {
        !self.directives.is_empty()
    }

    fn validity(&self) -> syn::Result<()> {
        if let Some(span) = self.ignore
            && (self.is_directed() || self.base.is_some() || self.convert.is_some())
        {
            return Err(syn::Error::new(
                span,
                "`ignore` cannot be combined with other field attributes",
            ));
        }
        if let Some(span) = self.base
            && (self.is_directed() || self.convert.is_some())
        {
            return Err(syn::Error::new(
                span,
                "a `base` field is not a member and takes no other field attributes",
            ));
        }
        Ok(())
    }
}
