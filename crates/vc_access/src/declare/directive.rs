use alloc::borrow::Cow;

/// An explicit serialization directive on a member.
///
/// A member carrying directives always participates, whatever its
/// visibility, static flag or the `OPT_IN` option. Each directive produces
/// its own member descriptor, so one member can be exposed under several
/// names.
///
/// Unset fields fall back to the member name and the type's options.
///
/// # Examples
///
/// ```
/// use vc_access::RwField;
///
/// let directive = RwField::new().name("ID").order(1).skip_default(true);
/// assert_eq!(directive.get_name(), Some("ID"));
/// assert_eq!(directive.get_order(), Some(1));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RwField {
    pub(crate) name: Option<Cow<'static, str>>,
    pub(crate) order: Option<i32>,
    pub(crate) skip_default: Option<bool>,
    pub(crate) must_read: Option<bool>,
    pub(crate) must_write: Option<bool>,
}

impl RwField {
    #[inline]
    pub const fn new() -> Self {
        Self {
            name: None,
            order: None,
            skip_default: None,
            must_read: None,
            must_write: None,
        }
    }

    /// The serialized name.
    #[inline]
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The order key; lower keys get lower ordinals.
    #[inline]
    pub const fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    #[inline]
    pub const fn skip_default(mut self, skip: bool) -> Self {
        self.skip_default = Some(skip);
        self
    }

    /// Whether reading the member while it is unreadable is an error.
    #[inline]
    pub const fn must_read(mut self, error: bool) -> Self {
        self.must_read = Some(error);
        self
    }

    /// Whether writing the member while it is unwritable is an error.
    #[inline]
    pub const fn must_write(mut self, error: bool) -> Self {
        self.must_write = Some(error);
        self
    }

    #[inline]
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub const fn get_order(&self) -> Option<i32> {
        self.order
    }
}
