use bitflags::bitflags;

bitflags! {
    /// Per-type policy flags.
    ///
    /// Options are resolved once, when the schema of a type is built, and
    /// are frozen from then on; see
    /// [`Registry::set_options`](crate::Registry::set_options).
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_access::Options;
    ///
    /// let options = Options::default() | Options::IGNORE_CASE;
    /// assert!(options.contains(Options::FIELDS | Options::IGNORE_CASE));
    /// assert!(!options.contains(Options::SKIP_DEFAULT));
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Options: u32 {
        /// Match keys case-insensitively.
        const IGNORE_CASE = 1 << 0;
        /// Unknown keys raise [`AccessError::MissingMember`](crate::AccessError::MissingMember).
        ///
        /// Otherwise a read miss writes null and a write miss discards the value.
        const NOT_FOUND_ERROR = 1 << 1;
        /// Reading an unreadable member raises an error instead of writing null.
        const CANNOT_READ_ERROR = 1 << 2;
        /// Writing an unwritable member raises an error instead of discarding the value.
        const CANNOT_WRITE_ERROR = 1 << 3;
        /// Primitive members call the typed sink/source methods directly.
        const DIRECT_PRIMITIVES = 1 << 4;
        /// Include public fields.
        const FIELDS = 1 << 5;
        /// Include properties with a public accessor.
        const PROPERTIES = 1 << 6;
        /// Include members declared by base types.
        const INHERITED = 1 << 7;
        /// Omit members holding their type's zero value from bulk reads.
        const SKIP_DEFAULT = 1 << 8;
        /// Only members carrying an explicit directive participate.
        const OPT_IN = 1 << 9;
        /// Create objects with the zero-value allocator instead of the constructor.
        const ALLOCATE = 1 << 10;
        /// Access properties through their declared backing field.
        const BACKING_FIELDS = 1 << 11;
    }
}

impl Options {
    /// `FIELDS | PROPERTIES | INHERITED | DIRECT_PRIMITIVES`
    pub const DEFAULT: Self = Self::FIELDS
        .union(Self::PROPERTIES)
        .union(Self::INHERITED)
        .union(Self::DIRECT_PRIMITIVES);
}

impl Default for Options {
    /// [`Options::DEFAULT`]
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}
