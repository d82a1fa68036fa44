use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use core::fmt;

use crate::error::{AccessError, AccessResult};

// -----------------------------------------------------------------------------
// Key

/// A member key, in any of the four supported forms.
///
/// All string forms of the same logical name resolve to the same ordinal.
///
/// # Examples
///
/// ```
/// use vc_access::Key;
///
/// let utf16: Vec<u16> = "name".encode_utf16().collect();
///
/// assert_eq!(Key::from("name").to_text(), "name");
/// assert_eq!(Key::Utf16(&utf16).to_text(), "name");
/// assert_eq!(Key::Utf8(b"name").to_text(), "name");
/// assert_eq!(Key::from(3).to_text(), "3");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key<'a> {
    /// A native string.
    Str(&'a str),
    /// UTF-16 code units.
    Utf16(&'a [u16]),
    /// UTF-8 bytes, not necessarily validated.
    Utf8(&'a [u8]),
    /// A member ordinal or array index.
    Ordinal(usize),
}

/// The form of a [`Key`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Str,
    Utf16,
    Utf8,
    Ordinal,
}

impl<'a> Key<'a> {
    #[inline]
    pub const fn kind(&self) -> KeyKind {
        match self {
            Key::Str(_) => KeyKind::Str,
            Key::Utf16(_) => KeyKind::Utf16,
            Key::Utf8(_) => KeyKind::Utf8,
            Key::Ordinal(_) => KeyKind::Ordinal,
        }
    }

    /// Text form of the key, replacing invalid sequences.
    ///
    /// Ordinals are rendered in decimal.
    pub fn to_text(&self) -> Cow<'a, str> {
        match *self {
            Key::Str(s) => Cow::Borrowed(s),
            Key::Utf8(bytes) => String::from_utf8_lossy(bytes),
            Key::Utf16(units) => Cow::Owned(String::from_utf16_lossy(units)),
            Key::Ordinal(index) => Cow::Owned(index.to_string()),
        }
    }

    /// Slot of an array item written under this key, given `len` items so far.
    ///
    /// Ordinals may overwrite an item or append one; non-ordinal keys
    /// append. Gaps are rejected.
    pub(crate) fn array_slot(&self, len: usize) -> AccessResult<usize> {
        match *self {
            Key::Ordinal(index) if index > len => Err(AccessError::OutOfRange {
                value: index.to_string(),
                target: "array index",
            }),
            Key::Ordinal(index) => Ok(index),
            _ => Ok(len),
        }
    }
}

impl<'a> From<&'a str> for Key<'a> {
    #[inline]
    fn from(value: &'a str) -> Self {
        Key::Str(value)
    }
}

impl<'a> From<&'a String> for Key<'a> {
    #[inline]
    fn from(value: &'a String) -> Self {
        Key::Str(value)
    }
}

impl From<usize> for Key<'_> {
    #[inline]
    fn from(value: usize) -> Self {
        Key::Ordinal(value)
    }
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
