use alloc::boxed::Box;
use alloc::vec::Vec;

// -----------------------------------------------------------------------------
// KeySpan

/// Position of one key inside a packed buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeySpan {
    pub offset: usize,
    pub len: usize,
}

impl KeySpan {
    #[inline]
    pub const fn range(self) -> core::ops::Range<usize> {
        self.offset..self.offset + self.len
    }
}

// -----------------------------------------------------------------------------
// KeyTable

/// Serialized member names in three parallel forms, indexed by ordinal.
///
/// The UTF-16 and UTF-8 forms each live in one buffer sized exactly to the
/// sum of all names; [`KeySpan`]s address the individual keys. The buffers
/// are never resized after construction.
///
/// # Examples
///
/// ```
/// use vc_access::info::KeyTable;
///
/// let table = KeyTable::build(["Id", "Name", "é"]);
///
/// assert_eq!(table.len(), 3);
/// assert_eq!(table.utf16_buffer().len(), 2 + 4 + 1);
/// assert_eq!(table.utf8_buffer().len(), 2 + 4 + 2);
/// assert_eq!(table.utf8_at(1), b"Name");
/// assert_eq!(table.str_at(2), "é");
/// ```
#[derive(Debug)]
pub struct KeyTable {
    strings: Box<[Box<str>]>,
    utf16: Box<[u16]>,
    utf16_spans: Box<[KeySpan]>,
    utf8: Box<[u8]>,
    utf8_spans: Box<[KeySpan]>,
}

impl KeyTable {
    /// Interns `names` in ordinal order.
    pub fn build<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
        I::IntoIter: Clone,
    {
        let names = names.into_iter();

        let (utf16_total, utf8_total) = names
            .clone()
            .fold((0, 0), |(u16s, u8s), name| {
                (u16s + name.encode_utf16().count(), u8s + name.len())
            });

        let mut strings = Vec::new();
        let mut utf16 = Vec::with_capacity(utf16_total);
        let mut utf8 = Vec::with_capacity(utf8_total);
        let mut utf16_spans = Vec::new();
        let mut utf8_spans = Vec::new();

        for name in names {
            let offset = utf16.len();
            utf16.extend(name.encode_utf16());
            utf16_spans.push(KeySpan {
                offset,
                len: utf16.len() - offset,
            });

            utf8_spans.push(KeySpan {
                offset: utf8.len(),
                len: name.len(),
            });
            utf8.extend_from_slice(name.as_bytes());

            strings.push(Box::from(name));
        }

        debug_assert_eq!(utf16.len(), utf16_total);
        debug_assert_eq!(utf8.len(), utf8_total);

        Self {
            strings: strings.into_boxed_slice(),
            utf16: utf16.into_boxed_slice(),
            utf16_spans: utf16_spans.into_boxed_slice(),
            utf8: utf8.into_boxed_slice(),
            utf8_spans: utf8_spans.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// The native form of the key with ordinal `index`.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    #[inline]
    pub fn str_at(&self, index: usize) -> &str {
        &self.strings[index]
    }

    /// The UTF-16 form of the key with ordinal `index`.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    #[inline]
    pub fn utf16_at(&self, index: usize) -> &[u16] {
        &self.utf16[self.utf16_spans[index].range()]
    }

    /// The UTF-8 form of the key with ordinal `index`.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    #[inline]
    pub fn utf8_at(&self, index: usize) -> &[u8] {
        &self.utf8[self.utf8_spans[index].range()]
    }

    #[inline]
    pub fn utf16_span(&self, index: usize) -> KeySpan {
        self.utf16_spans[index]
    }

    #[inline]
    pub fn utf8_span(&self, index: usize) -> KeySpan {
        self.utf8_spans[index]
    }

    /// The packed UTF-16 buffer holding every key.
    #[inline]
    pub fn utf16_buffer(&self) -> &[u16] {
        &self.utf16
    }

    /// The packed UTF-8 buffer holding every key.
    #[inline]
    pub fn utf8_buffer(&self) -> &[u8] {
        &self.utf8
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> {
        self.strings.iter().map(|s| &**s)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{KeySpan, KeyTable};

    #[test]
    fn spans_are_contiguous() {
        let table = KeyTable::build(["a", "bc", "", "𝄞"]);

        assert_eq!(table.utf8_span(0), KeySpan { offset: 0, len: 1 });
        assert_eq!(table.utf8_span(1), KeySpan { offset: 1, len: 2 });
        assert_eq!(table.utf8_span(2), KeySpan { offset: 3, len: 0 });
        assert_eq!(table.utf8_span(3), KeySpan { offset: 3, len: 4 });

        // The clef is a surrogate pair.
        assert_eq!(table.utf16_span(3), KeySpan { offset: 3, len: 2 });
        assert_eq!(table.utf16_buffer().len(), 5);
        assert_eq!(table.utf8_buffer().len(), 7);
    }

    #[test]
    fn forms_agree() {
        let table = KeyTable::build(["Id", "Name", "Größe"]);
        for (index, name) in table.iter().enumerate() {
            let utf16: Vec<u16> = name.encode_utf16().collect();
            assert_eq!(table.utf16_at(index), utf16.as_slice());
            assert_eq!(table.utf8_at(index), name.as_bytes());
            assert_eq!(table.str_at(index), name);
        }
    }

    #[test]
    fn empty_table() {
        let table = KeyTable::build(core::iter::empty());
        assert!(table.is_empty());
        assert!(table.utf8_buffer().is_empty());
    }
}
