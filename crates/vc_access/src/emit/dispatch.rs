use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};

use crate::error::EmitError;
use crate::info::KeyTable;
use crate::utils::{FixedHashState, HashMap};
use crate::value::Key;

/// Deepest code unit comparison chain of a dispatch tree; deeper groups
/// fall back to a hash lookup.
pub const MAX_DISPATCH_DEPTH: usize = 8;

// -----------------------------------------------------------------------------
// Case folding

/// The lookup names of `keys`, upper-cased when `ignore_case` is set.
///
/// Fails when two names become equal after folding.
pub(crate) fn fold_names(keys: &KeyTable, ignore_case: bool) -> Result<Vec<Cow<'_, str>>, EmitError> {
    if !ignore_case {
        return Ok(keys.iter().map(Cow::Borrowed).collect());
    }
    let folded: Vec<Cow<'_, str>> = keys.iter().map(|name| Cow::Owned(name.to_uppercase())).collect();
    {
        let mut seen: HashMap<&str, usize> = HashMap::default();
        for (ordinal, name) in folded.iter().enumerate() {
            if let Some(&first) = seen.get(&**name) {
                return Err(EmitError::AmbiguousKey {
                    first: keys.str_at(first).into(),
                    second: keys.str_at(ordinal).into(),
                });
            }
            seen.insert(name, ordinal);
        }
    }
    Ok(folded)
}

/// Decodes a string key exactly; malformed input yields `None`.
pub(crate) fn key_text(key: Key<'_>) -> Option<Cow<'_, str>> {
    match key {
        Key::Str(text) => Some(Cow::Borrowed(text)),
        Key::Utf8(bytes) => core::str::from_utf8(bytes).ok().map(Cow::Borrowed),
        Key::Utf16(units) => char::decode_utf16(units.iter().copied())
            .collect::<Result<String, _>>()
            .ok()
            .map(Cow::Owned),
        Key::Ordinal(_) => None,
    }
}

// -----------------------------------------------------------------------------
// DispatchTree

/// A code unit of an encoded key.
pub(crate) trait CodeUnit: Copy + Ord + Hash + 'static {}

impl CodeUnit for u8 {}
impl CodeUnit for u16 {}

enum Node<U> {
    /// One candidate left; confirmed by a full comparison.
    Leaf(usize),
    /// Branches on the code unit at `index`; arms are sorted by unit.
    Switch { index: usize, arms: Box<[(U, Node<U>)]> },
    /// Candidates sorted by hash, confirmed by a full comparison.
    Hashed(Box<[(u64, usize)]>),
}

/// Maps encoded keys to ordinals: first by length, then by the code units
/// that best distinguish the remaining candidates.
pub(crate) struct DispatchTree<U> {
    keys: Box<[Box<[U]>]>,
    lengths: Box<[(usize, Node<U>)]>,
}

impl<U: CodeUnit> DispatchTree<U> {
    pub fn build(keys: Vec<Box<[U]>>, max_depth: usize) -> Self {
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (ordinal, key) in keys.iter().enumerate() {
            groups.entry(key.len()).or_default().push(ordinal);
        }
        let lengths = groups
            .into_iter()
            .map(|(len, ordinals)| (len, split(&keys, ordinals, 0, max_depth)))
            .collect();
        Self {
            keys: keys.into_boxed_slice(),
            lengths,
        }
    }

    pub fn find(&self, input: &[U]) -> Option<usize> {
        let slot = self
            .lengths
            .binary_search_by_key(&input.len(), |(len, _)| *len)
            .ok()?;
        let mut node = &self.lengths[slot].1;
        loop {
            match node {
                Node::Leaf(ordinal) => {
                    return (*self.keys[*ordinal] == *input).then_some(*ordinal);
                }
                Node::Switch { index, arms } => {
                    let unit = input[*index];
                    let arm = arms.binary_search_by_key(&unit, |(u, _)| *u).ok()?;
                    node = &arms[arm].1;
                }
                Node::Hashed(entries) => {
                    let hash = FixedHashState.hash_one(input);
                    let start = entries.partition_point(|(h, _)| *h < hash);
                    return entries[start..]
                        .iter()
                        .take_while(|(h, _)| *h == hash)
                        .map(|(_, ordinal)| *ordinal)
                        .find(|ordinal| *self.keys[*ordinal] == *input);
                }
            }
        }
    }
}

/// Builds the node for same-length candidates.
fn split<U: CodeUnit>(keys: &[Box<[U]>], ordinals: Vec<usize>, depth: usize, max_depth: usize) -> Node<U> {
    if let [ordinal] = ordinals[..] {
        return Node::Leaf(ordinal);
    }
    if depth >= max_depth {
        return hashed(keys, &ordinals);
    }

    // The index splitting the candidates into the most groups.
    let len = keys[ordinals[0]].len();
    let mut best: Option<(usize, usize)> = None;
    let mut units: Vec<U> = Vec::with_capacity(ordinals.len());
    for index in 0..len {
        units.clear();
        units.extend(ordinals.iter().map(|&ordinal| keys[ordinal][index]));
        units.sort_unstable();
        units.dedup();
        if best.is_none_or(|(_, distinct)| units.len() > distinct) {
            best = Some((index, units.len()));
        }
    }

    match best {
        Some((index, distinct)) if distinct > 1 => {
            let mut arms: BTreeMap<U, Vec<usize>> = BTreeMap::new();
            for &ordinal in &ordinals {
                arms.entry(keys[ordinal][index]).or_default().push(ordinal);
            }
            Node::Switch {
                index,
                arms: arms
                    .into_iter()
                    .map(|(unit, group)| (unit, split(keys, group, depth + 1, max_depth)))
                    .collect(),
            }
        }
        _ => hashed(keys, &ordinals),
    }
}

fn hashed<U: CodeUnit>(keys: &[Box<[U]>], ordinals: &[usize]) -> Node<U> {
    let mut entries: Vec<(u64, usize)> = ordinals
        .iter()
        .map(|&ordinal| (FixedHashState.hash_one(&*keys[ordinal]), ordinal))
        .collect();
    entries.sort_unstable();
    Node::Hashed(entries.into_boxed_slice())
}

// -----------------------------------------------------------------------------
// KeyDispatch

/// Key resolution of a compiled reader/writer.
///
/// `Str` and `Utf8` keys share the UTF-8 tree, `Utf16` keys have their own.
/// With `ignore_case`, trees hold upper-cased names and input is folded the
/// same way before the lookup.
pub(crate) struct KeyDispatch {
    len: usize,
    ignore_case: bool,
    utf8: DispatchTree<u8>,
    utf16: DispatchTree<u16>,
}

impl KeyDispatch {
    #[inline]
    pub fn build(keys: &KeyTable, ignore_case: bool) -> Result<Self, EmitError> {
        Self::with_depth(keys, ignore_case, MAX_DISPATCH_DEPTH)
    }

    pub fn with_depth(keys: &KeyTable, ignore_case: bool, max_depth: usize) -> Result<Self, EmitError> {
        let names = fold_names(keys, ignore_case)?;
        let utf8 = names.iter().map(|name| Box::from(name.as_bytes())).collect();
        let utf16 = names.iter().map(|name| name.encode_utf16().collect()).collect();
        Ok(Self {
            len: keys.len(),
            ignore_case,
            utf8: DispatchTree::build(utf8, max_depth),
            utf16: DispatchTree::build(utf16, max_depth),
        })
    }

    pub fn find(&self, key: Key<'_>) -> Option<usize> {
        match key {
            Key::Ordinal(ordinal) => (ordinal < self.len).then_some(ordinal),
            Key::Str(text) => self.find_utf8(text.as_bytes()),
            Key::Utf8(bytes) => self.find_utf8(bytes),
            Key::Utf16(units) => self.find_utf16(units),
        }
    }

    fn find_utf8(&self, bytes: &[u8]) -> Option<usize> {
        if !self.ignore_case {
            return self.utf8.find(bytes);
        }
        if bytes.is_ascii() {
            return self.utf8.find(&bytes.to_ascii_uppercase());
        }
        let text = core::str::from_utf8(bytes).ok()?;
        self.utf8.find(text.to_uppercase().as_bytes())
    }

    fn find_utf16(&self, units: &[u16]) -> Option<usize> {
        if !self.ignore_case {
            return self.utf16.find(units);
        }
        let text = key_text(Key::Utf16(units))?;
        let folded: Vec<u16> = text.to_uppercase().encode_utf16().collect();
        self.utf16.find(&folded)
    }
}

// -----------------------------------------------------------------------------
// LinearLookup

/// Key resolution of a reflective reader/writer: a scan over the names.
pub(crate) struct LinearLookup {
    folded: Option<Box<[Box<str>]>>,
}

impl LinearLookup {
    pub fn build(keys: &KeyTable, ignore_case: bool) -> Result<Self, EmitError> {
        let names = fold_names(keys, ignore_case)?;
        Ok(Self {
            folded: ignore_case.then(|| names.into_iter().map(|name| name.into()).collect()),
        })
    }

    /// Like [`build`](Self::build), keeping the first of ambiguous names.
    pub fn unchecked(keys: &KeyTable, ignore_case: bool) -> Self {
        Self {
            folded: ignore_case.then(|| keys.iter().map(|name| name.to_uppercase().into()).collect()),
        }
    }

    pub fn find(&self, key: Key<'_>, keys: &KeyTable) -> Option<usize> {
        if let Key::Ordinal(ordinal) = key {
            return (ordinal < keys.len()).then_some(ordinal);
        }
        match &self.folded {
            None => match key {
                Key::Str(text) => (0..keys.len()).find(|&i| keys.str_at(i) == text),
                Key::Utf8(bytes) => (0..keys.len()).find(|&i| keys.utf8_at(i) == bytes),
                Key::Utf16(units) => (0..keys.len()).find(|&i| keys.utf16_at(i) == units),
                Key::Ordinal(_) => None,
            },
            Some(folded) => {
                let text = key_text(key)?.to_uppercase();
                folded.iter().position(|name| **name == *text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{KeyDispatch, LinearLookup};
    use crate::error::EmitError;
    use crate::info::KeyTable;
    use crate::value::Key;

    const NAMES: [&str; 7] = ["id", "name", "note", "nonce", "tag", "tags", "x"];

    fn utf16(text: &str) -> Vec<u16> {
        text.encode_utf16().collect()
    }

    #[test]
    fn every_key_form_resolves() {
        let keys = KeyTable::build(NAMES);
        let dispatch = KeyDispatch::build(&keys, false).unwrap();
        for (ordinal, name) in NAMES.iter().enumerate() {
            assert_eq!(dispatch.find(Key::Str(name)), Some(ordinal));
            assert_eq!(dispatch.find(Key::Utf8(name.as_bytes())), Some(ordinal));
            assert_eq!(dispatch.find(Key::Utf16(&utf16(name))), Some(ordinal));
        }
        assert_eq!(dispatch.find(Key::Str("nome")), None);
        assert_eq!(dispatch.find(Key::Str("ID")), None);
        assert_eq!(dispatch.find(Key::Str("")), None);
        assert_eq!(dispatch.find(Key::Ordinal(6)), Some(6));
        assert_eq!(dispatch.find(Key::Ordinal(7)), None);
    }

    #[test]
    fn hash_fallback_matches_tree() {
        let keys = KeyTable::build(NAMES);
        let shallow = KeyDispatch::with_depth(&keys, false, 0).unwrap();
        for (ordinal, name) in NAMES.iter().enumerate() {
            assert_eq!(shallow.find(Key::Str(name)), Some(ordinal));
            assert_eq!(shallow.find(Key::Utf16(&utf16(name))), Some(ordinal));
        }
        assert_eq!(shallow.find(Key::Str("nope")), None);
    }

    #[test]
    fn ignore_case_folds_input() {
        let keys = KeyTable::build(["id", "straße", "Name"]);
        let dispatch = KeyDispatch::build(&keys, true).unwrap();
        assert_eq!(dispatch.find(Key::Str("ID")), Some(0));
        assert_eq!(dispatch.find(Key::Utf8(b"nAmE")), Some(2));
        assert_eq!(dispatch.find(Key::Utf16(&utf16("STRASSE"))), Some(1));
        assert_eq!(dispatch.find(Key::Str("Straße")), Some(1));
        // Malformed input never matches.
        assert_eq!(dispatch.find(Key::Utf8(&[0xFF, 0x49, 0x44])), None);
        assert_eq!(dispatch.find(Key::Utf16(&[0xD800])), None);
    }

    #[test]
    fn names_equal_after_folding_are_rejected() {
        let keys = KeyTable::build(["Id", "ID"]);
        let expected = EmitError::AmbiguousKey {
            first: "Id".into(),
            second: "ID".into(),
        };
        assert_eq!(KeyDispatch::build(&keys, true).err(), Some(expected.clone()));
        assert_eq!(LinearLookup::build(&keys, true).err(), Some(expected));
        assert!(KeyDispatch::build(&keys, false).is_ok());
    }

    #[test]
    fn linear_lookup_agrees() {
        let keys = KeyTable::build(NAMES);
        let linear = LinearLookup::build(&keys, false).unwrap();
        let folded = LinearLookup::build(&keys, true).unwrap();
        for (ordinal, name) in NAMES.iter().enumerate() {
            assert_eq!(linear.find(Key::Str(name), &keys), Some(ordinal));
            assert_eq!(linear.find(Key::Utf16(&utf16(name)), &keys), Some(ordinal));
            let upper = name.to_uppercase();
            assert_eq!(folded.find(Key::Utf8(upper.as_bytes()), &keys), Some(ordinal));
        }
        assert_eq!(linear.find(Key::Str("ID"), &keys), None);
    }
}
