use core::any::TypeId;
use core::fmt;

use super::NoOpHashState;

// -----------------------------------------------------------------------------
// TypeIdMap

/// A map keyed by [`TypeId`], hashed with [`NoOpHashState`].
///
/// Backs the per-registry schema cache, the options table and the
/// value-interface overrides.
///
/// # Examples
///
/// ```
/// use vc_access::utils::TypeIdMap;
///
/// let mut map = TypeIdMap::new();
/// map.insert_type::<u8>("byte");
/// *map.get_or_insert_type::<u16>(|| "short") = "word";
///
/// assert_eq!(map.get_type::<u8>(), Some(&"byte"));
/// assert_eq!(map.get_type::<u16>(), Some(&"word"));
/// assert!(!map.contains_type::<u32>());
/// ```
pub struct TypeIdMap<V>(hashbrown::HashMap<TypeId, V, NoOpHashState>);

impl<V> TypeIdMap<V> {
    #[inline]
    pub const fn new() -> Self {
        Self(hashbrown::HashMap::with_hasher(NoOpHashState))
    }

    #[inline]
    pub fn get_type<T: ?Sized + 'static>(&self) -> Option<&V> {
        self.0.get(&TypeId::of::<T>())
    }

    /// The value of `T`; `f` runs only when there is none yet.
    #[inline]
    pub fn get_or_insert_type<T: ?Sized + 'static>(&mut self, f: impl FnOnce() -> V) -> &mut V {
        self.0.entry(TypeId::of::<T>()).or_insert_with(f)
    }

    #[inline]
    pub fn insert_type<T: ?Sized + 'static>(&mut self, value: V) -> Option<V> {
        self.0.insert(TypeId::of::<T>(), value)
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.0.contains_key(&type_id)
    }

    #[inline]
    pub fn contains_type<T: ?Sized + 'static>(&self) -> bool {
        self.contains(TypeId::of::<T>())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<V> Default for TypeIdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}
