use crate::DefaultHashBuilder;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashMap;

/// A hash map with the same interface as [`MutexMap`](super::MutexMap), but no synchronization.
///
/// Meant as a drop-in replacement for the synchronized maps once synchronization is no longer
/// needed, but might become so again. Mutating operations take `&mut self` instead.
#[derive(Clone)]
pub struct UnsyncedMap<K, V, S = DefaultHashBuilder> {
    table: HashMap<K, V, S>,
}

impl<K, V> UnsyncedMap<K, V, DefaultHashBuilder> {
    /// Creates an empty `UnsyncedMap`.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<K, V, S> UnsyncedMap<K, V, S> {
    /// Creates an empty `UnsyncedMap` which will use the given hash builder to hash keys.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashMap::with_hasher(hash_builder),
        }
    }

    /// Returns the number of elements in the map.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Calls `f` on the underlying map.
    ///
    /// Named after [`MutexMap::with_lock`](super::MutexMap::with_lock), but there is no lock.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn with_lock<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut HashMap<K, V, S>) -> R,
    {
        f(&mut self.table)
    }

    /// Calls `f` for every key and value in the map, stopping early if `f` returns `false`.
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        for (key, value) in &self.table {
            if !f(key, value) {
                return;
            }
        }
    }

    /// Consumes the `UnsyncedMap`, returning the underlying map.
    pub fn into_inner(self) -> HashMap<K, V, S> {
        self.table
    }
}

impl<K, V, S> UnsyncedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Returns the value stored for `key`, or `None` if there is no such value.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn load<Q: ?Sized>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
        V: Clone,
    {
        self.table.get(key).cloned()
    }

    /// Returns the value stored for `key`, or `V::default()` if there is no such value.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn load_or_zero<Q: ?Sized>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
        V: Clone + Default,
    {
        self.load(key).unwrap_or_default()
    }

    /// Sets the value for `key`.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn store(&mut self, key: K, value: V) {
        self.table.insert(key, value);
    }

    /// Removes the value for `key`.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn delete<Q: ?Sized>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.table.remove(key);
    }

    /// Removes the value for `key`, returning it if there was one.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn load_and_delete<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.table.remove(key)
    }

    /// Returns the value stored for `key` if there is one. Otherwise stores `value` and returns
    /// it.
    ///
    /// The returned flag is `true` if the value was loaded, and `false` if it was stored.
    pub fn load_or_store(&mut self, key: K, value: V) -> (V, bool)
    where
        V: Clone,
    {
        if let Some(existing) = self.table.get(&key) {
            return (existing.clone(), true);
        }
        self.table.insert(key, value.clone());
        (value, false)
    }

    /// Sets the value for `key`, returning the previous value if there was one.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn swap(&mut self, key: K, value: V) -> Option<V> {
        self.table.insert(key, value)
    }

    /// Removes the entry for `key` if its value is equal to `old`.
    pub fn compare_and_delete<Q: ?Sized>(&mut self, key: &Q, old: &V) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
        V: PartialEq,
    {
        if self.table.get(key) != Some(old) {
            return false;
        }
        self.table.remove(key);
        true
    }

    /// Sets the value for `key` to `new` if the current value is equal to `old`.
    pub fn compare_and_swap<Q: ?Sized>(&mut self, key: &Q, old: &V, new: V) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
        V: PartialEq,
    {
        match self.table.get_mut(key) {
            Some(current) if *current == *old => {
                *current = new;
                true
            }
            _ => false,
        }
    }
}

impl<K, V, S: Default> Default for UnsyncedMap<K, V, S> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> From<HashMap<K, V, S>> for UnsyncedMap<K, V, S> {
    fn from(table: HashMap<K, V, S>) -> Self {
        Self { table }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for UnsyncedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.table.fmt(f)
    }
}
