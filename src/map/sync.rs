use crate::DefaultHashBuilder;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};

/// A hash map behind a reader-writer lock.
///
/// Loads share the lock with one another, so read-mostly workloads scale better than with a
/// [`MutexMap`](super::MutexMap). Unlike an [`AppendMap`](super::AppendMap), keys can be
/// overwritten and removed.
///
/// ```
/// use appendix::SyncMap;
///
/// let map = SyncMap::new();
/// assert_eq!(map.load_or_store(1, "one"), ("one", false));
/// assert_eq!(map.load_and_delete(&1), Some("one"));
/// assert_eq!(map.load(&1), None);
/// ```
pub struct SyncMap<K, V, S = DefaultHashBuilder> {
    table: RwLock<HashMap<K, V, S>>,
}

impl<K, V> SyncMap<K, V, DefaultHashBuilder> {
    /// Creates an empty `SyncMap`.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<K, V, S> SyncMap<K, V, S> {
    /// Creates an empty `SyncMap` which will use the given hash builder to hash keys.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: RwLock::new(HashMap::with_hasher(hash_builder)),
        }
    }

    /// Returns the number of elements in the map.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    /// Returns `true` if the map contains no elements.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the `SyncMap`, returning the underlying map.
    pub fn into_inner(self) -> HashMap<K, V, S> {
        self.table.into_inner()
    }
}

impl<K, V, S> SyncMap<K, V, S>
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
        self.table.read().get(key).cloned()
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
    pub fn store(&self, key: K, value: V) {
        self.table.write().insert(key, value);
    }

    /// Removes the value for `key`.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn delete<Q: ?Sized>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.table.write().remove(key);
    }

    /// Removes the value for `key`, returning it if there was one.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn load_and_delete<Q: ?Sized>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.table.write().remove(key)
    }

    /// Returns the value stored for `key` if there is one. Otherwise stores `value` and returns
    /// it.
    ///
    /// The returned flag is `true` if the value was loaded, and `false` if it was stored. Only a
    /// store excludes concurrent loads.
    pub fn load_or_store(&self, key: K, value: V) -> (V, bool)
    where
        V: Clone,
    {
        let table = self.table.upgradable_read();
        if let Some(existing) = table.get(&key) {
            return (existing.clone(), true);
        }
        RwLockUpgradableReadGuard::upgrade(table).insert(key, value.clone());
        (value, false)
    }

    /// Sets the value for `key`, returning the previous value if there was one.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn swap(&self, key: K, value: V) -> Option<V> {
        self.table.write().insert(key, value)
    }

    /// Removes the entry for `key` if its value is equal to `old`.
    ///
    /// Returns `false` if there is no value for `key`, or if it is not equal to `old`.
    pub fn compare_and_delete<Q: ?Sized>(&self, key: &Q, old: &V) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
        V: PartialEq,
    {
        let table = self.table.upgradable_read();
        if table.get(key) != Some(old) {
            return false;
        }
        RwLockUpgradableReadGuard::upgrade(table).remove(key);
        true
    }

    /// Sets the value for `key` to `new` if the current value is equal to `old`.
    ///
    /// Returns `false` if there is no value for `key`, or if it is not equal to `old`.
    pub fn compare_and_swap<Q: ?Sized>(&self, key: &Q, old: &V, new: V) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
        V: PartialEq,
    {
        let table = self.table.upgradable_read();
        if table.get(key) != Some(old) {
            return false;
        }
        let mut table = RwLockUpgradableReadGuard::upgrade(table);
        match table.get_mut(key) {
            Some(current) => {
                *current = new;
                true
            }
            None => false,
        }
    }

    /// Calls `f` for every key and value in the map, stopping early if `f` returns `false`.
    ///
    /// No key is visited more than once, but the iteration does not correspond to a consistent
    /// snapshot: a key stored or removed concurrently (including by `f`) may or may not be
    /// reflected. No lock is held while `f` runs, so `f` may call any method on this map.
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
        K: Clone,
        V: Clone,
    {
        let keys: Vec<K> = self.table.read().keys().cloned().collect();
        for key in keys {
            let value = match self.table.read().get(&key) {
                Some(value) => value.clone(),
                None => continue,
            };
            if !f(&key, &value) {
                return;
            }
        }
    }
}

impl<K, V, S: Default> Default for SyncMap<K, V, S> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for SyncMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.table.read().iter()).finish()
    }
}
