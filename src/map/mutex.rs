use crate::DefaultHashBuilder;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashMap;
use parking_lot::Mutex;

/// A hash map protected by a mutex.
///
/// Every operation takes the lock for its whole duration. In exchange, all operations are
/// available, including removal and compare-and-swap.
///
/// ```
/// use appendix::MutexMap;
///
/// let map = MutexMap::new();
/// map.store("a", 1);
/// assert_eq!(map.swap("a", 2), Some(1));
/// assert!(map.compare_and_swap("a", &2, 3));
/// assert_eq!(map.load("a"), Some(3));
/// ```
pub struct MutexMap<K, V, S = DefaultHashBuilder> {
    table: Mutex<HashMap<K, V, S>>,
}

impl<K, V> MutexMap<K, V, DefaultHashBuilder> {
    /// Creates an empty `MutexMap`.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<K, V, S> MutexMap<K, V, S> {
    /// Creates an empty `MutexMap` which will use the given hash builder to hash keys.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: Mutex::new(HashMap::with_hasher(hash_builder)),
        }
    }

    /// Returns the number of elements in the map.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    /// Returns `true` if the map contains no elements.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls `f` with the lock held.
    ///
    /// `f` can manipulate the underlying map at will, but it must not call any other method on
    /// this `MutexMap`, since the lock is already taken.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn with_lock<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut HashMap<K, V, S>) -> R,
    {
        f(&mut self.table.lock())
    }

    /// Consumes the `MutexMap`, returning the underlying map.
    pub fn into_inner(self) -> HashMap<K, V, S> {
        self.table.into_inner()
    }
}

impl<K, V, S> MutexMap<K, V, S>
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
        self.table.lock().get(key).cloned()
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
        self.table.lock().insert(key, value);
    }

    /// Removes the value for `key`.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn delete<Q: ?Sized>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.table.lock().remove(key);
    }

    /// Removes the value for `key`, returning it if there was one.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn load_and_delete<Q: ?Sized>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.table.lock().remove(key)
    }

    /// Returns the value stored for `key` if there is one. Otherwise stores `value` and returns
    /// it.
    ///
    /// The returned flag is `true` if the value was loaded, and `false` if it was stored.
    pub fn load_or_store(&self, key: K, value: V) -> (V, bool)
    where
        V: Clone,
    {
        let mut table = self.table.lock();
        if let Some(existing) = table.get(&key) {
            return (existing.clone(), true);
        }
        table.insert(key, value.clone());
        (value, false)
    }

    /// Sets the value for `key`, returning the previous value if there was one.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn swap(&self, key: K, value: V) -> Option<V> {
        self.table.lock().insert(key, value)
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
        let mut table = self.table.lock();
        if table.get(key) != Some(old) {
            return false;
        }
        table.remove(key);
        true
    }

    /// Sets the value for `key` to `new` if the current value is equal to `old`.
    ///
    /// Returns `false`, and leaves the map untouched, if there is no value for `key` or if it is
    /// not equal to `old`.
    pub fn compare_and_swap<Q: ?Sized>(&self, key: &Q, old: &V, new: V) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
        V: PartialEq,
    {
        match self.table.lock().get_mut(key) {
            Some(current) if *current == *old => {
                *current = new;
                true
            }
            _ => false,
        }
    }

    /// Calls `f` for every key and value in the map, stopping early if `f` returns `false`.
    ///
    /// The lock is released while `f` runs, so `f` may call any method on this map. The price is
    /// that iteration is live rather than a snapshot: keys removed before they are reached are
    /// skipped, values reflect the time they are reached, and keys stored during iteration are not
    /// visited. Use [`with_lock`](Self::with_lock) to iterate faster while blocking other users.
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
        K: Clone,
        V: Clone,
    {
        let keys: Vec<K> = self.table.lock().keys().cloned().collect();
        for key in keys {
            let value = match self.table.lock().get(&key) {
                Some(value) => value.clone(),
                None => continue,
            };
            if !f(&key, &value) {
                return;
            }
        }
    }
}

impl<K, V, S: Default> Default for MutexMap<K, V, S> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for MutexMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.table.lock().iter()).finish()
    }
}
