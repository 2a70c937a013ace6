use super::snapshot::Snapshot;
use crate::DefaultHashBuilder;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FromIterator;
use core::sync::atomic::Ordering;
use crossbeam_epoch::{self as epoch, Atomic, Guard, Owned};
use hashbrown::HashMap;
use log::trace;
use parking_lot::Mutex;
use std::sync::Arc;

/// The tier that receives new keys.
///
/// `table` is `None` whenever nothing has been stored since the last promotion. When it is
/// `Some`, it holds every key in the fast tier _plus_ the ones stored since, so it is always the
/// complete truth.
struct Pending<K, V, S> {
    table: Option<HashMap<K, V, S>>,

    // Lookups served from `table` since it was last promoted.
    hits: usize,
}

/// A concurrency-safe, append-only hash map.
///
/// Lookups of keys that have been _promoted_ only need an atomic load: no lock is taken, and any
/// number of threads can read at once. Lookups of missing keys and of keys stored since the last
/// promotion take a mutex, and so do stores.
///
/// Every lookup served by the locked tier counts towards a promotion. Once the locked tier has
/// served as many hits as it has entries, it is published wholesale as the new lock-free tier.
/// Promotion never changes what the map contains, only how quickly it can be read.
///
/// Keys can be stored, but never removed or overwritten.
///
/// # Bounds
///
/// Retired tables are reclaimed with epoch-based reclamation, which may drop them on whichever
/// thread next advances the global epoch, at any later time. That is why most methods require
/// `K`, `V` and `S` to be `Send + 'static`.
///
/// # Examples
///
/// ```
/// use appendix::AppendMap;
///
/// let map = AppendMap::new();
/// assert_eq!(map.load_or_store("a", 1), (1, false));
/// assert_eq!(map.load_or_store("a", 2), (1, true));
/// assert_eq!(map.load("a"), Some(1));
/// assert_eq!(map.load("c"), None);
/// assert_eq!(map.len(), 1);
/// ```
pub struct AppendMap<K, V, S = DefaultHashBuilder> {
    fast: Atomic<Arc<HashMap<K, V, S>>>,
    slow: Mutex<Pending<K, V, S>>,
    hash_builder: S,
}

impl<K, V> AppendMap<K, V, DefaultHashBuilder> {
    /// Creates an empty `AppendMap`.
    ///
    /// The map is initially created with a capacity of 0, so it will not allocate until it is
    /// first inserted into.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<K, V, S> AppendMap<K, V, S> {
    /// Creates an empty `AppendMap` which will use the given hash builder to hash keys.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            fast: Atomic::null(),
            slow: Mutex::new(Pending {
                table: None,
                hits: 0,
            }),
            hash_builder,
        }
    }

    /// Returns a reference to the map's [`BuildHasher`].
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// The currently published fast tier, if any.
    #[inline]
    fn fast<'g>(&self, guard: &'g Guard) -> Option<&'g HashMap<K, V, S>> {
        let fast = self.fast.load(Ordering::Acquire, guard);
        // Safety: a table is only retired after it has been swapped out of `self.fast`, and is
        // then destroyed no earlier than when every guard pinned before the swap (which includes
        // ours) has been dropped.
        unsafe { fast.as_ref() }.map(|table| &**table)
    }
}

impl<K, V, S> AppendMap<K, V, S>
where
    K: Hash + Eq + Send + 'static,
    V: Send + 'static,
    S: BuildHasher + Send + 'static,
{
    /// Returns the value stored for `key`, or `None` if there is no such value.
    ///
    /// The key may be any borrowed form of the map's key type, but [`Hash`] and [`Eq`] on the
    /// borrowed form *must* match those for the key type.
    #[inline]
    pub fn load<Q: ?Sized>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
        V: Clone,
    {
        if let Some(value) = self.load_fast(key) {
            return Some(value);
        }

        let mut slow = self.slow.lock();
        if slow.table.is_none() {
            // Either nothing was ever stored, or a promotion raced with our first look.
            drop(slow);
            return self.load_fast(key);
        }

        let value = slow.table.as_ref().and_then(|t| t.get(key)).cloned();
        if value.is_some() {
            slow.hits += 1;
            self.consider_promotion(&mut slow);
        }
        value
    }

    /// Returns the value stored for `key`, or `V::default()` if there is no such value.
    ///
    /// This is the same as [`load`](Self::load), but without telling absent and default values
    /// apart.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn load_or_zero<Q: ?Sized>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
        V: Clone + Default,
    {
        self.load(key).unwrap_or_default()
    }

    /// Returns the value stored for `key` if there is one. Otherwise stores `value` and returns
    /// it.
    ///
    /// The returned flag is `true` if the value was loaded, and `false` if it was stored.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn load_or_store(&self, key: K, value: V) -> (V, bool)
    where
        K: Clone,
        V: Clone,
        S: Clone,
    {
        self.load_or_store_with(key, move || value)
    }

    /// Returns the value stored for `key` if there is one. Otherwise stores the value returned by
    /// `f` and returns it.
    ///
    /// `f` is only called if the value is actually stored, and is called with the map's lock
    /// held, so it must not use this map.
    pub fn load_or_store_with<F>(&self, key: K, f: F) -> (V, bool)
    where
        F: FnOnce() -> V,
        K: Clone,
        V: Clone,
        S: Clone,
    {
        if let Some(value) = self.load_fast(&key) {
            return (value, true);
        }

        let mut slow = self.slow.lock();
        let pending = &mut *slow;
        if pending.table.is_none() {
            let guard = &epoch::pin();
            let table = match self.fast(guard) {
                Some(fast) => {
                    if let Some(value) = fast.get(&key) {
                        return (value.clone(), true);
                    }
                    fast.clone()
                }
                None => HashMap::with_hasher(self.hash_builder.clone()),
            };
            trace!("materialized pending tier with {} entries", table.len());
            pending.table = Some(table);
        } else if let Some(value) = pending.table.as_ref().and_then(|t| t.get(&key)).cloned() {
            pending.hits += 1;
            self.consider_promotion(pending);
            return (value, true);
        }

        let value = f();
        pending
            .table
            .get_or_insert_with(|| HashMap::with_hasher(self.hash_builder.clone()))
            .insert(key, value.clone());
        (value, false)
    }

    /// Calls `f` for every key and value in the map, stopping early if `f` returns `false`.
    ///
    /// The entries visited are those of a consistent snapshot of the map, taken before the first
    /// call to `f`. No lock is held while `f` runs, so `f` is free to use the map, including
    /// storing new keys, which will not be visited. Iteration order is unspecified.
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let snapshot = self.snapshot();
        for (key, value) in &snapshot {
            if !f(key, value) {
                return;
            }
        }
    }

    /// Returns a snapshot of the current contents of the map.
    ///
    /// Taking a snapshot promotes any pending stores. The snapshot can then be read without any
    /// synchronization, and never reflects later stores.
    pub fn snapshot(&self) -> Snapshot<K, V, S> {
        let mut slow = self.slow.lock();
        if slow.table.is_some() {
            self.promote(&mut slow);
        }

        let guard = &epoch::pin();
        let fast = self.fast.load(Ordering::Acquire, guard);
        // Safety: see `AppendMap::fast`. We take our own reference to the table before the guard
        // goes away.
        Snapshot::new(unsafe { fast.as_ref() }.cloned())
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        let slow = self.slow.lock();
        if let Some(ref table) = slow.table {
            return table.len();
        }
        drop(slow);

        let guard = &epoch::pin();
        self.fast(guard).map_or(0, |table| table.len())
    }

    /// Returns `true` if the map contains no elements.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn load_fast<Q: ?Sized>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
        V: Clone,
    {
        let guard = &epoch::pin();
        self.fast(guard)?.get(key).cloned()
    }

    fn consider_promotion(&self, pending: &mut Pending<K, V, S>) {
        let len = pending.table.as_ref().map_or(0, |table| table.len());
        if pending.hits >= len {
            self.promote(pending);
        }
    }

    #[cold]
    #[inline(never)]
    fn promote(&self, pending: &mut Pending<K, V, S>) {
        if let Some(table) = pending.table.take() {
            trace!(
                "promoting {} entries after {} slow-path hits",
                table.len(),
                pending.hits
            );
            let guard = &epoch::pin();
            let old = self
                .fast
                .swap(Owned::new(Arc::new(table)), Ordering::AcqRel, guard);
            if !old.is_null() {
                // Safety: `old` is no longer reachable through `self.fast`, so only readers that
                // pinned the epoch before the swap can still observe it.
                unsafe { guard.defer_destroy(old) };
            }
        }
        pending.hits = 0;
    }
}

#[cfg(test)]
impl<K, V, S> AppendMap<K, V, S> {
    /// Whether stores are pending promotion.
    pub(crate) fn is_split(&self) -> bool {
        self.slow.lock().table.is_some()
    }

    pub(crate) fn slow_hits(&self) -> usize {
        self.slow.lock().hits
    }
}

impl<K, V, S> Drop for AppendMap<K, V, S> {
    fn drop(&mut self) {
        // Safety: we have `&mut self`, so no reader can hold a reference into the fast tier.
        unsafe {
            let guard = epoch::unprotected();
            let fast = self.fast.swap(epoch::Shared::null(), Ordering::Relaxed, guard);
            if !fast.is_null() {
                drop(fast.into_owned());
            }
        }
    }
}

impl<K, V, S: Default> Default for AppendMap<K, V, S> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S: Clone> From<HashMap<K, V, S>> for AppendMap<K, V, S> {
    /// Publishes `table` directly as the map's lock-free tier.
    fn from(table: HashMap<K, V, S>) -> Self {
        let hash_builder = table.hasher().clone();
        let map = Self::with_hasher(hash_builder);
        map.fast.store(Owned::new(Arc::new(table)), Ordering::Release);
        map
    }
}

impl<K, V, S> FromIterator<(K, V)> for AppendMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default + Clone,
{
    /// Collects the pairs into a map. If a key repeats, the first value wins, just as with
    /// repeated calls to [`load_or_store`](AppendMap::load_or_store).
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut table = HashMap::with_capacity_and_hasher(iter.size_hint().0, S::default());
        for (key, value) in iter {
            table.entry(key).or_insert(value);
        }
        Self::from(table)
    }
}

impl<K, V, S> Extend<(K, V)> for AppendMap<K, V, S>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
    S: BuildHasher + Clone + Send + 'static,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.load_or_store(key, value);
        }
    }
}

impl<K, V, S> fmt::Debug for AppendMap<K, V, S>
where
    K: fmt::Debug + Hash + Eq + Send + 'static,
    V: fmt::Debug + Send + 'static,
    S: BuildHasher + Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.snapshot().iter()).finish()
    }
}
