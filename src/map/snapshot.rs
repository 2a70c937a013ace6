//! A point-in-time view of an `AppendMap`.
//!
//! The Snapshot is synchronization-free, and does not reflect later stores into the map it was
//! taken from.

use crate::DefaultHashBuilder;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use hashbrown::{hash_map, HashMap};
use std::sync::Arc;

/// A snapshot of the contents of an [`AppendMap`](super::AppendMap).
///
/// Snapshots are cheap to clone and to send to other threads, and reading from one never takes
/// a lock.
///
/// ```
/// use appendix::AppendMap;
///
/// let map = AppendMap::new();
/// map.load_or_store(1, "one");
/// let snapshot = map.snapshot();
///
/// map.load_or_store(2, "two");
///
/// // The store is not reflected in the earlier snapshot.
/// assert_eq!(snapshot.len(), 1);
/// assert_eq!(snapshot.get(&1), Some(&"one"));
/// assert_eq!(map.snapshot().len(), 2);
/// ```
pub struct Snapshot<K, V, S = DefaultHashBuilder> {
    pub(crate) table: Option<Arc<HashMap<K, V, S>>>,
}

impl<K, V, S> Clone for Snapshot<K, V, S> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn clone(&self) -> Self {
        Snapshot {
            table: self.table.clone(),
        }
    }
}

impl<K, V, S> Snapshot<K, V, S> {
    pub(crate) fn new(table: Option<Arc<HashMap<K, V, S>>>) -> Self {
        Snapshot { table }
    }

    /// Returns the number of elements in the snapshot.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn len(&self) -> usize {
        self.table.as_ref().map_or(0, |table| table.len())
    }

    /// Returns `true` if the snapshot contains no elements.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// An iterator visiting all key-value pairs in arbitrary order.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.as_ref().map(|table| table.iter()),
        }
    }

    /// An iterator visiting all keys in arbitrary order.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// An iterator visiting all values in arbitrary order.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

impl<K, V, S> Snapshot<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but [`Hash`] and [`Eq`] on the
    /// borrowed form *must* match those for the key type.
    #[inline]
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.table.as_ref()?.get(key)
    }

    /// Returns `true` if the snapshot contains a value for the specified key.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.get(key).is_some()
    }
}

impl<'a, K, V, S> IntoIterator for &'a Snapshot<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    #[cfg_attr(feature = "inline-more", inline)]
    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for Snapshot<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// An iterator over the entries of a `Snapshot`.
///
/// This `struct` is created by the [`iter`] method on [`Snapshot`]. See its
/// documentation for more.
///
/// [`iter`]: struct.Snapshot.html#method.iter
/// [`Snapshot`]: struct.Snapshot.html
pub struct Iter<'a, K, V> {
    inner: Option<hash_map::Iter<'a, K, V>>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.as_mut()?.next()
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner
            .as_ref()
            .map_or((0, Some(0)), |inner| inner.size_hint())
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the keys of a `Snapshot`.
///
/// This `struct` is created by the [`keys`] method on [`Snapshot`]. See its
/// documentation for more.
///
/// [`keys`]: struct.Snapshot.html#method.keys
/// [`Snapshot`]: struct.Snapshot.html
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Keys<'_, K, V> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a `Snapshot`.
///
/// This `struct` is created by the [`values`] method on [`Snapshot`]. See its
/// documentation for more.
///
/// [`values`]: struct.Snapshot.html#method.values
/// [`Snapshot`]: struct.Snapshot.html
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Values<'_, K, V> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}
