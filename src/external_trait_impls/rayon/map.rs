//! Rayon extensions for `Snapshot` and `AppendMap`.

use crate::map::{AppendMap, Snapshot};
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashMap;
use rayon_::iter::plumbing::UnindexedConsumer;
use rayon_::iter::{FromParallelIterator, IntoParallelIterator, ParallelIterator};

/// Parallel iterator over shared references to entries in a snapshot.
///
/// This iterator is created by the [`par_iter`] method on [`Snapshot`]
/// (provided by the [`IntoParallelRefIterator`] trait).
/// See its documentation for more.
///
/// [`par_iter`]: https://docs.rs/rayon/1.0/rayon/iter/trait.IntoParallelRefIterator.html#tymethod.par_iter
/// [`Snapshot`]: crate::Snapshot
/// [`IntoParallelRefIterator`]: https://docs.rs/rayon/1.0/rayon/iter/trait.IntoParallelRefIterator.html
pub struct ParIter<'a, K, V, S> {
    table: Option<&'a HashMap<K, V, S>>,
}

impl<'a, K: Sync, V: Sync, S: Sync> ParallelIterator for ParIter<'a, K, V, S> {
    type Item = (&'a K, &'a V);

    #[cfg_attr(feature = "inline-more", inline)]
    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        // The entries are gathered up front so that rayon splits a plain vector rather than the
        // table's bucket ranges.
        let entries: Vec<(&'a K, &'a V)> = match self.table {
            Some(table) => table.iter().collect(),
            None => Vec::new(),
        };
        entries.into_par_iter().drive_unindexed(consumer)
    }
}

impl<K, V, S> Clone for ParIter<'_, K, V, S> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn clone(&self) -> Self {
        ParIter { table: self.table }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ParIter<'_, K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.table.into_iter().flat_map(|t| t.iter()))
            .finish()
    }
}

/// Parallel iterator over shared references to keys in a snapshot.
///
/// This iterator is created by the [`par_keys`] method on [`Snapshot`].
/// See its documentation for more.
///
/// [`par_keys`]: crate::Snapshot::par_keys
/// [`Snapshot`]: crate::Snapshot
pub struct ParKeys<'a, K, V, S> {
    inner: ParIter<'a, K, V, S>,
}

impl<'a, K: Sync, V: Sync, S: Sync> ParallelIterator for ParKeys<'a, K, V, S> {
    type Item = &'a K;

    #[cfg_attr(feature = "inline-more", inline)]
    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        self.inner.map(|(k, _)| k).drive_unindexed(consumer)
    }
}

impl<K, V, S> Clone for ParKeys<'_, K, V, S> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn clone(&self) -> Self {
        ParKeys {
            inner: self.inner.clone(),
        }
    }
}

/// Parallel iterator over shared references to values in a snapshot.
///
/// This iterator is created by the [`par_values`] method on [`Snapshot`].
/// See its documentation for more.
///
/// [`par_values`]: crate::Snapshot::par_values
/// [`Snapshot`]: crate::Snapshot
pub struct ParValues<'a, K, V, S> {
    inner: ParIter<'a, K, V, S>,
}

impl<'a, K: Sync, V: Sync, S: Sync> ParallelIterator for ParValues<'a, K, V, S> {
    type Item = &'a V;

    #[cfg_attr(feature = "inline-more", inline)]
    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        self.inner.map(|(_, v)| v).drive_unindexed(consumer)
    }
}

impl<K, V, S> Clone for ParValues<'_, K, V, S> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn clone(&self) -> Self {
        ParValues {
            inner: self.inner.clone(),
        }
    }
}

impl<K: Sync, V: Sync, S: Sync> Snapshot<K, V, S> {
    /// Visits (potentially in parallel) immutably borrowed keys in an arbitrary order.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn par_keys(&self) -> ParKeys<'_, K, V, S> {
        ParKeys {
            inner: self.into_par_iter(),
        }
    }

    /// Visits (potentially in parallel) immutably borrowed values in an arbitrary order.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn par_values(&self) -> ParValues<'_, K, V, S> {
        ParValues {
            inner: self.into_par_iter(),
        }
    }
}

impl<'a, K: Sync, V: Sync, S: Sync> IntoParallelIterator for &'a Snapshot<K, V, S> {
    type Item = (&'a K, &'a V);
    type Iter = ParIter<'a, K, V, S>;

    #[cfg_attr(feature = "inline-more", inline)]
    fn into_par_iter(self) -> Self::Iter {
        ParIter {
            table: self.table.as_deref(),
        }
    }
}

/// Collect `(key, value)` pairs from a parallel iterator into an `AppendMap`, published directly
/// to its lock-free tier. If a key repeats, the value that comes first in the iterator's order
/// wins, as with the sequential `FromIterator`.
impl<K, V, S> FromParallelIterator<(K, V)> for AppendMap<K, V, S>
where
    K: Eq + Hash + Send,
    V: Send,
    S: BuildHasher + Default + Clone + Send,
{
    fn from_par_iter<P>(par_iter: P) -> Self
    where
        P: IntoParallelIterator<Item = (K, V)>,
    {
        // Collecting into a vector keeps the iterator's order.
        let pairs: Vec<(K, V)> = par_iter.into_par_iter().collect();
        pairs.into_iter().collect()
    }
}
