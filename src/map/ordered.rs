//! Helpers that work on any map, synchronized or not.

use core::iter::FusedIterator;
use std::vec;

/// Returns an iterator over the entries of `map` in ascending order of key.
///
/// `map` can be anything that iterates over `(&K, &V)`, such as a reference to a
/// [`hashbrown::HashMap`], a [`std::collections::HashMap`], or a
/// [`Snapshot`](super::Snapshot).
///
/// ```
/// use appendix::map::ordered;
/// use std::collections::HashMap;
///
/// let mut map = HashMap::new();
/// map.insert("b", 2);
/// map.insert("c", 3);
/// map.insert("a", 1);
/// let keys: Vec<_> = ordered(&map).map(|(k, _)| *k).collect();
/// assert_eq!(keys, ["a", "b", "c"]);
/// ```
pub fn ordered<'a, K, V, I>(map: I) -> Ordered<'a, K, V>
where
    I: IntoIterator<Item = (&'a K, &'a V)>,
    K: Ord + 'a,
    V: 'a,
{
    let mut entries: Vec<_> = map.into_iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    Ordered {
        entries: entries.into_iter(),
    }
}

/// An iterator over the entries of a map, in ascending order of key.
///
/// This `struct` is created by [`ordered`]. See its documentation for more.
#[derive(Clone, Debug)]
pub struct Ordered<'a, K, V> {
    entries: vec::IntoIter<(&'a K, &'a V)>,
}

impl<'a, K, V> Iterator for Ordered<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Ordered<'_, K, V> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for Ordered<'_, K, V> {}
impl<K, V> FusedIterator for Ordered<'_, K, V> {}

/// Returns the lowest key of `map`, or `None` if it is empty.
pub fn min_key<'a, K, V, I>(map: I) -> Option<&'a K>
where
    I: IntoIterator<Item = (&'a K, &'a V)>,
    K: Ord + 'a,
    V: 'a,
{
    map.into_iter().map(|(k, _)| k).min()
}

/// Returns the highest key of `map`, or `None` if it is empty.
pub fn max_key<'a, K, V, I>(map: I) -> Option<&'a K>
where
    I: IntoIterator<Item = (&'a K, &'a V)>,
    K: Ord + 'a,
    V: 'a,
{
    map.into_iter().map(|(k, _)| k).max()
}
