//! Order-preserving helpers for slices.

use core::hash::Hash;
use core::iter::Sum;
use hashbrown::HashSet;

/// Returns the elements of `a` that do not occur in `b`, in their original order.
///
/// ```
/// assert_eq!(appendix::slice::diff(&[1, 2, 3, 2, 4], &[2, 5]), vec![1, 3, 4]);
/// ```
pub fn diff<T>(a: &[T], b: &[T]) -> Vec<T>
where
    T: Hash + Eq + Clone,
{
    let exclude: HashSet<&T, crate::DefaultHashBuilder> = b.iter().collect();
    a.iter().filter(|e| !exclude.contains(e)).cloned().collect()
}

/// Returns the elements of `a` for which `f` returns `true`, in their original order.
pub fn filter<T, F>(a: &[T], mut f: F) -> Vec<T>
where
    T: Clone,
    F: FnMut(&T) -> bool,
{
    a.iter().filter(|e| f(e)).cloned().collect()
}

/// Returns `a` with duplicates removed, keeping the first occurrence of each element.
///
/// ```
/// assert_eq!(appendix::slice::unique(&["b", "a", "b", "c", "a"]), vec!["b", "a", "c"]);
/// ```
pub fn unique<T>(a: &[T]) -> Vec<T>
where
    T: Hash + Eq + Clone,
{
    let mut seen: HashSet<&T, crate::DefaultHashBuilder> =
        HashSet::with_capacity_and_hasher(a.len(), Default::default());
    a.iter().filter(|e| seen.insert(*e)).cloned().collect()
}

/// Concatenates `slices` into a single vector, allocated exactly once.
pub fn concat<T: Clone>(slices: &[&[T]]) -> Vec<T> {
    let len = slices.iter().map(|s| s.len()).sum();
    let mut out = Vec::with_capacity(len);
    for s in slices {
        out.extend_from_slice(s);
    }
    out
}

/// Adds up all the elements of `a`. An empty slice sums to zero.
pub fn sum<T>(a: &[T]) -> T
where
    T: Copy + Sum<T>,
{
    a.iter().copied().sum()
}

/// Removes the last element of `v` and returns it.
///
/// # Panics
///
/// Panics if `v` is empty. Use [`Vec::pop`] to handle that case gracefully.
#[track_caller]
pub fn must_pop<T>(v: &mut Vec<T>) -> T {
    match v.pop() {
        Some(last) => last,
        None => panic!("must_pop called on an empty vector"),
    }
}
