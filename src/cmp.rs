//! `min`, `max` and `coalesce` over any number of values.

use hashbrown::HashMap;

/// Returns the lowest of `items`, or `None` if there are none.
///
/// Unlike [`Iterator::min`], this only needs [`PartialOrd`], so it works for floats. When two
/// items compare equal (or are incomparable), the earlier one is kept.
///
/// ```
/// use appendix::cmp::min;
///
/// assert_eq!(min(vec![3.5, -1.0, 2.0]), Some(-1.0));
/// assert_eq!(min(Vec::<u8>::new()), None);
/// ```
pub fn min<T, I>(items: I) -> Option<T>
where
    T: PartialOrd,
    I: IntoIterator<Item = T>,
{
    items
        .into_iter()
        .fold(None, |best, item| match best {
            Some(best) if !(item < best) => Some(best),
            _ => Some(item),
        })
}

/// Returns the highest of `items`, or `None` if there are none.
///
/// Unlike [`Iterator::max`], this only needs [`PartialOrd`], so it works for floats. When two
/// items compare equal (or are incomparable), the earlier one is kept.
pub fn max<T, I>(items: I) -> Option<T>
where
    T: PartialOrd,
    I: IntoIterator<Item = T>,
{
    items
        .into_iter()
        .fold(None, |best, item| match best {
            Some(best) if !(item > best) => Some(best),
            _ => Some(item),
        })
}

/// Returns the first of `items` that is not equal to `T::default()`, or the default if there is
/// no such item.
///
/// ```
/// use appendix::cmp::coalesce;
///
/// assert_eq!(coalesce(vec!["", "fallback", "other"]), "fallback");
/// assert_eq!(coalesce(vec![0, 0]), 0);
/// ```
pub fn coalesce<T, I>(items: I) -> T
where
    T: Default + PartialEq,
    I: IntoIterator<Item = T>,
{
    let zero = T::default();
    items.into_iter().find(|item| *item != zero).unwrap_or(zero)
}

/// Returns the first of `items` that is non-empty, or an empty slice if there is none.
pub fn coalesce_slice<'a, T, I>(items: I) -> &'a [T]
where
    I: IntoIterator<Item = &'a [T]>,
{
    items.into_iter().find(|s| !s.is_empty()).unwrap_or(&[])
}

/// Returns the first of `items` that is non-empty, or `None` if there is none.
pub fn coalesce_map<'a, K, V, S, I>(items: I) -> Option<&'a HashMap<K, V, S>>
where
    K: 'a,
    V: 'a,
    S: 'a,
    I: IntoIterator<Item = &'a HashMap<K, V, S>>,
{
    items.into_iter().find(|m| !m.is_empty())
}
