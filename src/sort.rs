use core::cmp::Ordering;

/// Sorts `comparables` in ascending order, and applies the same reordering to `data`.
///
/// The sort is stable. Values that cannot even be compared with themselves, such as NaN, are
/// moved after all the others, keeping their relative order.
///
/// # Panics
///
/// Panics if the two slices differ in length.
///
/// ```
/// let mut ages = [42, 7, 19];
/// let mut names = ["ann", "bob", "cy"];
/// appendix::sort_with_data(&mut ages, &mut names);
/// assert_eq!(ages, [7, 19, 42]);
/// assert_eq!(names, ["bob", "cy", "ann"]);
/// ```
#[track_caller]
pub fn sort_with_data<C, D>(comparables: &mut [C], data: &mut [D])
where
    C: PartialOrd,
{
    assert_eq!(
        comparables.len(),
        data.len(),
        "sort_with_data needs slices of equal length"
    );

    // The comparator must be a total order, so incomparable values get a rank of their own.
    let incomparable: Vec<bool> = comparables
        .iter()
        .map(|c| c.partial_cmp(c).is_none())
        .collect();

    // order[i] is the index of the element that belongs at position i.
    let mut order: Vec<usize> = (0..comparables.len()).collect();
    order.sort_by(|&a, &b| match (incomparable[a], incomparable[b]) {
        (false, false) => comparables[a]
            .partial_cmp(&comparables[b])
            .unwrap_or(Ordering::Equal),
        (x, y) => x.cmp(&y),
    });

    // Apply the permutation one cycle at a time. A position is marked done by pointing it at
    // itself.
    for start in 0..order.len() {
        let mut current = start;
        loop {
            let next = order[current];
            order[current] = current;
            if next == start {
                break;
            }
            comparables.swap(current, next);
            data.swap(current, next);
            current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_data_along() {
        let mut keys = [3, 1, 2, 5, 4];
        let mut data = ['c', 'a', 'b', 'e', 'd'];
        sort_with_data(&mut keys, &mut data);
        assert_eq!(keys, [1, 2, 3, 4, 5]);
        assert_eq!(data, ['a', 'b', 'c', 'd', 'e']);
    }

    #[test]
    fn stable_for_equal_keys() {
        let mut keys = [1, 0, 1, 0];
        let mut data = ["first", "second", "third", "fourth"];
        sort_with_data(&mut keys, &mut data);
        assert_eq!(keys, [0, 0, 1, 1]);
        assert_eq!(data, ["second", "fourth", "first", "third"]);
    }

    #[test]
    fn floats() {
        let mut keys = [0.5, -1.0, 0.25];
        let mut data = vec![String::from("half"), String::from("minus"), String::from("quarter")];
        sort_with_data(&mut keys, &mut data);
        assert_eq!(keys, [-1.0, 0.25, 0.5]);
        assert_eq!(data, ["minus", "quarter", "half"]);
    }

    #[test]
    fn nan_goes_last() {
        let mut keys = [f64::NAN, 2.0, 1.0, f64::NAN, 0.5];
        let mut data = ['a', 'b', 'c', 'd', 'e'];
        sort_with_data(&mut keys, &mut data);
        assert_eq!(&keys[..3], &[0.5, 1.0, 2.0]);
        assert!(keys[3].is_nan() && keys[4].is_nan());
        assert_eq!(data, ['e', 'c', 'b', 'a', 'd']);
    }

    #[test]
    fn many_inputs_with_nan() {
        use rand::rngs::SmallRng;
        use rand::{Rng, SeedableRng};

        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..2000 {
            let len = rng.gen_range(5..=64);
            let mut keys: Vec<f64> = (0..len)
                .map(|_| {
                    if rng.gen_bool(0.2) {
                        f64::NAN
                    } else {
                        f64::from(rng.gen_range(0..16u8))
                    }
                })
                .collect();
            let mut data: Vec<usize> = (0..len).collect();
            let before = keys.clone();
            sort_with_data(&mut keys, &mut data);

            let nans = keys.iter().filter(|k| k.is_nan()).count();
            let (ordered, tail) = keys.split_at(len - nans);
            assert!(tail.iter().all(|k| k.is_nan()));
            assert!(ordered.windows(2).all(|w| w[0] <= w[1]));
            // data still lines up with the key it started next to
            for (k, &d) in keys.iter().zip(&data) {
                assert!(k.to_bits() == before[d].to_bits());
            }
        }
    }

    #[test]
    fn empty_and_single() {
        sort_with_data::<u8, ()>(&mut [], &mut []);
        let mut keys = [1];
        let mut data = [()];
        sort_with_data(&mut keys, &mut data);
        assert_eq!(keys, [1]);
    }

    #[test]
    #[should_panic(expected = "equal length")]
    fn mismatched_lengths() {
        sort_with_data(&mut [1, 2], &mut ['a']);
    }
}
