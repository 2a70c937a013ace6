#![cfg(not(miri))]

#[macro_use]
extern crate quickcheck;

use appendix::{AppendMap, MutexMap, SyncMap, UnsyncedMap};

use quickcheck::Arbitrary;
use quickcheck::Gen;

use fnv::FnvHasher;
use std::hash::BuildHasherDefault;
type FnvBuilder = BuildHasherDefault<FnvHasher>;
type AppendMapFnv<K, V> = AppendMap<K, V, FnvBuilder>;

use std::cmp::min;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Deref;

fn set<'a, T: 'a, I>(iter: I) -> HashSet<T>
where
    I: IntoIterator<Item = &'a T>,
    T: Copy + Hash + Eq,
{
    iter.into_iter().cloned().collect()
}

quickcheck! {
    fn contains(insert: Vec<u32>) -> bool {
        let map = AppendMap::new();
        for &key in &insert {
            map.load_or_store(key, ());
        }
        insert.iter().all(|&key| map.load(&key).is_some())
    }

    fn contains_not(insert: Vec<u8>, not: Vec<u8>) -> bool {
        let map = AppendMap::new();
        for &key in &insert {
            map.load_or_store(key, ());
        }
        let nots = &set(&not) - &set(&insert);
        nots.iter().all(|&key| map.load(&key).is_none())
    }

    fn first_store_wins(insert: Vec<(u8, u16)>) -> bool {
        let map = AppendMap::new();
        let mut first = HashMap::new();
        for &(key, value) in &insert {
            let (actual, loaded) = map.load_or_store(key, value);
            assert_eq!(loaded, first.contains_key(&key));
            let expected = *first.entry(key).or_insert(value);
            assert_eq!(actual, expected);
        }
        first.iter().all(|(k, v)| map.load(k) == Some(*v))
    }

    fn len_counts_distinct_keys(insert: Vec<u16>, reads: Vec<u16>) -> bool {
        let map = AppendMap::new();
        let mut distinct = HashSet::new();
        for (i, &key) in insert.iter().enumerate() {
            map.load_or_store(key, i);
            distinct.insert(key);
            // Interleave reads so that some of them promote.
            if let Some(&r) = reads.get(i) {
                map.load(&r);
            }
            assert_eq!(map.len(), distinct.len());
        }
        map.len() == distinct.len() && map.snapshot().len() == distinct.len()
    }
}

use Op::*;
#[derive(Copy, Clone, Debug)]
enum Op<K, V> {
    LoadOrStore(K, V),
    Load(K),
    Range(u8),
    Len,
    Snapshot,
}

impl<K, V> Arbitrary for Op<K, V>
where
    K: Arbitrary,
    V: Arbitrary,
{
    fn arbitrary(g: &mut Gen) -> Self {
        match u32::arbitrary(g) % 5 {
            0 => LoadOrStore(K::arbitrary(g), V::arbitrary(g)),
            1 => Load(K::arbitrary(g)),
            2 => Range(u8::arbitrary(g)),
            3 => Len,
            _ => Snapshot,
        }
    }
}

fn do_ops<K, V, S>(ops: &[Op<K, V>], a: &AppendMap<K, V, S>, b: &mut HashMap<K, V>)
where
    K: Hash + Eq + Clone + Debug + Send + 'static,
    V: Clone + Eq + Debug + Send + 'static,
    S: std::hash::BuildHasher + Clone + Send + 'static,
{
    for op in ops {
        match *op {
            LoadOrStore(ref k, ref v) => {
                let (actual, loaded) = a.load_or_store(k.clone(), v.clone());
                let was_present = b.contains_key(k);
                let expected = b.entry(k.clone()).or_insert_with(|| v.clone());
                assert_eq!(&actual, expected);
                assert_eq!(loaded, was_present);
            }
            Load(ref k) => {
                assert_eq!(a.load(k).as_ref(), b.get(k));
            }
            Range(stop_after) => {
                let mut visited = HashSet::new();
                a.range(|k, v| {
                    assert!(visited.insert(k.clone()), "{:?} visited twice", k);
                    assert_eq!(Some(v), b.get(k));
                    visited.len() < stop_after as usize
                });
                assert!(visited.len() <= b.len());
                if (stop_after as usize) > b.len() {
                    assert_eq!(visited.len(), b.len());
                }
            }
            Len => {
                assert_eq!(a.len(), b.len());
            }
            Snapshot => {
                let snapshot = a.snapshot();
                assert_eq!(snapshot.len(), b.len());
            }
        }
    }
}

fn assert_maps_equivalent<K, V, S>(a: &AppendMap<K, V, S>, b: &HashMap<K, V>) -> bool
where
    K: Hash + Eq + Debug + Send + 'static,
    V: Clone + Eq + Debug + Send + 'static,
    S: std::hash::BuildHasher + Send + 'static,
{
    assert_eq!(a.len(), b.len());
    for key in b.keys() {
        assert_eq!(a.load(key).as_ref(), b.get(key), "mismatch for {:?}", key);
    }
    let snapshot = a.snapshot();
    for key in snapshot.keys() {
        assert!(b.contains_key(key), "b does not contain {:?}", key);
    }
    true
}

quickcheck! {
    fn operations_i8(ops: Large<Vec<Op<i8, i8>>>) -> bool {
        let map = AppendMap::new();
        let mut reference = HashMap::new();
        do_ops(&ops, &map, &mut reference);
        assert_maps_equivalent(&map, &reference)
    }

    fn operations_string(ops: Vec<Op<Alpha, i8>>) -> bool {
        let map = AppendMapFnv::default();
        let mut reference = HashMap::new();
        do_ops(&ops, &map, &mut reference);
        assert_maps_equivalent(&map, &reference)
    }

    fn promotion_is_transparent(keys: Vec<u16>, reads: Large<Vec<u16>>) -> bool {
        let map = AppendMap::new();
        let mut reference = HashMap::new();
        for &k in &keys {
            map.load_or_store(k, u32::from(k) * 3);
            reference.entry(k).or_insert(u32::from(k) * 3);
        }
        for &k in reads.iter() {
            assert_eq!(map.load(&k), reference.get(&k).copied());
        }
        assert_maps_equivalent(&map, &reference)
    }
}

/// The operations every mutable map in the crate supports.
trait MutableMap<K, V> {
    fn load(&self, key: &K) -> Option<V>;
    fn store(&mut self, key: K, value: V);
    fn delete(&mut self, key: &K);
    fn load_or_store(&mut self, key: K, value: V) -> (V, bool);
    fn swap(&mut self, key: K, value: V) -> Option<V>;
    fn compare_and_swap(&mut self, key: &K, old: &V, new: V) -> bool;
    fn compare_and_delete(&mut self, key: &K, old: &V) -> bool;
    fn len(&self) -> usize;
}

macro_rules! impl_mutable_map {
    ($map:ident) => {
        impl<K, V> MutableMap<K, V> for $map<K, V>
        where
            K: Hash + Eq + Clone,
            V: Clone + PartialEq,
        {
            fn load(&self, key: &K) -> Option<V> {
                $map::load(self, key)
            }
            fn store(&mut self, key: K, value: V) {
                $map::store(self, key, value)
            }
            fn delete(&mut self, key: &K) {
                $map::delete(self, key)
            }
            fn load_or_store(&mut self, key: K, value: V) -> (V, bool) {
                $map::load_or_store(self, key, value)
            }
            fn swap(&mut self, key: K, value: V) -> Option<V> {
                $map::swap(self, key, value)
            }
            fn compare_and_swap(&mut self, key: &K, old: &V, new: V) -> bool {
                $map::compare_and_swap(self, key, old, new)
            }
            fn compare_and_delete(&mut self, key: &K, old: &V) -> bool {
                $map::compare_and_delete(self, key, old)
            }
            fn len(&self) -> usize {
                $map::len(self)
            }
        }
    };
}

impl_mutable_map!(MutexMap);
impl_mutable_map!(SyncMap);
impl_mutable_map!(UnsyncedMap);

#[derive(Copy, Clone, Debug)]
enum MutOp<K, V> {
    Store(K, V),
    Delete(K),
    Get(K),
    GetOrStore(K, V),
    Swap(K, V),
    CompareAndSwap(K, V, V),
    CompareAndDelete(K, V),
}

impl<K, V> Arbitrary for MutOp<K, V>
where
    K: Arbitrary,
    V: Arbitrary,
{
    fn arbitrary(g: &mut Gen) -> Self {
        match u32::arbitrary(g) % 7 {
            0 => MutOp::Store(K::arbitrary(g), V::arbitrary(g)),
            1 => MutOp::Delete(K::arbitrary(g)),
            2 => MutOp::Get(K::arbitrary(g)),
            3 => MutOp::GetOrStore(K::arbitrary(g), V::arbitrary(g)),
            4 => MutOp::Swap(K::arbitrary(g), V::arbitrary(g)),
            5 => MutOp::CompareAndSwap(K::arbitrary(g), V::arbitrary(g), V::arbitrary(g)),
            _ => MutOp::CompareAndDelete(K::arbitrary(g), V::arbitrary(g)),
        }
    }
}

fn check_mutable_map<M>(ops: &[MutOp<u8, u8>], mut map: M) -> bool
where
    M: MutableMap<u8, u8>,
{
    let mut reference: HashMap<u8, u8> = HashMap::new();
    for op in ops {
        match *op {
            MutOp::Store(k, v) => {
                map.store(k, v);
                reference.insert(k, v);
            }
            MutOp::Delete(k) => {
                map.delete(&k);
                reference.remove(&k);
            }
            MutOp::Get(k) => {
                assert_eq!(map.load(&k), reference.get(&k).copied());
            }
            MutOp::GetOrStore(k, v) => {
                let expected = match reference.get(&k) {
                    Some(&existing) => (existing, true),
                    None => {
                        reference.insert(k, v);
                        (v, false)
                    }
                };
                assert_eq!(map.load_or_store(k, v), expected);
            }
            MutOp::Swap(k, v) => {
                assert_eq!(map.swap(k, v), reference.insert(k, v));
            }
            MutOp::CompareAndSwap(k, old, new) => {
                let expected = reference.get(&k) == Some(&old);
                if expected {
                    reference.insert(k, new);
                }
                assert_eq!(map.compare_and_swap(&k, &old, new), expected);
            }
            MutOp::CompareAndDelete(k, old) => {
                let expected = reference.get(&k) == Some(&old);
                if expected {
                    reference.remove(&k);
                }
                assert_eq!(map.compare_and_delete(&k, &old), expected);
            }
        }
        assert_eq!(map.len(), reference.len());
    }
    true
}

quickcheck! {
    fn mutex_map_operations(ops: Vec<MutOp<u8, u8>>) -> bool {
        check_mutable_map(&ops, MutexMap::new())
    }

    fn sync_map_operations(ops: Vec<MutOp<u8, u8>>) -> bool {
        check_mutable_map(&ops, SyncMap::new())
    }

    fn unsynced_map_operations(ops: Vec<MutOp<u8, u8>>) -> bool {
        check_mutable_map(&ops, UnsyncedMap::new())
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
struct Alpha(String);

impl Deref for Alpha {
    type Target = String;
    fn deref(&self) -> &String {
        &self.0
    }
}

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

impl Arbitrary for Alpha {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = u32::arbitrary(g) % g.size() as u32;
        let len = min(len, 16);
        Alpha(
            (0..len)
                .map(|_| ALPHABET[usize::arbitrary(g) % ALPHABET.len()] as char)
                .collect(),
        )
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new((**self).shrink().map(Alpha))
    }
}

/// quickcheck Arbitrary adaptor -- make a larger vec
#[derive(Clone, Debug)]
struct Large<T>(T);

impl<T> Deref for Large<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> Arbitrary for Large<Vec<T>>
where
    T: Arbitrary,
{
    fn arbitrary(g: &mut Gen) -> Self {
        let bound = (g.size() * 10) as u32;
        let len = u32::arbitrary(g) % bound;
        Large((0..len).map(|_| T::arbitrary(g)).collect())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new((**self).shrink().map(Large))
    }
}
