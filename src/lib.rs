//! An append-only concurrent map with a lock-free read path, and a handful of small generic
//! helpers for maps and slices.
//!
//! The centerpiece of this crate is [`AppendMap`]. It is made for the kind of map that fills up
//! once and is then read over and over from many threads: interned names, per-key caches,
//! registries of handles that live as long as the program does. For those maps, a
//! `Mutex<HashMap>` is correct but every read contends on the same lock, and a `RwLock<HashMap>`
//! still bounces the lock's cache line between cores on every read.
//!
//! `AppendMap` keeps two tiers:
//!
//!  - A _fast_ tier: an immutable table published behind an atomic pointer. Reads against it take
//!    no lock at all.
//!  - A _slow_ tier: a mutable table behind a mutex, which receives every new key.
//!
//! Reads that miss the fast tier fall back to the slow tier, and count how often they had to. Once
//! the slow tier has served as many hits as it has entries, the whole slow tier is published as the
//! new fast tier in one go. That one-time copy is amortized over the slow reads that preceded it,
//! in much the same way that a growing vector amortizes its reallocations over the pushes that
//! filled it.
//!
//! The map is append-only: there is no way to remove or overwrite a key once stored. That is what
//! makes it safe to hand out the fast tier to readers without any coordination beyond the pointer
//! swap.
//!
//! To help you decide whether `AppendMap` is right for you:
//!
//!  - Reads of keys that have been promoted cost one atomic load plus a hash lookup.
//!  - Reads of keys stored since the last promotion, and reads of missing keys, take the mutex.
//!  - The first store after a promotion copies the whole table. Maps that keep growing quickly
//!    will pay for that copy over and over; use [`MutexMap`] or [`SyncMap`] for those.
//!
//! # Other maps
//!
//! [`MutexMap`], [`SyncMap`] and [`UnsyncedMap`] share the `load`/`load_or_store`/`range`
//! vocabulary with [`AppendMap`], so code can move between them as its synchronization needs
//! change. [`map::ordered`], [`map::min_key`] and [`map::max_key`] work on any map.
//!
//! # Helpers
//!
//! [`slice`] has small order-preserving slice utilities, [`cmp`] has variadic-style `min`/`max`
//! and `coalesce`, and [`sort_with_data`] sorts one slice while carrying a second one along.
//! With the `serde` feature, [`ordered_object::OrderedObject`] decodes JSON objects without
//! losing member order.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cmp;
pub mod map;
#[cfg(feature = "serde")]
pub mod ordered_object;
pub mod slice;
mod sort;

mod external_trait_impls;

pub use map::{AppendMap, MutexMap, Snapshot, SyncMap, UnsyncedMap};
pub use sort::sort_with_data;

/// Default hasher for the maps in this crate.
#[cfg(feature = "ahash")]
pub type DefaultHashBuilder = ahash_::RandomState;

/// Default hasher for the maps in this crate.
#[cfg(not(feature = "ahash"))]
pub type DefaultHashBuilder = std::collections::hash_map::RandomState;
