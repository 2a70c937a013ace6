//! Map wrappers sharing a `load`/`load_or_store`/`range` vocabulary, and helpers for plain maps.

mod append;
mod mutex;
mod ordered;
mod snapshot;
mod sync;
mod unsynced;

pub use self::append::AppendMap;
pub use self::mutex::MutexMap;
pub use self::ordered::{max_key, min_key, ordered, Ordered};
pub use self::snapshot::{Iter, Keys, Snapshot, Values};
pub use self::sync::SyncMap;
pub use self::unsynced::UnsyncedMap;

#[cfg(feature = "rayon")]
pub use crate::external_trait_impls::rayon::{ParIter, ParKeys, ParValues};
