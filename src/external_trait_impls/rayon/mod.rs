//! Rayon extensions for `AppendMap` and its snapshots.

mod map;

pub use self::map::{ParIter, ParKeys, ParValues};
