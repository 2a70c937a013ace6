use crate::map::{AppendMap, Snapshot};
use core::hash::{BuildHasher, Hash};
use hashbrown::HashMap;
use serde_::de::{Deserialize, Deserializer};
use serde_::ser::{Serialize, Serializer};

impl<K, V, S> Serialize for Snapshot<K, V, S>
where
    K: Serialize,
    V: Serialize,
{
    #[cfg_attr(feature = "inline-more", inline)]
    fn serialize<T: Serializer>(&self, serializer: T) -> Result<T::Ok, T::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<K, V, S> Serialize for AppendMap<K, V, S>
where
    K: Serialize + Hash + Eq + Send + 'static,
    V: Serialize + Send + 'static,
    S: BuildHasher + Send + 'static,
{
    /// Serializes a snapshot of the map. Pending stores are promoted first.
    #[cfg_attr(feature = "inline-more", inline)]
    fn serialize<T: Serializer>(&self, serializer: T) -> Result<T::Ok, T::Error> {
        self.snapshot().serialize(serializer)
    }
}

impl<'de, K, V, S> Deserialize<'de> for AppendMap<K, V, S>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
    S: BuildHasher + Default + Clone,
{
    /// Deserializes straight into the map's lock-free tier.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        HashMap::<K, V, S>::deserialize(deserializer).map(AppendMap::from)
    }
}
