//! JSON objects that remember the order of their members.
//!
//! Decoding a JSON object into a map loses the order in which its members appeared.
//! [`OrderedObject`] decodes into a list of [`Member`]s instead, so the order survives a round
//! trip. It works with any self-describing serde format, not just JSON.
//!
//! ```
//! use appendix::ordered_object::OrderedObject;
//!
//! let obj: OrderedObject<u32> = serde_json::from_str(r#"{"x": 5, "a": 7}"#).unwrap();
//! let keys: Vec<_> = obj.iter().map(|m| m.key.as_str()).collect();
//! assert_eq!(keys, ["x", "a"]);
//! assert_eq!(serde_json::to_string(&obj).unwrap(), r#"{"x":5,"a":7}"#);
//! ```

use core::fmt;
use core::marker::PhantomData;
use serde_::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_::ser::{Serialize, SerializeMap, Serializer};

/// A single key-value pair in an [`OrderedObject`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Member<V> {
    /// The member's name.
    pub key: String,
    /// The member's value.
    pub value: V,
}

/// An object with string keys whose members keep the order they were decoded (or pushed) in.
///
/// Repeated keys are kept as separate members. Decoding `null` gives an empty object.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrderedObject<V>(pub Vec<Member<V>>);

impl<V> OrderedObject<V> {
    /// Creates an empty object.
    pub fn new() -> Self {
        OrderedObject(Vec::new())
    }

    /// Appends a member.
    pub fn push(&mut self, key: impl Into<String>, value: V) {
        self.0.push(Member {
            key: key.into(),
            value,
        });
    }

    /// Returns the value of the first member called `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|m| m.key == key).map(|m| &m.value)
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the object has no members.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the members in order.
    pub fn iter(&self) -> core::slice::Iter<'_, Member<V>> {
        self.0.iter()
    }
}

impl<V> Default for OrderedObject<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> IntoIterator for OrderedObject<V> {
    type Item = Member<V>;
    type IntoIter = std::vec::IntoIter<Member<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a OrderedObject<V> {
    type Item = &'a Member<V>;
    type IntoIter = core::slice::Iter<'a, Member<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V> core::iter::FromIterator<(K, V)> for OrderedObject<V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        OrderedObject(
            iter.into_iter()
                .map(|(key, value)| Member {
                    key: key.into(),
                    value,
                })
                .collect(),
        )
    }
}

impl<V: Serialize> Serialize for OrderedObject<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for member in &self.0 {
            map.serialize_entry(&member.key, &member.value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedObject<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ObjectVisitor(PhantomData))
    }
}

struct ObjectVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for ObjectVisitor<V> {
    type Value = OrderedObject<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object or null")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(OrderedObject::new())
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(OrderedObject::new())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        OrderedObject::deserialize(deserializer)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut members = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, V>()? {
            members.push(Member { key, value });
        }
        Ok(OrderedObject(members))
    }
}
