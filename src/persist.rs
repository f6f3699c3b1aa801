//! serde support. Both containers persist as their raw entry list plus the
//! advisory flags. Loading reads only the list and runs the load hook, so
//! the lookup view and flags are recomputed rather than trusted.

use crate::dictionary::{RawEntry, SerializableDictionary};
use crate::set::SerializableHashSet;
use core::hash::{BuildHasher, Hash};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize)]
#[serde(rename = "SerializableDictionary")]
struct DictionaryOut<'a, K, V> {
    entries: &'a [RawEntry<K, V>],
    has_null_keys: bool,
    has_duplicate_keys: bool,
}

#[derive(Deserialize)]
#[serde(rename = "SerializableDictionary")]
struct DictionaryIn<K, V> {
    entries: Vec<RawEntry<K, V>>,
}

#[derive(Serialize)]
#[serde(rename = "SerializableHashSet")]
struct SetOut<'a, T> {
    entries: &'a [T],
    has_duplicate_values: bool,
}

#[derive(Deserialize)]
#[serde(rename = "SerializableHashSet")]
struct SetIn<T> {
    entries: Vec<T>,
}

impl<K, V, S> Serialize for SerializableDictionary<K, V, S>
where
    K: Serialize + Eq + Hash,
    V: Serialize,
    S: BuildHasher + Clone + Default,
{
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        DictionaryOut {
            entries: self.entries(),
            has_null_keys: self.has_null_keys(),
            has_duplicate_keys: self.has_duplicate_keys(),
        }
        .serialize(serializer)
    }
}

impl<'de, K, V, S> Deserialize<'de> for SerializableDictionary<K, V, S>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
    S: BuildHasher + Clone + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = DictionaryIn::deserialize(deserializer)?;
        Ok(Self::from_raw_with_hasher(raw.entries, S::default()))
    }
}

impl<T, S> Serialize for SerializableHashSet<T, S>
where
    T: Serialize + Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        SetOut {
            entries: self.entries(),
            has_duplicate_values: self.has_duplicate_values(),
        }
        .serialize(serializer)
    }
}

impl<'de, T, S> Deserialize<'de> for SerializableHashSet<T, S>
where
    T: Deserialize<'de> + Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = SetIn::deserialize(deserializer)?;
        Ok(Self::from_raw_with_hasher(raw.entries, S::default()))
    }
}
