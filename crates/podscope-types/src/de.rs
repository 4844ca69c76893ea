//! Lenient deserialization helpers for backend payloads.
//!
//! The backend serializes Python objects straight to JSON, so any field may
//! arrive as `null`, and mappings must keep the key order they were sent in.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::Value;

/// Deserialize a value that may be `null`, falling back to `Default`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Deserialize<'de> + Default,
    D: Deserializer<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Render a JSON value the way a template literal would show it.
///
/// Strings are shown without quotes, `null` as an empty string and
/// structured values as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Whether a JSON value counts as present for rendering purposes.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A string-to-string mapping that keeps insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderedMap(Vec<(String, String)>);

impl OrderedMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a value by key (first match wins)
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OrderedMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for OrderedMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedMapVisitor;

        impl<'de> Visitor<'de> for OrderedMapVisitor {
            type Value = OrderedMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of string keys")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = OrderedMap::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    map.insert(key, display_value(&value));
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor)
    }
}

/// Collect the entries of a JSON object in order, as raw values.
pub(crate) fn ordered_entries<'de, A>(mut access: A) -> Result<Vec<(String, Value)>, A::Error>
where
    A: MapAccess<'de>,
{
    let mut entries = Vec::new();
    while let Some(entry) = access.next_entry::<String, Value>()? {
        entries.push(entry);
    }
    Ok(entries)
}

/// Error helper for visitors that need a specific key.
pub(crate) fn missing<E: de::Error>(field: &'static str) -> E {
    E::missing_field(field)
}
