//! Lenient deserializers for knowledge documents.
//!
//! Knowledge documents are hand-maintained JSON. A wrong scalar type or one
//! malformed list element must not take the whole document down, so the
//! schema in [`crate::models`] routes its fields through these helpers:
//!
//! | Helper | Accepts | Produces |
//! |--------|---------|----------|
//! | [`text`] | string, number, bool, null | `String` |
//! | [`texts`] | array of scalars (non-scalars skipped) | `Vec<String>` |
//! | [`seq`] | array of `T` (malformed elements skipped) | `Vec<T>` |
//! | [`Records`] | same as [`seq`], usable as a type | `Records<T>` |
//! | [`KeyedMap`] | object of `T` (malformed entries skipped) | ordered pairs |

use std::fmt;
use std::marker::PhantomData;

use serde::de::{DeserializeOwned, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Render a scalar JSON value as text. Objects and arrays yield `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value).unwrap_or_else(|| {
        tracing::warn!("expected a scalar, found a nested value; using empty text");
        String::new()
    }))
}

pub fn texts<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .iter()
            .filter_map(scalar_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::Null => Vec::new(),
        // A lone string where a list was expected is treated as a one-element list.
        other => scalar_text(&other)
            .filter(|s| !s.is_empty())
            .into_iter()
            .collect(),
    })
}

pub fn seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.into_iter().filter_map(lenient_element).collect(),
        Value::Null => Vec::new(),
        _ => {
            tracing::warn!("expected a list, found a scalar or object; using empty list");
            Vec::new()
        }
    })
}

fn lenient_element<T: DeserializeOwned>(value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(item) => Some(item),
        Err(e) => {
            tracing::warn!(error = %e, "skipping malformed knowledge record");
            None
        }
    }
}

/// A list whose malformed elements are skipped instead of failing the parent.
///
/// Use where a list is nested inside another container (e.g. the values of a
/// [`KeyedMap`]) and a field-level `deserialize_with = "seq"` is unavailable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Records<T>(pub Vec<T>);

impl<T> Default for Records<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> std::ops::Deref for Records<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Records<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        seq(deserializer).map(Records)
    }
}

/// A JSON object decoded into `(key, value)` pairs in document order.
///
/// Lookups that promise "first match wins" iterate this order, so it must
/// survive deserialization (a `HashMap` or `BTreeMap` would not).
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedMap<T>(Vec<(String, T)>);

impl<T> KeyedMap<T> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<T> Default for KeyedMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(String, T)> for KeyedMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for KeyedMap<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KeyedVisitor<T>(PhantomData<T>);

        impl<'de, T: DeserializeOwned> Visitor<'de> for KeyedVisitor<T> {
            type Value = KeyedMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    match serde_json::from_value(value) {
                        Ok(item) => entries.push((key, item)),
                        Err(e) => {
                            tracing::warn!(key = %key, error = %e, "skipping malformed keyed entry")
                        }
                    }
                }
                Ok(KeyedMap(entries))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(KeyedMap::new())
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                tracing::warn!("expected an object, found a list; using empty map");
                Ok(KeyedMap::new())
            }

            fn visit_str<E>(self, _v: &str) -> Result<Self::Value, E> {
                tracing::warn!("expected an object, found a string; using empty map");
                Ok(KeyedMap::new())
            }

            fn visit_bool<E>(self, _v: bool) -> Result<Self::Value, E> {
                Ok(KeyedMap::new())
            }

            fn visit_i64<E>(self, _v: i64) -> Result<Self::Value, E> {
                Ok(KeyedMap::new())
            }

            fn visit_u64<E>(self, _v: u64) -> Result<Self::Value, E> {
                Ok(KeyedMap::new())
            }

            fn visit_f64<E>(self, _v: f64) -> Result<Self::Value, E> {
                Ok(KeyedMap::new())
            }
        }

        deserializer.deserialize_any(KeyedVisitor(PhantomData))
    }
}

impl<T: Serialize> Serialize for KeyedMap<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}
