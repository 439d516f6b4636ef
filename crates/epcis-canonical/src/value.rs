//! Field trees and their typed leaves.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Declared semantic type of a leaf value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScalarType {
    /// UTF-8 text, taken verbatim.
    String,
    /// Integer or decimal number.
    Number,
    /// `true` / `false`.
    Boolean,
    /// Hex-encoded binary blob.
    HexBinary,
    /// ISO-8601 timestamp with an explicit offset.
    Timestamp,
    /// URI or opaque identifier.
    Uri,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::String => "string",
            ScalarType::Number => "number",
            ScalarType::Boolean => "boolean",
            ScalarType::HexBinary => "hexBinary",
            ScalarType::Timestamp => "timestamp",
            ScalarType::Uri => "uri",
        };
        f.write_str(name)
    }
}

/// A leaf value together with the type it was declared with.
///
/// The raw value is kept as JSON so that a mismatch between the declared
/// type and the runtime shape surfaces at encoding time instead of being
/// coerced away by the builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scalar {
    /// Declared type.
    pub ty: ScalarType,
    /// Raw value as supplied.
    pub value: Value,
}

impl Scalar {
    /// Creates a scalar of the given type.
    pub fn new(ty: ScalarType, value: impl Into<Value>) -> Self {
        Self {
            ty,
            value: value.into(),
        }
    }
}

/// Field tree node: a typed scalar, an ordered array, or an object.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Typed leaf.
    Scalar(Scalar),
    /// Ordered sequence; element order is significant.
    Array(Vec<FieldValue>),
    /// Keyed members; key order is not significant.
    Object(FieldMap),
}

impl FieldValue {
    /// String leaf.
    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::new(ScalarType::String, value.into()))
    }

    /// Number leaf. Accepts JSON numbers or numeric strings.
    pub fn number(value: impl Into<Value>) -> Self {
        Self::Scalar(Scalar::new(ScalarType::Number, value))
    }

    /// Boolean leaf.
    pub fn boolean(value: bool) -> Self {
        Self::Scalar(Scalar::new(ScalarType::Boolean, value))
    }

    /// Hex-binary leaf.
    pub fn hex_binary(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::new(ScalarType::HexBinary, value.into()))
    }

    /// Timestamp leaf.
    pub fn timestamp(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::new(ScalarType::Timestamp, value.into()))
    }

    /// URI leaf.
    pub fn uri(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::new(ScalarType::Uri, value.into()))
    }

    /// Array of values, order preserved.
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    /// Object built from `(qualified name, value)` pairs.
    pub fn object<I, K, V>(members: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self::Object(members.into_iter().collect())
    }
}

impl From<Scalar> for FieldValue {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<FieldMap> for FieldValue {
    fn from(value: FieldMap) -> Self {
        Self::Object(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        Self::Array(value)
    }
}

/// Keyed members of an object node.
///
/// Keys are unique; inserting an existing key replaces its value in place.
/// Iteration follows insertion order, which canonicalization ignores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a member, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Looks up a member by its key as written.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Mutable lookup by key as written.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut FieldValue> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Removes a member.
    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Whether the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no members.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = FieldMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Into<String>, V: Into<FieldValue>> Extend<(K, V)> for FieldMap {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}
