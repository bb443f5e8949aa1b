//! Typed, JSON-serializable attribute values attached to operations.

use serde::{Deserialize, Serialize};

/// A single attribute value attached to an [`Operation`](super::operation::Operation).
///
/// Comparison is structural (`PartialEq` derives field-by-field equality).
/// Serialization to the wire form of the JSON importer is a separate
/// concern handled in [`crate::load`]; this type only carries the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A boolean scalar.
    Bool(bool),
    /// A signed 64-bit integer scalar.
    Int(i64),
    /// A 64-bit floating-point scalar. Must be finite to be JSON-serializable.
    Double(f64),
    /// A UTF-8 string scalar.
    String(String),
    /// An array of booleans.
    BoolArray(Vec<bool>),
    /// An array of signed 64-bit integers.
    IntArray(Vec<i64>),
    /// An array of 64-bit floats. Every element must be finite.
    DoubleArray(Vec<f64>),
    /// An array of UTF-8 strings.
    StringArray(Vec<String>),
}

/// Tag identifying which of [`AttributeValue`]'s eight shapes a value holds,
/// independent of the value itself. Used by the schema registry to check an
/// attribute's declared type without caring about its contents.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// Tag for [`AttributeValue::Bool`].
    Bool,
    /// Tag for [`AttributeValue::Int`].
    Int,
    /// Tag for [`AttributeValue::Double`].
    Double,
    /// Tag for [`AttributeValue::String`].
    String,
    /// Tag for [`AttributeValue::BoolArray`].
    BoolArray,
    /// Tag for [`AttributeValue::IntArray`].
    IntArray,
    /// Tag for [`AttributeValue::DoubleArray`].
    DoubleArray,
    /// Tag for [`AttributeValue::StringArray`].
    StringArray,
}

impl AttributeValue {
    /// Returns this value's [`AttributeKind`] tag.
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Bool(_) => AttributeKind::Bool,
            AttributeValue::Int(_) => AttributeKind::Int,
            AttributeValue::Double(_) => AttributeKind::Double,
            AttributeValue::String(_) => AttributeKind::String,
            AttributeValue::BoolArray(_) => AttributeKind::BoolArray,
            AttributeValue::IntArray(_) => AttributeKind::IntArray,
            AttributeValue::DoubleArray(_) => AttributeKind::DoubleArray,
            AttributeValue::StringArray(_) => AttributeKind::StringArray,
        }
    }

    /// Returns the string value if this is a [`AttributeValue::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the length of an array-shaped attribute, or `None` for scalars.
    pub fn array_len(&self) -> Option<usize> {
        match self {
            AttributeValue::BoolArray(v) => Some(v.len()),
            AttributeValue::IntArray(v) => Some(v.len()),
            AttributeValue::DoubleArray(v) => Some(v.len()),
            AttributeValue::StringArray(v) => Some(v.len()),
            _ => None,
        }
    }

    /// Returns `true` iff this value can be serialized as JSON: floats (scalar
    /// or array) must be finite, and all strings are (trivially, by Rust's
    /// `String` invariant) valid UTF-8.
    pub fn is_json_serializable(&self) -> bool {
        match self {
            AttributeValue::Double(d) => d.is_finite(),
            AttributeValue::DoubleArray(ds) => ds.iter().all(|d| d.is_finite()),
            _ => true,
        }
    }
}
