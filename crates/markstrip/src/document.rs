//! Document boundary model: named, multi-valued, weighted fields.

use alloc::{
    collections::btree_map::{self, BTreeMap},
    string::String,
    vec::Vec,
};

/// A single field value.
///
/// Only [`FieldValue::Text`] is ever rewritten by the processor; every other
/// variant passes through untouched.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Binary(Vec<u8>),
}

impl FieldValue {
    /// Returns the text if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.into())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Binary(value)
    }
}

/// An ordered collection of values with an index-time weight.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Field {
    pub values: Vec<FieldValue>,
    #[cfg_attr(any(test, feature = "serde"), serde(default = "default_boost"))]
    pub boost: f32,
}

#[cfg(any(test, feature = "serde"))]
fn default_boost() -> f32 {
    1.0
}

impl Default for Field {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            boost: 1.0,
        }
    }
}

impl Field {
    /// A field with `values` and the neutral boost.
    #[must_use]
    pub fn new(values: Vec<FieldValue>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    /// Sets the boost.
    #[must_use]
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }
}

/// A document: fields by name, plus a document-level boost.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Document {
    pub fields: BTreeMap<String, Field>,
    #[cfg_attr(any(test, feature = "serde"), serde(default = "default_boost"))]
    pub boost: f32,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            fields: BTreeMap::new(),
            boost: 1.0,
        }
    }
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value to `name`, creating the field if needed.
    pub fn add_value(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields
            .entry(name.into())
            .or_default()
            .values
            .push(value.into());
    }

    /// Replaces the field `name`, returning the previous one.
    pub fn set_field(&mut self, name: impl Into<String>, field: Field) -> Option<Field> {
        self.fields.insert(name.into(), field)
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Field> {
        self.fields.remove(name)
    }

    /// Fields in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Field> {
        self.fields.iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Field);
    type IntoIter = btree_map::Iter<'a, String, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
