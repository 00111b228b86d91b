//! Output documents and the values they hold.
//!
//! A [`Document`] is the flat, insertion-ordered mapping produced for one source
//! record. Every entry holds a [`Value`]: a single string or an ordered list of
//! strings. Absent results are never stored; assigning `None` removes the key.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A scalar or sequence value produced by extraction or a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A single string.
    Text(String),
    /// An ordered sequence of strings.
    List(Vec<String>),
}

impl Value {
    /// Whether the value stringifies to empty.
    ///
    /// A list is blank when every element is empty (including the empty list).
    /// Matches [`Display`](fmt::Display), which skips empty list elements.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Text(s) => s.is_empty(),
            Value::List(items) => items.iter().all(String::is_empty),
        }
    }

    /// The string of a [`Value::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::List(_) => None,
        }
    }

    /// The elements of a [`Value::List`].
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::Text(_) => None,
            Value::List(items) => Some(items),
        }
    }

    /// Flatten into a list of strings; text becomes a one-element list.
    #[must_use]
    pub fn into_strings(self) -> Vec<String> {
        match self {
            Value::Text(s) => vec![s],
            Value::List(items) => items,
        }
    }

    /// Iterate over the string(s) held by the value.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let items: &[String] = match self {
            Value::Text(s) => std::slice::from_ref(s),
            Value::List(items) => items,
        };
        items.iter().map(String::as_str)
    }
}

/// Text as is; list elements separated by a space, empty elements skipped.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::List(items) => {
                for (i, item) in items.iter().filter(|s| !s.is_empty()).enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    f.write_str(item)?;
                }
                Ok(())
            },
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(str::to_string).collect())
    }
}

/// A flat output document: field name → value, in insertion order.
///
/// Re-assigning an existing field keeps its original position and replaces
/// the value, so the last assignment wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: IndexMap<String, Value>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a field. `None` removes any existing entry.
    pub fn set(&mut self, field: impl Into<String>, value: Option<Value>) {
        let field = field.into();
        match value {
            Some(value) => {
                self.fields.insert(field, value);
            },
            None => {
                self.fields.shift_remove(&field);
            },
        }
    }

    /// Insert a present value, returning the previous one.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    /// Get a field's value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Get a field's value as text, if it is a single string.
    #[must_use]
    pub fn get_text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_text)
    }

    /// Remove a field, preserving the order of the others.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.shift_remove(field)
    }

    /// Whether the field is present.
    #[must_use]
    pub fn contains_key(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the document has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(field, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&String, &mut Value) -> bool,
    {
        self.fields.retain(keep);
    }

    /// Consume the document into its underlying map.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.fields
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Document {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
