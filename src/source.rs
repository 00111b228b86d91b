//! The capability every mappable record exposes.
//!
//! The engine never looks inside a record directly. It asks for a field by
//! tag, optionally narrowed to a subfield code, and gets back a scalar, a
//! sequence, or nothing. Leader-based rules additionally read the record's
//! fixed-length header.

use crate::document::Value;
use crate::extract::FieldSpec;

/// A source record that can be queried by field code.
///
/// Implementations return `None` for anything that is missing; a missing
/// field is never an error.
///
/// # Examples
///
/// ```
/// use marcsift::{SourceRecord, Value};
/// use std::collections::HashMap;
///
/// struct Flat(HashMap<String, String>);
///
/// impl SourceRecord for Flat {
///     fn field_value(&self, tag: &str) -> Option<Value> {
///         self.0.get(tag).map(|v| Value::from(v.as_str()))
///     }
///
///     fn subfield_value(&self, _tag: &str, _code: char) -> Option<Value> {
///         None
///     }
///
///     fn occurrences(&self, tag: &str, code: Option<char>) -> Vec<String> {
///         match code {
///             None => self.0.get(tag).cloned().into_iter().collect(),
///             Some(_) => Vec::new(),
///         }
///     }
/// }
/// ```
pub trait SourceRecord {
    /// The whole value of the first field with `tag`.
    fn field_value(&self, tag: &str) -> Option<Value>;

    /// The first `code` subfield of the first field with `tag`.
    fn subfield_value(&self, tag: &str, code: char) -> Option<Value>;

    /// Every occurrence of a field (or of one of its subfields) across
    /// repeated fields, in record order.
    fn occurrences(&self, tag: &str, code: Option<char>) -> Vec<String>;

    /// The fixed-length record header, when the record has one.
    fn leader_str(&self) -> Option<String> {
        None
    }

    /// Raw data of a control field (fixed-position coded data).
    fn control_field(&self, tag: &str) -> Option<&str> {
        let _ = tag;
        None
    }

    /// A JSON rendering of the whole record, for display fields.
    fn to_marc_json(&self) -> Option<serde_json::Value> {
        None
    }

    /// Resolve a parsed field code against the record.
    fn resolve(&self, spec: &FieldSpec) -> Option<Value> {
        match spec.sub_code {
            Some(code) => self.subfield_value(&spec.main_code, code),
            None => self.field_value(&spec.main_code),
        }
    }
}

impl<T: SourceRecord + ?Sized> SourceRecord for Box<T> {
    fn field_value(&self, tag: &str) -> Option<Value> {
        (**self).field_value(tag)
    }

    fn subfield_value(&self, tag: &str, code: char) -> Option<Value> {
        (**self).subfield_value(tag, code)
    }

    fn occurrences(&self, tag: &str, code: Option<char>) -> Vec<String> {
        (**self).occurrences(tag, code)
    }

    fn leader_str(&self) -> Option<String> {
        (**self).leader_str()
    }

    fn control_field(&self, tag: &str) -> Option<&str> {
        (**self).control_field(tag)
    }

    fn to_marc_json(&self) -> Option<serde_json::Value> {
        (**self).to_marc_json()
    }
}
