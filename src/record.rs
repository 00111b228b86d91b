//! MARC bibliographic record structures.
//!
//! This module provides the concrete record shape the engine maps by default:
//! - [`Record`]: leader, control fields and data fields
//! - [`Field`]: variable data fields (010+)
//! - [`Subfield`]: named data elements within fields
//!
//! [`Record`] implements [`SourceRecord`], so field codes such as `"245a"`
//! resolve against it directly.
//!
//! # Examples
//!
//! ```
//! use marcsift::{Field, Leader, Record};
//!
//! let record = Record::builder(Leader::default())
//!     .control_field_str("001", "12345")
//!     .field(
//!         Field::builder("245".to_string(), '1', '0')
//!             .subfield_str('a', "Title")
//!             .build(),
//!     )
//!     .build();
//!
//! assert_eq!(record.get_control_field("001"), Some("12345"));
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::document::Value;
use crate::leader::Leader;
use crate::source::SourceRecord;

/// A MARC bibliographic record
///
/// Fields are stored in insertion order using `IndexMap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record leader (24 bytes)
    pub leader: Leader,
    /// Control fields (000-009) - tag -> value
    pub control_fields: IndexMap<String, String>,
    /// Data fields (010+) - tag -> fields
    pub fields: IndexMap<String, Vec<Field>>,
}

/// A data field in a MARC record (fields 010 and higher)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field tag (3 digits)
    pub tag: String,
    /// First indicator
    pub indicator1: char,
    /// Second indicator
    pub indicator2: char,
    /// Subfields (inline storage for the common case of four or fewer)
    pub subfields: SmallVec<[Subfield; 4]>,
}

/// A subfield within a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subfield {
    /// Subfield code (single character)
    pub code: char,
    /// Subfield value
    pub value: String,
}

impl Record {
    /// Create a new MARC record with the given leader
    #[must_use]
    pub fn new(leader: Leader) -> Self {
        Record {
            leader,
            control_fields: IndexMap::new(),
            fields: IndexMap::new(),
        }
    }

    /// Create a builder for fluently constructing MARC records
    #[must_use]
    pub fn builder(leader: Leader) -> RecordBuilder {
        RecordBuilder {
            record: Record::new(leader),
        }
    }

    /// Add a control field (000-009)
    pub fn add_control_field(&mut self, tag: String, value: String) {
        self.control_fields.insert(tag, value);
    }

    /// Add a control field using string slices
    pub fn add_control_field_str(&mut self, tag: &str, value: &str) {
        self.add_control_field(tag.to_string(), value.to_string());
    }

    /// Get a control field value
    #[must_use]
    pub fn get_control_field(&self, tag: &str) -> Option<&str> {
        self.control_fields.get(tag).map(String::as_str)
    }

    /// Add a data field
    pub fn add_field(&mut self, field: Field) {
        self.fields.entry(field.tag.clone()).or_default().push(field);
    }

    /// Get all fields with a given tag
    #[must_use]
    pub fn get_fields(&self, tag: &str) -> Option<&[Field]> {
        self.fields.get(tag).map(Vec::as_slice)
    }

    /// Get first field with a given tag
    #[must_use]
    pub fn get_field(&self, tag: &str) -> Option<&Field> {
        self.fields.get(tag).and_then(|v| v.first())
    }

    /// Iterate over all data fields in insertion order
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values().flat_map(|v| v.iter())
    }

    /// Iterate over fields matching a specific tag
    pub fn fields_by_tag(&self, tag: &str) -> impl Iterator<Item = &Field> {
        self.fields.get(tag).map(|v| v.iter()).into_iter().flatten()
    }

    /// Iterate over all control fields as `(tag, value)` pairs
    pub fn control_fields_iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.control_fields
            .iter()
            .map(|(tag, value)| (tag.as_str(), value.as_str()))
    }
}

impl SourceRecord for Record {
    fn field_value(&self, tag: &str) -> Option<Value> {
        if let Some(value) = self.get_control_field(tag) {
            return Some(Value::Text(value.to_string()));
        }
        self.get_field(tag).map(|field| Value::Text(field.value()))
    }

    fn subfield_value(&self, tag: &str, code: char) -> Option<Value> {
        self.get_field(tag)?
            .get_subfield(code)
            .map(|v| Value::Text(v.to_string()))
    }

    fn occurrences(&self, tag: &str, code: Option<char>) -> Vec<String> {
        if let Some(value) = self.get_control_field(tag) {
            return match code {
                None => vec![value.to_string()],
                Some(_) => Vec::new(),
            };
        }
        match code {
            None => self.fields_by_tag(tag).map(Field::value).collect(),
            Some(code) => self
                .fields_by_tag(tag)
                .flat_map(|field| field.subfields_by_code(code))
                .map(str::to_string)
                .collect(),
        }
    }

    fn leader_str(&self) -> Option<String> {
        Some(self.leader.to_string())
    }

    fn control_field(&self, tag: &str) -> Option<&str> {
        self.get_control_field(tag)
    }

    fn to_marc_json(&self) -> Option<serde_json::Value> {
        Some(crate::json::record_to_json(self))
    }
}

/// Builder for fluently constructing MARC records
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    /// Add a control field
    #[must_use]
    pub fn control_field(mut self, tag: String, value: String) -> Self {
        self.record.add_control_field(tag, value);
        self
    }

    /// Add a control field using string slices
    #[must_use]
    pub fn control_field_str(mut self, tag: &str, value: &str) -> Self {
        self.record.add_control_field_str(tag, value);
        self
    }

    /// Add a data field
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.record.add_field(field);
        self
    }

    /// Finish building the record
    #[must_use]
    pub fn build(self) -> Record {
        self.record
    }
}

impl Field {
    /// Create a new data field
    #[must_use]
    pub fn new(tag: String, indicator1: char, indicator2: char) -> Self {
        Field {
            tag,
            indicator1,
            indicator2,
            subfields: SmallVec::new(),
        }
    }

    /// Create a builder for fluently constructing a field
    #[must_use]
    pub fn builder(tag: String, indicator1: char, indicator2: char) -> FieldBuilder {
        FieldBuilder {
            field: Field::new(tag, indicator1, indicator2),
        }
    }

    /// Add a subfield
    pub fn add_subfield(&mut self, code: char, value: String) {
        self.subfields.push(Subfield { code, value });
    }

    /// Add a subfield using a string slice
    pub fn add_subfield_str(&mut self, code: char, value: &str) {
        self.add_subfield(code, value.to_string());
    }

    /// Get the first value of a subfield
    #[must_use]
    pub fn get_subfield(&self, code: char) -> Option<&str> {
        self.subfields
            .iter()
            .find(|sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }

    /// Iterate over all values of a subfield code
    pub fn subfields_by_code(&self, code: char) -> impl Iterator<Item = &str> {
        self.subfields
            .iter()
            .filter(move |sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }

    /// All subfield values joined by a single space
    #[must_use]
    pub fn value(&self) -> String {
        self.subfields
            .iter()
            .map(|sf| sf.value.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Builder for fluently constructing fields
#[derive(Debug)]
pub struct FieldBuilder {
    field: Field,
}

impl FieldBuilder {
    /// Add a subfield
    #[must_use]
    pub fn subfield(mut self, code: char, value: String) -> Self {
        self.field.add_subfield(code, value);
        self
    }

    /// Add a subfield using a string slice
    #[must_use]
    pub fn subfield_str(mut self, code: char, value: &str) -> Self {
        self.field.add_subfield_str(code, value);
        self
    }

    /// Finish building the field
    #[must_use]
    pub fn build(self) -> Field {
        self.field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record::builder(Leader::default())
            .control_field_str("001", "ocm 123/45")
            .field(
                Field::builder("020".to_string(), ' ', ' ')
                    .subfield_str('a', "0471958697 (cloth)")
                    .build(),
            )
            .field(
                Field::builder("020".to_string(), ' ', ' ')
                    .subfield_str('a', "0471958698")
                    .build(),
            )
            .field(
                Field::builder("245".to_string(), '1', '0')
                    .subfield_str('a', "Moby Dick /")
                    .subfield_str('c', "Herman Melville.")
                    .build(),
            )
            .build()
    }

    #[test]
    fn test_field_value_joins_subfields() {
        let record = sample();
        assert_eq!(
            record.field_value("245"),
            Some(Value::Text("Moby Dick / Herman Melville.".to_string()))
        );
        assert_eq!(
            record.field_value("001"),
            Some(Value::Text("ocm 123/45".to_string()))
        );
        assert_eq!(record.field_value("300"), None);
    }

    #[test]
    fn test_subfield_value_uses_first_field() {
        let record = sample();
        assert_eq!(
            record.subfield_value("020", 'a'),
            Some(Value::Text("0471958697 (cloth)".to_string()))
        );
        assert_eq!(record.subfield_value("245", 'z'), None);
        assert_eq!(record.subfield_value("999", 'a'), None);
    }

    #[test]
    fn test_occurrences_cover_repeated_fields() {
        let record = sample();
        assert_eq!(
            record.occurrences("020", Some('a')),
            vec!["0471958697 (cloth)", "0471958698"]
        );
        assert_eq!(record.occurrences("001", None), vec!["ocm 123/45"]);
        assert!(record.occurrences("001", Some('a')).is_empty());
    }

    #[test]
    fn test_leader_str() {
        let record = sample();
        let leader = record.leader_str().unwrap();
        assert_eq!(leader.len(), 24);
        assert_eq!(&leader[6..8], "am");
    }
}
