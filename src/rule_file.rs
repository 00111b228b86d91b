//! JSON rule files.
//!
//! A rule file adds registrations to a [`Mapper`] without code:
//!
//! ```json
//! {
//!   "clean": true,
//!   "defaults": { "source_facet": "Test data" },
//!   "rules": [
//!     { "field": "id", "capability": "control_code" },
//!     { "field": "title_t", "marc": ["245a"] },
//!     { "field": "title_sort", "marc": "245a" },
//!     { "field": "format_code_t", "value": "book" }
//!   ]
//! }
//! ```
//!
//! Each rule names exactly one source: `value` (a string or list of
//! strings), `capability` (with optional `args`), or `marc` (a field code
//! string for single mode, or a list for multi mode). Field codes are
//! validated at import time.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::document::Value;
use crate::error::{Result, SiftError};
use crate::extract::Selector;
use crate::invoke::ValueSource;
use crate::registry::{Mapper, Rule};
use crate::source::SourceRecord;

/// A parsed rule file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleFile {
    /// Install the document cleaner after the rules.
    #[serde(default)]
    pub clean: bool,
    /// Values every document starts with.
    #[serde(default)]
    pub defaults: IndexMap<String, Value>,
    /// Rules in registration order.
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

/// One rule as written in a rule file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    /// Target document field.
    pub field: String,
    /// Literal value(s).
    #[serde(default)]
    pub value: Option<Value>,
    /// Capability to delegate to.
    #[serde(default)]
    pub capability: Option<String>,
    /// Arguments for the capability.
    #[serde(default)]
    pub args: Vec<String>,
    /// Field codes to extract.
    #[serde(default)]
    pub marc: Option<Selector>,
}

impl RuleEntry {
    /// Turn the entry into a rule.
    ///
    /// # Errors
    ///
    /// [`SiftError::Configuration`] unless exactly one source is given, or
    /// if `args` is given without `capability`;
    /// [`SiftError::Extraction`] for malformed field codes.
    pub fn into_rule<R: SourceRecord + 'static>(self) -> Result<Rule<R>> {
        let RuleEntry {
            field,
            value,
            capability,
            args,
            marc,
        } = self;

        if capability.is_none() && !args.is_empty() {
            return Err(SiftError::Configuration(format!(
                "rule '{field}' has args but no capability"
            )));
        }

        let source = match (value, capability, marc) {
            (Some(value), None, None) => ValueSource::Literal(value.into_strings()),
            (None, Some(capability), None) => ValueSource::delegate_with(capability, args),
            (None, None, Some(selector)) => {
                selector.specs()?;
                ValueSource::marc(selector)
            },
            (None, None, None) => {
                return Err(SiftError::Configuration(format!(
                    "rule '{field}' needs one of value, capability or marc"
                )))
            },
            _ => {
                return Err(SiftError::Configuration(format!(
                    "rule '{field}' may only have one of value, capability or marc"
                )))
            },
        };
        Ok(Rule::new(field, source))
    }
}

impl RuleFile {
    /// Parse a rule file from JSON text.
    ///
    /// # Errors
    ///
    /// [`SiftError::RuleFile`] if the JSON does not describe a rule file.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| SiftError::RuleFile(e.to_string()))
    }

    /// Parse a rule file from a reader.
    ///
    /// # Errors
    ///
    /// [`SiftError::RuleFile`] if the JSON does not describe a rule file.
    pub fn from_reader<T: Read>(reader: T) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| SiftError::RuleFile(e.to_string()))
    }
}

impl<R: SourceRecord + 'static> Mapper<R> {
    /// Add everything a rule file describes: defaults, then rules, then the
    /// cleaner if requested.
    ///
    /// Every rule is validated before anything is registered, so a bad file
    /// leaves the mapper unchanged.
    ///
    /// # Errors
    ///
    /// See [`RuleEntry::into_rule`]; also [`SiftError::Configuration`] if
    /// processing has started or a duplicate field is rejected.
    pub fn apply_rule_file(&mut self, file: RuleFile) -> Result<&mut Self> {
        let rules = file
            .rules
            .into_iter()
            .map(RuleEntry::into_rule)
            .collect::<Result<Vec<Rule<R>>>>()?;

        for (field, value) in file.defaults {
            self.default_value(field, value)?;
        }
        let count = rules.len();
        for rule in rules {
            self.add_rule(rule)?;
        }
        if file.clean {
            self.clean_documents()?;
        }
        debug!(rules = count, clean = file.clean, "applied rule file");
        Ok(self)
    }

    /// Load a rule file from a reader.
    ///
    /// # Errors
    ///
    /// [`SiftError::RuleFile`] for unparseable input, or see
    /// [`Mapper::apply_rule_file`].
    pub fn import_rules<T: Read>(&mut self, reader: T) -> Result<&mut Self> {
        let file = RuleFile::from_reader(reader)?;
        self.apply_rule_file(file)
    }

    /// Load a rule file from JSON text.
    ///
    /// # Errors
    ///
    /// See [`Mapper::import_rules`].
    pub fn import_rules_str(&mut self, text: &str) -> Result<&mut Self> {
        let file = RuleFile::from_json(text)?;
        self.apply_rule_file(file)
    }

    /// Load a rule file from disk.
    ///
    /// # Errors
    ///
    /// [`SiftError::IoError`] if the file cannot be opened, or see
    /// [`Mapper::import_rules`].
    pub fn import_rules_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading rule file");
        let file = File::open(path)?;
        self.import_rules(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leader::Leader;
    use crate::record::{Field, Record};

    fn record() -> Record {
        Record::builder(Leader::default())
            .control_field_str("001", "id-1")
            .field(
                Field::builder("245".to_string(), '1', '0')
                    .subfield_str('a', "Omoo :")
                    .build(),
            )
            .build()
    }

    #[test]
    fn test_import_all_source_kinds() {
        let mut mapper: Mapper<Record> = Mapper::new();
        mapper
            .register_capability("upper_id", |ctx, args: &[String]| {
                let id = ctx.record().get_control_field("001").unwrap_or_default();
                Ok(Some(Value::Text(format!("{}{}", args.concat(), id.to_uppercase()))))
            })
            .unwrap();
        mapper
            .import_rules_str(
                r#"{
                    "clean": true,
                    "defaults": { "source_facet": "Test data" },
                    "rules": [
                        { "field": "id", "capability": "upper_id", "args": ["x-"] },
                        { "field": "title_t", "marc": ["245a", "245a"] },
                        { "field": "title_sort", "marc": "245a" },
                        { "field": "formats", "value": ["book", "print"] }
                    ]
                }"#,
            )
            .unwrap();

        let doc = mapper.map_one(record()).unwrap().unwrap();
        assert_eq!(
            doc.keys().collect::<Vec<_>>(),
            vec!["source_facet", "id", "title_t", "title_sort", "formats"]
        );
        assert_eq!(doc.get_text("id"), Some("x-ID-1"));
        assert_eq!(doc.get("title_t"), Some(&Value::from(vec!["Omoo"])));
        assert_eq!(doc.get_text("title_sort"), Some("Omoo"));
        assert_eq!(doc.get("formats"), Some(&Value::from(vec!["book", "print"])));
    }

    #[test]
    fn test_value_with_other_source_rejected() {
        let mut mapper: Mapper<Record> = Mapper::new();
        let err = mapper
            .import_rules_str(r#"{"rules": [{"field": "f", "value": "x", "marc": "245a"}]}"#)
            .unwrap_err();
        assert!(matches!(err, SiftError::Configuration(msg) if msg.contains("only have one")));
        assert!(mapper.rules().is_empty());
    }

    #[test]
    fn test_missing_source_and_stray_args() {
        let mut mapper: Mapper<Record> = Mapper::new();
        assert!(matches!(
            mapper.import_rules_str(r#"{"rules": [{"field": "f"}]}"#),
            Err(SiftError::Configuration(_))
        ));
        assert!(matches!(
            mapper.import_rules_str(r#"{"rules": [{"field": "f", "value": "x", "args": ["a"]}]}"#),
            Err(SiftError::Configuration(_))
        ));
    }

    #[test]
    fn test_bad_field_code_rejected_at_import() {
        let mut mapper: Mapper<Record> = Mapper::new();
        let err = mapper
            .import_rules_str(r#"{"rules": [{"field": "t", "marc": ["245a", "24x5"]}]}"#)
            .unwrap_err();
        assert!(matches!(err, SiftError::Extraction { token } if token == "24x5"));
    }

    #[test]
    fn test_malformed_json() {
        let mut mapper: Mapper<Record> = Mapper::new();
        assert!(matches!(
            mapper.import_rules_str(r#"{"rules": [{"field": 3}]}"#),
            Err(SiftError::RuleFile(_))
        ));
        assert!(matches!(
            mapper.import_rules_str(r#"{"rulez": []}"#),
            Err(SiftError::RuleFile(_))
        ));
    }
}
