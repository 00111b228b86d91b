//! Field-code extraction.
//!
//! Field codes are compact tokens naming a field and, optionally, one of its
//! subfields: `"245"` is the whole title field, `"245a"` its `$a` subfield.
//! The grammar is `DIGITS+ LOWERALPHA?`.
//!
//! Extraction comes in two modes, picked by the shape of the [`Selector`]:
//!
//! - **Single** (`"245a 245b"`, whitespace-delimited): every token is
//!   resolved, and the first token's result is returned as-is, even when it
//!   is absent or empty.
//! - **Multi** (`["245a", "245b"]`): every token is resolved, results are
//!   deduplicated keeping the first occurrence, and values that stringify to
//!   empty are dropped. The result is always a list.
//!
//! # Examples
//!
//! ```
//! use marcsift::{Extractor, Field, Leader, Record, Value};
//!
//! let record = Record::builder(Leader::default())
//!     .field(Field::builder("245".to_string(), '1', '0')
//!         .subfield_str('a', "Moby Dick")
//!         .build())
//!     .build();
//!
//! let extractor = Extractor::new(&record);
//! assert_eq!(extractor.extract("245a")?, Some(Value::from("Moby Dick")));
//! assert_eq!(
//!     extractor.extract(vec!["245a", "245a", "246a"])?,
//!     Some(Value::from(vec!["Moby Dick"]))
//! );
//! # Ok::<(), marcsift::SiftError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use nom::character::complete::{digit1, satisfy};
use nom::combinator::{all_consuming, opt};
use nom::sequence::pair;
use nom::IResult;
use serde::{Deserialize, Serialize};

use crate::document::Value;
use crate::error::{Result, SiftError};
use crate::source::SourceRecord;

/// A parsed field code: main field tag plus optional subfield code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    /// Leading digits, e.g. `"245"`.
    pub main_code: String,
    /// Single trailing lowercase letter, e.g. `'a'`.
    pub sub_code: Option<char>,
}

fn field_code(input: &str) -> IResult<&str, (&str, Option<char>)> {
    all_consuming(pair(digit1, opt(satisfy(|c| c.is_ascii_lowercase()))))(input)
}

impl FieldSpec {
    /// Parse a token such as `"245a"` or `"001"`.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Extraction`] when the token does not match
    /// `DIGITS+ LOWERALPHA?`.
    pub fn parse(token: &str) -> Result<Self> {
        let (_, (main, sub)) = field_code(token).map_err(|_| SiftError::Extraction {
            token: token.to_string(),
        })?;
        Ok(FieldSpec {
            main_code: main.to_string(),
            sub_code: sub,
        })
    }
}

impl FromStr for FieldSpec {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.main_code)?;
        if let Some(code) = self.sub_code {
            write!(f, "{code}")?;
        }
        Ok(())
    }
}

/// What to extract, and in which mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selector {
    /// Whitespace-delimited tokens; first result, unfiltered.
    Single(String),
    /// Explicit token list; deduplicated, empties dropped.
    Multi(Vec<String>),
}

impl Selector {
    /// The tokens in order.
    pub fn tokens(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Selector::Single(s) => Box::new(s.split_whitespace()),
            Selector::Multi(tokens) => Box::new(tokens.iter().map(String::as_str)),
        }
    }

    /// Parse every token up front.
    ///
    /// # Errors
    ///
    /// Returns the first malformed token as [`SiftError::Extraction`].
    pub fn specs(&self) -> Result<Vec<FieldSpec>> {
        self.tokens().map(FieldSpec::parse).collect()
    }
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        Selector::Single(s.to_string())
    }
}

impl From<String> for Selector {
    fn from(s: String) -> Self {
        Selector::Single(s)
    }
}

impl From<Vec<String>> for Selector {
    fn from(tokens: Vec<String>) -> Self {
        Selector::Multi(tokens)
    }
}

impl From<Vec<&str>> for Selector {
    fn from(tokens: Vec<&str>) -> Self {
        Selector::Multi(tokens.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Selector {
    fn from(tokens: &[&str]) -> Self {
        Selector::Multi(tokens.iter().map(|t| (*t).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Selector {
    fn from(tokens: [&str; N]) -> Self {
        Selector::Multi(tokens.iter().map(|t| (*t).to_string()).collect())
    }
}

/// Resolves field codes against a borrowed record.
///
/// This is the adapter that gives any [`SourceRecord`] the extraction
/// capability; the record itself is never modified.
#[derive(Debug)]
pub struct Extractor<'r, R: ?Sized> {
    record: &'r R,
}

impl<'r, R: SourceRecord + ?Sized> Extractor<'r, R> {
    /// Wrap a record.
    #[must_use]
    pub fn new(record: &'r R) -> Self {
        Extractor { record }
    }

    /// Extract according to the selector's mode.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Extraction`] if any token is malformed.
    pub fn extract(&self, selector: impl Into<Selector>) -> Result<Option<Value>> {
        let selector = selector.into();
        let specs = selector.specs()?;
        let mut results = specs.iter().map(|spec| self.record.resolve(spec));

        match selector {
            Selector::Single(_) => Ok(results.next().flatten()),
            Selector::Multi(_) => {
                let unique: IndexSet<String> = results
                    .flatten()
                    .flat_map(Value::into_strings)
                    .filter(|v| !v.is_empty())
                    .collect();
                Ok(Some(Value::List(unique.into_iter().collect())))
            },
        }
    }

    /// Extract, then hand the raw result to `transform` and return its output.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Extraction`] if any token is malformed.
    pub fn extract_with<T, F>(&self, selector: impl Into<Selector>, transform: F) -> Result<T>
    where
        F: FnOnce(Option<Value>) -> T,
    {
        self.extract(selector).map(transform)
    }

    /// Every occurrence of one field code across repeated fields.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Extraction`] if the token is malformed.
    pub fn values(&self, token: &str) -> Result<Vec<String>> {
        let spec = FieldSpec::parse(token)?;
        Ok(self.record.occurrences(&spec.main_code, spec.sub_code))
    }
}
