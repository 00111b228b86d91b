//! Document normalization.
//!
//! The [`Cleaner`] is the canonical After hook: it trims every value, strips a
//! trailing run of non-word characters (the ISBD punctuation cataloguers leave
//! at the end of subfields, such as `" /"` or `" :"`), and removes any field
//! that ends up empty. Fields holding rendered payloads, such as a JSON copy
//! of the record, can be preserved verbatim.

use lazy_static::lazy_static;
use regex::Regex;

use crate::document::{Document, Value};
use crate::invoke::Callable;

lazy_static! {
    static ref TRAILING_NON_WORD: Regex = Regex::new(r"\W+\z").expect("valid trailing pattern");
}

/// Normalizes document values.
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    preserve: Vec<String>,
}

impl Cleaner {
    /// Trim, then strip trailing non-word characters.
    ///
    /// ```
    /// use marcsift::Cleaner;
    ///
    /// assert_eq!(Cleaner::clean_str("  Moby Dick /  "), "Moby Dick");
    /// assert_eq!(Cleaner::clean_str("1851."), "1851");
    /// ```
    #[must_use]
    pub fn clean_str(value: &str) -> String {
        TRAILING_NON_WORD.replace(value.trim(), "").into_owned()
    }

    /// Clean a value. Lists are cleaned element-wise and elements that become
    /// empty are dropped; `None` means the whole value is empty.
    #[must_use]
    pub fn clean(value: Value) -> Option<Value> {
        let cleaned = match value {
            Value::Text(s) => Value::Text(Self::clean_str(&s)),
            Value::List(items) => Value::List(
                items
                    .iter()
                    .map(|s| Self::clean_str(s))
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
        };
        (!cleaned.is_blank()).then_some(cleaned)
    }

    /// A cleaner that leaves the named fields untouched.
    pub fn preserving<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Cleaner {
            preserve: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Clean every field in place, removing those that end up empty.
    pub fn clean_document(doc: &mut Document) {
        Cleaner::default().apply(doc);
    }

    /// Clean every field except the preserved ones, which are kept verbatim
    /// unless blank.
    pub fn apply(&self, doc: &mut Document) {
        doc.retain(|field, value| {
            if self.preserve.iter().any(|p| p == field) {
                return !value.is_blank();
            }
            let taken = std::mem::replace(value, Value::List(Vec::new()));
            match Self::clean(taken) {
                Some(cleaned) => {
                    *value = cleaned;
                    true
                },
                None => false,
            }
        });
    }

    /// This cleaner as an After hook.
    #[must_use]
    pub fn into_hook(self) -> Callable<Document, ()> {
        Callable::transformer(move |doc: &mut Document| {
            self.apply(doc);
            Ok(())
        })
    }
}
