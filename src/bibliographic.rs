//! Bibliographic domain rules.
//!
//! These are the derived values a catalog index usually wants beyond plain
//! field extraction:
//!
//! - [`Checksum`] and [`isbns`]: keep only ISBNs whose check digit is valid
//! - [`classify_format`] and [`format_code`]: material type from leader/06-07
//! - [`languages`]: language names from 008/35-37 and 041
//! - [`control_code`]: the record's control number, normalized for use as an id
//!
//! [`Bibliographic::install`] registers all of them as capabilities on a
//! [`Mapper`] so rules can delegate to them by name, and [`catalog_mapper`]
//! builds a ready-to-use mapping for a typical discovery index.
//!
//! # Examples
//!
//! ```
//! use marcsift::bibliographic::Checksum;
//!
//! assert!(Checksum::ISBN10.is_valid("0471958697"));
//! assert!(!Checksum::ISBN10.is_valid("0471958690"));
//! ```

use indexmap::IndexSet;
use tracing::trace;

use crate::code_tables::CodeTable;
use crate::context::RecordContext;
use crate::document::Value;
use crate::error::Result;
use crate::extract::{Extractor, Selector};
use crate::registry::Mapper;
use crate::source::SourceRecord;

/// Label used when a format code has no entry in the table.
pub const UNKNOWN_FORMAT: &str = "Unknown";

/// Positional check-character validation.
///
/// Every decimal digit of the candidate except its final character is
/// weighted by its 1-based position; the sum modulo the alphabet length
/// selects the expected final character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checksum {
    alphabet: &'static str,
}

impl Checksum {
    /// ISBN-10: check characters `0`-`9` and `X`.
    pub const ISBN10: Checksum = Checksum {
        alphabet: "0123456789X",
    };

    /// A checksum over a custom check alphabet.
    #[must_use]
    pub const fn new(alphabet: &'static str) -> Self {
        Checksum { alphabet }
    }

    /// The expected check character for `body`.
    #[must_use]
    pub fn check_char(&self, body: &str) -> Option<char> {
        let modulus = self.alphabet.chars().count();
        if modulus == 0 {
            return None;
        }
        let sum: usize = body
            .chars()
            .filter_map(|c| c.to_digit(10))
            .enumerate()
            .map(|(i, d)| usize::try_from(d).unwrap_or(0) * (i + 1))
            .sum();
        self.alphabet.chars().nth(sum % modulus)
    }

    /// Whether the final character of `candidate` is the expected check
    /// character for the rest. Empty input is never valid.
    #[must_use]
    pub fn is_valid(&self, candidate: &str) -> bool {
        let mut chars = candidate.chars();
        let Some(last) = chars.next_back() else {
            return false;
        };
        self.check_char(chars.as_str()) == Some(last)
    }
}

/// Every `020$a` occurrence whose first whitespace-delimited token passes
/// the ISBN-10 check, in record order and without repeats. The full
/// subfield value is kept, qualifiers included.
pub fn isbns<R: SourceRecord + ?Sized>(record: &R) -> Vec<String> {
    let kept: IndexSet<String> = record
        .occurrences("020", Some('a'))
        .into_iter()
        .filter(|value| {
            value
                .split_whitespace()
                .next()
                .is_some_and(|token| Checksum::ISBN10.is_valid(token))
        })
        .collect();
    kept.into_iter().collect()
}

/// The format table code for a leader: language material whose
/// bibliographic level is `a`, `c`, `d` or `m` is `"a"`; any serial level
/// (`b`, `s`) is `"serials"`; otherwise the type of record itself.
#[must_use]
pub fn format_code_for_leader(leader: &str) -> String {
    let mut chars = leader.chars().skip(6);
    let record_type = chars.next();
    let level = chars.next();

    match (record_type, level) {
        (Some('a'), Some('a' | 'c' | 'd' | 'm')) => "a".to_string(),
        (_, Some('b' | 's')) => "serials".to_string(),
        (Some(t), _) => t.to_string(),
        (None, _) => String::new(),
    }
}

/// The material format label for a leader, [`UNKNOWN_FORMAT`] if unmapped.
#[must_use]
pub fn classify_format(leader: &str, formats: &CodeTable) -> String {
    formats
        .get(&format_code_for_leader(leader))
        .unwrap_or(UNKNOWN_FORMAT)
        .to_string()
}

/// A label as an identifier: lower-cased, spaces to underscores.
///
/// ```
/// use marcsift::bibliographic::format_code;
///
/// assert_eq!(format_code("Musical Score"), "musical_score");
/// ```
#[must_use]
pub fn format_code(label: &str) -> String {
    label.to_lowercase().replace(" _", " ").replace(' ', "_")
}

/// Language names for a record.
///
/// Codes come from 008 positions 35-37 (when 008 is long enough) followed
/// by the first `041$a` and `041$d`. Codes are deduplicated before lookup;
/// unmapped codes and codes that map to an empty label are dropped.
///
/// # Errors
///
/// Never fails for the fixed field codes used here; the `Result` carries
/// extraction errors from the underlying [`Extractor`].
pub fn languages<R: SourceRecord + ?Sized>(record: &R, table: &CodeTable) -> Result<Vec<String>> {
    let mut codes: IndexSet<String> = IndexSet::new();
    if let Some(fixed) = record.control_field("008") {
        let code: String = fixed.chars().skip(35).take(3).collect();
        if code.chars().count() == 3 {
            codes.insert(code);
        }
    }
    if let Some(value) = Extractor::new(record).extract(["041a", "041d"])? {
        codes.extend(value.into_strings());
    }

    Ok(codes
        .iter()
        .filter_map(|code| table.get(code))
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect())
}

/// The 001 control number with whitespace and `/` removed.
pub fn control_code<R: SourceRecord + ?Sized>(record: &R) -> Option<String> {
    let raw = record.field_value("001")?.to_string();
    let code: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '/')
        .collect();
    (!code.is_empty()).then_some(code)
}

fn list_or_none(values: Vec<String>) -> Option<Value> {
    (!values.is_empty()).then_some(Value::List(values))
}

/// The domain rules with their lookup tables.
#[derive(Debug, Clone)]
pub struct Bibliographic {
    /// Language code → name.
    pub languages: CodeTable,
    /// Format code → label.
    pub formats: CodeTable,
}

impl Default for Bibliographic {
    fn default() -> Self {
        Bibliographic {
            languages: CodeTable::languages(),
            formats: CodeTable::formats(),
        }
    }
}

impl Bibliographic {
    /// Register the domain rules as capabilities:
    ///
    /// | name           | value                                        |
    /// |----------------|----------------------------------------------|
    /// | `control_code` | normalized 001                               |
    /// | `isbn`         | valid 020$a values (list)                    |
    /// | `languages`    | language names (list)                        |
    /// | `format`       | material format label                        |
    /// | `format_code`  | format label as an identifier                |
    /// | `marc_json`    | JSON rendering of the record                 |
    /// | `extract`      | field codes given as arguments               |
    ///
    /// The `extract` capability treats a single argument as a single-mode
    /// selector (`"245a 245b"`) and several arguments as a multi-mode one.
    ///
    /// # Errors
    ///
    /// [`SiftError::Configuration`](crate::SiftError::Configuration) if the
    /// mapper is already processing.
    pub fn install<R: SourceRecord + 'static>(&self, mapper: &mut Mapper<R>) -> Result<()> {
        let languages = self.languages.clone();
        let formats = self.formats.clone();
        let code_formats = self.formats.clone();

        mapper
            .register_capability("control_code", |ctx: &RecordContext<R>, _args: &[String]| {
                Ok(control_code(ctx.record()).map(Value::Text))
            })?
            .register_capability("isbn", |ctx: &RecordContext<R>, _args: &[String]| {
                Ok(list_or_none(isbns(ctx.record())))
            })?
            .register_capability("languages", move |ctx: &RecordContext<R>, _args: &[String]| {
                Ok(list_or_none(self::languages(ctx.record(), &languages)?))
            })?
            .register_capability("format", move |ctx: &RecordContext<R>, _args: &[String]| {
                Ok(ctx
                    .record()
                    .leader_str()
                    .map(|leader| Value::Text(classify_format(&leader, &formats))))
            })?
            .register_capability("format_code", move |ctx: &RecordContext<R>, _args: &[String]| {
                Ok(ctx
                    .record()
                    .leader_str()
                    .map(|leader| Value::Text(format_code(&classify_format(&leader, &code_formats)))))
            })?
            .register_capability("marc_json", |ctx: &RecordContext<R>, _args: &[String]| {
                Ok(ctx
                    .record()
                    .to_marc_json()
                    .map(|json| Value::Text(json.to_string())))
            })?
            .register_capability("extract", |ctx: &RecordContext<R>, args: &[String]| {
                let selector = match args {
                    [single] => Selector::Single(single.clone()),
                    many => Selector::Multi(many.to_vec()),
                };
                ctx.extract(selector)
            })?;

        trace!(
            capabilities = mapper.capabilities().names().count(),
            "installed bibliographic capabilities"
        );
        Ok(())
    }
}

/// A mapping for a typical discovery index: identifiers, titles, authors,
/// subjects, the domain rules, a JSON copy of the record in `marc_display`,
/// and cleaned values everywhere else.
///
/// # Errors
///
/// Only fails if the built-in configuration is itself invalid.
pub fn catalog_mapper<R: SourceRecord + 'static>(source_label: &str) -> Result<Mapper<R>> {
    let mut mapper = Mapper::new();
    Bibliographic::default().install(&mut mapper)?;

    mapper
        .map_literal("source_facet", source_label)?
        .map_delegate("id", "control_code")?
        .map_delegate("marc_display", "marc_json")?
        .map_delegate("isbn_t", "isbn")?
        .map_delegate("language_facet", "languages")?
        .map_delegate("format_facet", "format")?
        .map_delegate("format_code_t", "format_code")?
        .map_marc("title_t", ["245a"])?
        .map_marc("sub_title_t", ["245b"])?
        .map_marc(
            "alt_titles_t",
            ["240b", "700t", "710t", "711t", "440a", "490a", "505a", "830a"],
        )?
        .map_marc("title_added_entry_t", ["700t"])?
        .map_marc("title_sort", "245a")?
        .map_marc(
            "author_t",
            ["100a", "110a", "111a", "130a", "700a", "710a", "711a"],
        )?
        .map_marc("published_t", ["260a"])?
        .map_marc("material_type_t", ["300a"])?
        .map_marc(
            "subject_t",
            ["600a", "610a", "611a", "630a", "650a", "651a", "655a", "690a"],
        )?
        .map_marc("subject_era_facet", ["650d", "650y", "651y", "655y"])?
        .map_marc(
            "geographic_subject_facet",
            ["650c", "650z", "651a", "651x", "651z", "655z"],
        )?
        .map_marc(
            "vern_t",
            ["880a", "880b", "880c", "880e", "880f", "880p", "880t"],
        )?
        .clean_documents_except(["marc_display"])?;

    Ok(mapper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leader::Leader;
    use crate::record::{Field, Record};

    fn leader_of(record_type: char, level: char) -> Leader {
        let mut leader = Leader::default();
        leader.record_type = record_type;
        leader.bibliographic_level = level;
        leader
    }

    fn leader(record_type: char, level: char) -> String {
        leader_of(record_type, level).to_string()
    }

    fn with_fields(fields: Vec<Field>) -> Record {
        let mut record = Record::new(Leader::default());
        for field in fields {
            record.add_field(field);
        }
        record
    }

    #[test]
    fn test_checksum_isbn10() {
        assert!(Checksum::ISBN10.is_valid("0471958697"));
        assert!(!Checksum::ISBN10.is_valid("0471958698"));
        assert!(Checksum::ISBN10.is_valid("080442957X"));
        assert!(!Checksum::ISBN10.is_valid(""));
    }

    #[test]
    fn test_check_char_ignores_non_digits() {
        assert_eq!(
            Checksum::ISBN10.check_char("0-471-95869"),
            Checksum::ISBN10.check_char("047195869")
        );
    }

    #[test]
    fn test_isbns_keeps_valid_occurrences() {
        let record = with_fields(vec![
            Field::builder("020".to_string(), ' ', ' ')
                .subfield_str('a', "0471958697 (cloth)")
                .build(),
            Field::builder("020".to_string(), ' ', ' ')
                .subfield_str('a', "0471958690")
                .build(),
            Field::builder("020".to_string(), ' ', ' ')
                .subfield_str('a', "0471958697 (cloth)")
                .build(),
        ]);
        assert_eq!(isbns(&record), vec!["0471958697 (cloth)".to_string()]);
    }

    #[test]
    fn test_classify_format() {
        let formats = CodeTable::formats();
        assert_eq!(classify_format(&leader('a', 'm'), &formats), "Book");
        assert_eq!(classify_format(&leader('a', 's'), &formats), "Serials");
        assert_eq!(classify_format(&leader('t', 's'), &formats), "Serials");
        assert_eq!(classify_format(&leader('j', 'm'), &formats), "Musical Recording");
        assert_eq!(classify_format(&leader('t', 'm'), &formats), "Book");
        assert_eq!(classify_format(&leader('z', 'm'), &formats), UNKNOWN_FORMAT);
        assert_eq!(classify_format("short", &formats), UNKNOWN_FORMAT);
    }

    #[test]
    fn test_format_code() {
        assert_eq!(format_code("Non-musical Recording"), "non-musical_recording");
        assert_eq!(format_code("Book"), "book");
        assert_eq!(format_code("A _b"), "a_b");
    }

    #[test]
    fn test_languages_from_008_and_041() {
        let mut record = with_fields(vec![Field::builder("041".to_string(), '0', ' ')
            .subfield_str('a', "fre")
            .subfield_str('d', "eng")
            .build()]);
        record.add_control_field_str("008", &format!("{:35}eng d", ""));
        let table = CodeTable::languages();
        assert_eq!(
            languages(&record, &table).unwrap(),
            vec!["English".to_string(), "French".to_string()]
        );
    }

    #[test]
    fn test_languages_drops_unknown_and_blank() {
        let mut record = Record::new(Leader::default());
        record.add_control_field_str("008", &format!("{:35}???", ""));
        let table = CodeTable::languages();
        assert!(languages(&record, &table).unwrap().is_empty());

        let mut record = Record::new(Leader::default());
        record.add_control_field_str("008", &format!("{:35}qqq", ""));
        assert!(languages(&record, &table).unwrap().is_empty());

        let record = Record::new(Leader::default());
        assert!(languages(&record, &table).unwrap().is_empty());
    }

    #[test]
    fn test_control_code() {
        let mut record = Record::new(Leader::default());
        record.add_control_field_str("001", " ocm 123/45 ");
        assert_eq!(control_code(&record), Some("ocm12345".to_string()));
        assert_eq!(control_code(&Record::new(Leader::default())), None);
    }

    #[test]
    fn test_install_registers_capabilities() {
        let mut mapper: Mapper<Record> = Mapper::new();
        Bibliographic::default().install(&mut mapper).unwrap();
        let names: Vec<&str> = mapper.capabilities().names().collect();
        assert_eq!(
            names,
            vec![
                "control_code",
                "isbn",
                "languages",
                "format",
                "format_code",
                "marc_json",
                "extract"
            ]
        );
    }

    #[test]
    fn test_catalog_mapper_document() {
        let mut record = Record::builder(leader_of('a', 'm'))
            .control_field_str("001", "a1001")
            .field(
                Field::builder("245".to_string(), '1', '0')
                    .subfield_str('a', "Moby Dick, or, The whale /")
                    .build(),
            )
            .build();
        record.add_control_field_str("008", &format!("{:35}eng d", ""));

        let mapper: Mapper<Record> = catalog_mapper("Test data").unwrap();
        let doc = mapper.map_one(record).unwrap().unwrap();

        assert_eq!(doc.get_text("source_facet"), Some("Test data"));
        assert_eq!(doc.get_text("id"), Some("a1001"));
        assert_eq!(doc.get_text("title_sort"), Some("Moby Dick, or, The whale"));
        assert_eq!(doc.get("title_t"), Some(&Value::from(vec!["Moby Dick, or, The whale"])));
        assert_eq!(doc.get("language_facet"), Some(&Value::from(vec!["English"])));
        assert_eq!(doc.get_text("format_facet"), Some("Book"));
        assert_eq!(doc.get_text("format_code_t"), Some("book"));
        assert!(doc.get_text("marc_display").unwrap().ends_with("}]"));
        assert!(!doc.contains_key("isbn_t"));
        assert!(!doc.contains_key("subject_t"));
    }
}
