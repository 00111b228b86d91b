#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # marcsift: declarative MARC-to-index mapping
//!
//! A small mapping engine that turns bibliographic records into flat,
//! index-ready documents. A [`Mapper`] holds an ordered set of rules (one
//! document field each) plus Before and After hooks; [`Mapper::process`]
//! runs them over every record in a collection and hands each finished
//! [`Document`] to a callback.
//!
//! ## Quick Start
//!
//! ```
//! use std::ops::ControlFlow;
//! use marcsift::{Bibliographic, Field, Leader, Mapper, Record};
//!
//! let mut mapper: Mapper<Record> = Mapper::new();
//! Bibliographic::default().install(&mut mapper)?;
//! mapper
//!     .map_literal("source_facet", "Local catalog")?
//!     .map_delegate("id", "control_code")?
//!     .map_delegate("format_facet", "format")?
//!     .map_marc("title_t", ["245a", "245b"])?
//!     .clean_documents()?;
//!
//! let record = Record::builder(Leader::default())
//!     .control_field_str("001", "ocm 0042/")
//!     .field(Field::builder("245".to_string(), '1', '0')
//!         .subfield_str('a', "Typee :")
//!         .subfield_str('b', "a peep at Polynesian life.")
//!         .build())
//!     .build();
//!
//! mapper.process(vec![record], |doc| {
//!     assert_eq!(doc.get_text("id"), Some("ocm0042"));
//!     assert_eq!(doc.get_text("format_facet"), Some("Book"));
//!     Ok(ControlFlow::Continue(()))
//! })?;
//! # Ok::<(), marcsift::SiftError>(())
//! ```
//!
//! ## Modules
//!
//! - [`extract`]: Field-code parsing and extraction (`"245a"`)
//! - [`invoke`]: Callables, value sources and capability dispatch
//! - [`registry`]: The [`Mapper`] setup API
//! - [`pipeline`]: Record-by-record execution
//! - [`document`]: Output documents and values
//! - [`cleaner`]: Value normalization After hook
//! - [`bibliographic`]: Domain rules: ISBN checksum, format, languages
//! - [`code_tables`]: Built-in language and format tables
//! - [`rule_file`]: JSON rule files
//! - [`source`]: The [`SourceRecord`] capability trait
//! - [`record`]: MARC record structures (`Record`, `Field`, `Subfield`)
//! - [`leader`]: MARC record leader (24-byte header)
//! - [`reader`]: Reading ISO 2709 binary records
//! - [`json`]: JSON rendering of records
//! - [`sink`]: JSON-lines document output
//! - [`error`]: Error types and result type

pub mod bibliographic;
pub mod cleaner;
pub mod code_tables;
pub mod context;
pub mod document;
pub mod error;
pub mod extract;
pub mod invoke;
pub mod json;
pub mod leader;
pub mod pipeline;
pub mod reader;
/// Core MARC record structures (`Record`, `Field`, `Subfield`)
pub mod record;
pub mod registry;
pub mod rule_file;
pub mod sink;
pub mod source;

pub use bibliographic::{catalog_mapper, Bibliographic, Checksum};
pub use cleaner::Cleaner;
pub use code_tables::CodeTable;
pub use context::{CancelToken, RecordContext};
pub use document::{Document, Value};
pub use error::{MarcError, MarcResult, Result, SiftError, Stage};
pub use extract::{Extractor, FieldSpec, Selector};
pub use invoke::{Callable, Capabilities, Capability, ValueSource};
pub use leader::Leader;
pub use pipeline::ProcessSummary;
pub use reader::MarcReader;
pub use record::{Field, FieldBuilder, Record, RecordBuilder, Subfield};
pub use registry::{DuplicateFields, Mapper, MapperConfig, Rule, RuleBuilder};
pub use rule_file::{RuleEntry, RuleFile};
pub use sink::JsonLinesSink;
pub use source::SourceRecord;
