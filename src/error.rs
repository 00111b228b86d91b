//! Error types for record reading and rule evaluation.
//!
//! This module provides two error types:
//! - [`MarcError`] for reading and decoding MARC records
//! - [`SiftError`] for everything the mapping engine does (setup, extraction,
//!   rule invocation, rule files)
//!
//! The [`Result`] alias uses [`SiftError`].

use std::fmt;

use thiserror::Error;

/// Error type for reading MARC records.
///
/// Represents malformed binary data encountered by the
/// [`MarcReader`](crate::reader::MarcReader).
#[derive(Error, Debug)]
pub enum MarcError {
    /// Error indicating an invalid or malformed MARC record.
    #[error("Invalid MARC record: {0}")]
    InvalidRecord(String),

    /// Error indicating an invalid leader (24-byte header).
    #[error("Invalid leader: {0}")]
    InvalidLeader(String),

    /// Error indicating an invalid field structure.
    #[error("Invalid field: {0}")]
    InvalidField(String),

    /// Error indicating a truncated or incomplete record.
    #[error("Truncated record: {0}")]
    TruncatedRecord(String),

    /// IO error from the underlying source.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convenience type alias for results produced while reading records.
pub type MarcResult<T> = std::result::Result<T, MarcError>;

/// The step of the per-record pipeline in which a callable failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// A Before hook, run against the record context.
    BeforeHook,
    /// A scratch variable evaluated before the rules.
    Variable,
    /// A field-mapping rule.
    Rule,
    /// An After hook, run against the assembled document.
    AfterHook,
    /// A field filter, run against selected document fields.
    Filter,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::BeforeHook => "before hook",
            Stage::Variable => "variable",
            Stage::Rule => "rule",
            Stage::AfterHook => "after hook",
            Stage::Filter => "filter",
        };
        f.write_str(name)
    }
}

/// Error type for all mapping engine operations.
#[derive(Error, Debug)]
pub enum SiftError {
    /// Invalid setup: conflicting value sources, duplicate rules when they are
    /// rejected, or registration after processing has started.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A field-code token did not match `DIGITS+ LOWERALPHA?`.
    #[error("Extraction error: invalid field code {token:?}")]
    Extraction {
        /// The offending token.
        token: String,
    },

    /// A delegate rule named a capability that is neither attached to the
    /// record context nor registered on the mapper.
    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    /// A hook, variable, rule or filter failed while processing a record.
    #[error("{stage} '{target}' failed on record {index}: {source}")]
    RuleInvocation {
        /// Pipeline step that failed.
        stage: Stage,
        /// Field, variable or hook name.
        target: String,
        /// Zero-based position of the record in the input collection.
        index: usize,
        /// Underlying failure.
        #[source]
        source: Box<SiftError>,
    },

    /// A rule file could not be understood.
    #[error("Rule file error: {0}")]
    RuleFile(String),

    /// Reading a source record failed.
    #[error(transparent)]
    Marc(#[from] MarcError),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error from a rule file or document sink.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failure raised by a user-supplied callable.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SiftError {
    /// Returns the innermost error, looking through [`SiftError::RuleInvocation`].
    #[must_use]
    pub fn root_cause(&self) -> &SiftError {
        match self {
            SiftError::RuleInvocation { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn invocation(
        stage: Stage,
        target: impl Into<String>,
        index: usize,
        source: SiftError,
    ) -> Self {
        SiftError::RuleInvocation {
            stage,
            target: target.into(),
            index,
            source: Box::new(source),
        }
    }
}

/// Convenience type alias for [`std::result::Result`] with [`SiftError`].
pub type Result<T> = std::result::Result<T, SiftError>;
