//! Per-record evaluation context.
//!
//! A [`RecordContext`] is created for every record at the start of an
//! iteration and dropped once the record's document has been emitted. It owns
//! the record, knows its position in the input, carries scratch variables and
//! any capabilities a Before hook attached, and exposes the cancellation
//! signal. While rules run it also holds the document being assembled, so a
//! rule can read what earlier rules (or defaults) assigned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::document::{Document, Value};
use crate::error::Result;
use crate::extract::{Extractor, Selector};
use crate::invoke::Capability;
use crate::source::SourceRecord;

/// Shared stop signal for a processing run.
///
/// Cloning yields a handle to the same flag, so a token can be handed to
/// another thread, a hook or the emit callback.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh, un-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that processing stop before the next record.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The context every Before hook, variable and rule is evaluated against.
pub struct RecordContext<R> {
    record: R,
    index: usize,
    vars: IndexMap<String, Value>,
    capabilities: IndexMap<String, Capability<R>>,
    document: Document,
    cancel: CancelToken,
}

impl<R> RecordContext<R> {
    /// Context for a record at position `index`, with its own cancel token.
    pub fn new(record: R, index: usize) -> Self {
        Self::with_cancel(record, index, CancelToken::new())
    }

    pub(crate) fn with_cancel(record: R, index: usize, cancel: CancelToken) -> Self {
        RecordContext {
            record,
            index,
            vars: IndexMap::new(),
            capabilities: IndexMap::new(),
            document: Document::new(),
            cancel,
        }
    }

    /// The current record.
    pub fn record(&self) -> &R {
        &self.record
    }

    /// Mutable access for Before hooks that adapt the record.
    pub fn record_mut(&mut self) -> &mut R {
        &mut self.record
    }

    /// Zero-based position of the record in the input collection.
    pub fn index(&self) -> usize {
        self.index
    }

    /// A scratch variable computed earlier for this record.
    pub fn var(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Set (or with `None`, clear) a scratch variable.
    pub fn set_var(&mut self, name: impl Into<String>, value: Option<Value>) {
        let name = name.into();
        match value {
            Some(value) => {
                self.vars.insert(name, value);
            },
            None => {
                self.vars.shift_remove(&name);
            },
        }
    }

    /// The value an earlier rule, or a default, assigned to `field` in the
    /// document being built.
    ///
    /// Empty during Before hooks and variables.
    pub fn assigned(&self, field: &str) -> Option<&Value> {
        self.document.get(field)
    }

    pub(crate) fn start_document(&mut self, defaults: Document) {
        self.document = defaults;
    }

    pub(crate) fn assign(&mut self, field: &str, value: Option<Value>) {
        self.document.set(field, value);
    }

    pub(crate) fn take_document(&mut self) -> Document {
        std::mem::take(&mut self.document)
    }

    /// Attach a capability to this record only. Attached capabilities shadow
    /// mapper-level ones of the same name.
    pub fn attach_capability<F>(&mut self, name: impl Into<String>, capability: F)
    where
        F: Fn(&RecordContext<R>, &[String]) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        self.capabilities.insert(name.into(), Arc::new(capability));
    }

    /// A capability attached to this record.
    pub fn attached_capability(&self, name: &str) -> Option<&Capability<R>> {
        self.capabilities.get(name)
    }

    /// Stop the run; the current record is not emitted.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the run has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Give the record back.
    pub fn into_record(self) -> R {
        self.record
    }
}

impl<R: SourceRecord> RecordContext<R> {
    /// The field extractor over the current record.
    pub fn extractor(&self) -> Extractor<'_, R> {
        Extractor::new(&self.record)
    }

    /// Shorthand for `self.extractor().extract(selector)`.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Extraction`](crate::SiftError::Extraction) for
    /// malformed field codes.
    pub fn extract(&self, selector: impl Into<Selector>) -> Result<Option<Value>> {
        self.extractor().extract(selector)
    }

    /// Shorthand for `self.extractor().extract_with(selector, transform)`.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Extraction`](crate::SiftError::Extraction) for
    /// malformed field codes.
    pub fn extract_with<T, F>(&self, selector: impl Into<Selector>, transform: F) -> Result<T>
    where
        F: FnOnce(Option<Value>) -> T,
    {
        self.extractor().extract_with(selector, transform)
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for RecordContext<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordContext")
            .field("record", &self.record)
            .field("index", &self.index)
            .field("vars", &self.vars)
            .field("capabilities", &self.capabilities.keys().collect::<Vec<_>>())
            .field("document", &self.document)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
