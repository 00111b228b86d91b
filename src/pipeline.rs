//! Record-by-record execution.
//!
//! [`Mapper::process`] walks the input collection in order. For every record
//! it runs, strictly in sequence:
//!
//! 1. the Before hooks, against a fresh [`RecordContext`]
//! 2. the scratch variables
//! 3. the rules, each assigning one document field (later rules win)
//! 4. the After hooks and field filters, against the document
//! 5. the caller's `on_emit` callback
//!
//! The next record is not touched until `on_emit` returns. Any failure in
//! steps 1–4 aborts the run with [`SiftError::RuleInvocation`]; the failing
//! record's document is never emitted.
//!
//! A run stops early, without error, when the [`CancelToken`] is cancelled (by
//! a Before hook through [`RecordContext::cancel`], or by another holder of the
//! token) or when `on_emit` returns [`ControlFlow::Break`].
//!
//! # Examples
//!
//! ```
//! use std::ops::ControlFlow;
//! use marcsift::{Field, Leader, Mapper, Record};
//!
//! let mut mapper: Mapper<Record> = Mapper::new();
//! mapper.map_marc("title_t", "245a")?.clean_documents()?;
//!
//! let records = vec![Record::builder(Leader::default())
//!     .field(Field::builder("245".to_string(), '1', '0')
//!         .subfield_str('a', "Moby Dick /")
//!         .build())
//!     .build()];
//!
//! let mut docs = Vec::new();
//! let summary = mapper.process(records, |doc| {
//!     docs.push(doc);
//!     Ok(ControlFlow::Continue(()))
//! })?;
//!
//! assert_eq!(summary.emitted, 1);
//! assert_eq!(docs[0].get_text("title_t"), Some("Moby Dick"));
//! # Ok::<(), marcsift::SiftError>(())
//! ```

use std::ops::ControlFlow;

use tracing::{debug, info, trace, warn};

use crate::context::{CancelToken, RecordContext};
use crate::document::Document;
use crate::error::{Result, SiftError, Stage};
use crate::invoke::resolve;
use crate::registry::{AfterStep, Mapper};
use crate::source::SourceRecord;

/// Counts for a finished (or stopped) run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    /// Records taken from the input.
    pub processed: usize,
    /// Documents handed to `on_emit`.
    pub emitted: usize,
    /// Whether the run stopped before the input was exhausted.
    pub cancelled: bool,
}

impl<R: SourceRecord + 'static> Mapper<R> {
    /// Map every record in `collection`, handing each document to `on_emit`.
    ///
    /// Freezes the registry on first call.
    ///
    /// # Errors
    ///
    /// [`SiftError::RuleInvocation`] if a hook, variable, rule or filter
    /// fails; errors returned by `on_emit` are propagated unchanged.
    pub fn process<I, F>(&self, collection: I, on_emit: F) -> Result<ProcessSummary>
    where
        I: IntoIterator<Item = R>,
        F: FnMut(Document) -> Result<ControlFlow<()>>,
    {
        self.process_with_cancel(collection, &CancelToken::new(), on_emit)
    }

    /// [`Mapper::process`] with a caller-held cancellation token.
    ///
    /// # Errors
    ///
    /// See [`Mapper::process`].
    pub fn process_with_cancel<I, F>(
        &self,
        collection: I,
        cancel: &CancelToken,
        on_emit: F,
    ) -> Result<ProcessSummary>
    where
        I: IntoIterator<Item = R>,
        F: FnMut(Document) -> Result<ControlFlow<()>>,
    {
        self.run(collection.into_iter().map(Ok), cancel, on_emit)
    }

    /// [`Mapper::process`] over fallible input, such as a
    /// [`MarcReader`](crate::reader::MarcReader). An input error aborts the run.
    ///
    /// # Errors
    ///
    /// The input error converted into [`SiftError`], or see [`Mapper::process`].
    pub fn process_results<I, E, F>(&self, collection: I, on_emit: F) -> Result<ProcessSummary>
    where
        I: IntoIterator<Item = std::result::Result<R, E>>,
        SiftError: From<E>,
        F: FnMut(Document) -> Result<ControlFlow<()>>,
    {
        self.run(
            collection.into_iter().map(|item| item.map_err(SiftError::from)),
            &CancelToken::new(),
            on_emit,
        )
    }

    /// Map a single record outside of a run.
    ///
    /// Returns `None` if a Before hook cancelled. Freezes the registry.
    ///
    /// # Errors
    ///
    /// See [`Mapper::process`].
    pub fn map_one(&self, record: R) -> Result<Option<Document>> {
        self.seal();
        let mut ctx = RecordContext::new(record, 0);
        self.assemble(&mut ctx)
    }

    fn run<I, F>(&self, items: I, cancel: &CancelToken, mut on_emit: F) -> Result<ProcessSummary>
    where
        I: Iterator<Item = Result<R>>,
        F: FnMut(Document) -> Result<ControlFlow<()>>,
    {
        self.seal();
        let mut summary = ProcessSummary::default();

        for (index, item) in items.enumerate() {
            if cancel.is_cancelled() {
                warn!(index, "processing cancelled");
                summary.cancelled = true;
                break;
            }

            let record = item?;
            summary.processed += 1;
            let mut ctx = RecordContext::with_cancel(record, index, cancel.clone());

            let Some(document) = self.assemble(&mut ctx)? else {
                warn!(index, "processing cancelled by before hook");
                summary.cancelled = true;
                break;
            };

            trace!(index, fields = document.len(), "emitting document");
            summary.emitted += 1;
            if on_emit(document)?.is_break() {
                debug!(index, "emit callback stopped processing");
                summary.cancelled = true;
                break;
            }
        }

        info!(
            processed = summary.processed,
            emitted = summary.emitted,
            cancelled = summary.cancelled,
            "mapping run finished"
        );
        Ok(summary)
    }

    /// Run hooks, variables and rules for one record.
    fn assemble(&self, ctx: &mut RecordContext<R>) -> Result<Option<Document>> {
        let index = ctx.index();

        trace!(index, hooks = self.befores.len(), "running before hooks");
        for (position, hook) in self.befores.iter().enumerate() {
            hook.invoke(ctx).map_err(|e| {
                SiftError::invocation(Stage::BeforeHook, format!("before#{position}"), index, e)
            })?;
            if ctx.is_cancelled() {
                return Ok(None);
            }
        }

        for var in &self.vars {
            let value = resolve(&var.source, ctx, &self.capabilities)
                .map_err(|e| SiftError::invocation(Stage::Variable, &var.name, index, e))?;
            ctx.set_var(var.name.clone(), value);
        }

        trace!(index, rules = self.rules.len(), "evaluating rules");
        ctx.start_document(self.defaults.clone());
        for rule in &self.rules {
            let value = resolve(rule.source(), ctx, &self.capabilities)
                .map_err(|e| SiftError::invocation(Stage::Rule, rule.field(), index, e))?;
            ctx.assign(rule.field(), value);
        }
        let mut document = ctx.take_document();

        trace!(index, steps = self.afters.len(), "running after hooks");
        for (position, step) in self.afters.iter().enumerate() {
            match step {
                AfterStep::Hook(hook) => hook.invoke(&mut document).map_err(|e| {
                    SiftError::invocation(Stage::AfterHook, format!("after#{position}"), index, e)
                })?,
                AfterStep::Filter { fields, transform } => {
                    for field in fields {
                        let current = document.get(field).cloned();
                        let value = transform(current).map_err(|e| {
                            SiftError::invocation(Stage::Filter, field, index, e)
                        })?;
                        document.set(field.clone(), value);
                    }
                },
            }
        }

        Ok(Some(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Value;
    use crate::invoke::{Callable, ValueSource};
    use crate::leader::Leader;
    use crate::record::{Field, Record};

    fn titled(title: &str) -> Record {
        Record::builder(Leader::default())
            .field(
                Field::builder("245".to_string(), '1', '0')
                    .subfield_str('a', title)
                    .build(),
            )
            .build()
    }

    fn collect(mapper: &Mapper<Record>, records: Vec<Record>) -> Result<Vec<Document>> {
        let mut docs = Vec::new();
        mapper.process(records, |doc| {
            docs.push(doc);
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(docs)
    }

    #[test]
    fn test_later_rule_wins() {
        let mut mapper: Mapper<Record> = Mapper::new();
        mapper
            .map_literal("format", "Book")
            .unwrap()
            .map_literal("format", "Serial")
            .unwrap();
        let docs = collect(&mapper, vec![titled("x")]).unwrap();
        assert_eq!(docs[0].get_text("format"), Some("Serial"));
    }

    #[test]
    fn test_index_visible_to_rules() {
        let mut mapper: Mapper<Record> = Mapper::new();
        mapper
            .map_with("position", |ctx: &mut RecordContext<Record>| {
                Ok(Some(Value::Text(ctx.index().to_string())))
            })
            .unwrap();
        let docs = collect(&mapper, vec![titled("a"), titled("b")]).unwrap();
        assert_eq!(docs[0].get_text("position"), Some("0"));
        assert_eq!(docs[1].get_text("position"), Some("1"));
    }

    #[test]
    fn test_rules_read_earlier_assignments() {
        let mut mapper: Mapper<Record> = Mapper::new();
        mapper
            .default_value("collection", "main")
            .unwrap()
            .map_marc("title", "245a")
            .unwrap()
            .map_with("title_sort", |ctx: &mut RecordContext<Record>| {
                Ok(ctx.assigned("title").map(|t| Value::Text(t.to_string().to_lowercase())))
            })
            .unwrap()
            .map_with("shelf", |ctx: &mut RecordContext<Record>| {
                Ok(ctx.assigned("collection").cloned())
            })
            .unwrap();
        let docs = collect(&mapper, vec![titled("Moby Dick"), titled("Omoo")]).unwrap();
        assert_eq!(docs[0].get_text("title_sort"), Some("moby dick"));
        assert_eq!(docs[1].get_text("title_sort"), Some("omoo"));
        assert_eq!(docs[1].get_text("shelf"), Some("main"));
    }

    #[test]
    fn test_variables_feed_rules() {
        let mut mapper: Mapper<Record> = Mapper::new();
        mapper
            .var("title", ValueSource::marc("245a"))
            .unwrap()
            .map_with("title_display", |ctx: &mut RecordContext<Record>| {
                Ok(ctx.var("title").map(|t| Value::Text(format!("[{t}]"))))
            })
            .unwrap();
        let docs = collect(&mapper, vec![titled("Moby Dick")]).unwrap();
        assert_eq!(docs[0].get_text("title_display"), Some("[Moby Dick]"));
    }

    #[test]
    fn test_defaults_and_filters() {
        let mut mapper: Mapper<Record> = Mapper::new();
        mapper
            .default_value("collection", "main")
            .unwrap()
            .map_marc("title", "245a")
            .unwrap()
            .filter(["title", "missing"], |value| {
                Ok(value.map(|v| Value::Text(v.to_string().to_lowercase())))
            })
            .unwrap();
        let docs = collect(&mapper, vec![titled("Moby Dick")]).unwrap();
        assert_eq!(docs[0].get_text("collection"), Some("main"));
        assert_eq!(docs[0].get_text("title"), Some("moby dick"));
        assert!(!docs[0].contains_key("missing"));
    }

    #[test]
    fn test_failure_aborts_without_partial_emission() {
        let mut mapper: Mapper<Record> = Mapper::new();
        mapper
            .map_with("title", |ctx: &mut RecordContext<Record>| {
                if ctx.index() == 1 {
                    return Err(anyhow::anyhow!("bad record").into());
                }
                ctx.extract("245a")
            })
            .unwrap();

        let mut emitted = Vec::new();
        let err = mapper
            .process(vec![titled("a"), titled("b"), titled("c")], |doc| {
                emitted.push(doc);
                Ok(ControlFlow::Continue(()))
            })
            .unwrap_err();

        assert_eq!(emitted.len(), 1);
        assert!(matches!(
            err,
            SiftError::RuleInvocation { stage: Stage::Rule, ref target, index: 1, .. }
                if target == "title"
        ));
    }

    #[test]
    fn test_after_hooks_see_document() {
        let mut mapper: Mapper<Record> = Mapper::new();
        mapper
            .map_marc("title", "245a")
            .unwrap()
            .after(Callable::transformer(|doc: &mut Document| {
                let count = doc.len().to_string();
                doc.insert("field_count", count);
                Ok(())
            }))
            .unwrap();
        let docs = collect(&mapper, vec![titled("x")]).unwrap();
        assert_eq!(docs[0].get_text("field_count"), Some("1"));
    }

    #[test]
    fn test_map_one() {
        let mut mapper: Mapper<Record> = Mapper::new();
        mapper.map_marc("title", "245a").unwrap();
        let doc = mapper.map_one(titled("Solo")).unwrap().unwrap();
        assert_eq!(doc.get_text("title"), Some("Solo"));
        assert!(mapper.is_sealed());
    }
}
