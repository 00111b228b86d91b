//! Rule and hook registration.
//!
//! A [`Mapper`] is populated once during setup: rules, Before and After hooks,
//! scratch variables, field filters, defaults and capabilities, each appended
//! in order. The first call to [`Mapper::process`] freezes it; any later
//! registration fails with [`SiftError::Configuration`].
//!
//! # Examples
//!
//! ```
//! use marcsift::{Mapper, Record, ValueSource};
//!
//! let mut mapper: Mapper<Record> = Mapper::new();
//! mapper
//!     .map_literal("source_facet", "Local catalog")?
//!     .map_marc("title_t", vec!["245a"])?
//!     .map_marc("title_sort", "245a")?
//!     .register("id", ValueSource::delegate("control_code"))?;
//! assert_eq!(mapper.rules().len(), 4);
//! # Ok::<(), marcsift::SiftError>(())
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::cleaner::Cleaner;
use crate::context::RecordContext;
use crate::document::{Document, Value};
use crate::error::{Result, SiftError};
use crate::extract::Selector;
use crate::invoke::{Callable, Capabilities, ValueSource};
use crate::source::SourceRecord;

/// What to do when a field name is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateFields {
    /// Keep both rules; the later rule's result wins in the document.
    #[default]
    Overwrite,
    /// Fail the second registration.
    Reject,
}

/// Setup-time options for a [`Mapper`].
#[derive(Debug, Clone, Default)]
pub struct MapperConfig {
    /// Duplicate field-name policy.
    pub duplicate_fields: DuplicateFields,
}

/// A field-mapping rule: one document key and where its value comes from.
pub struct Rule<R> {
    field: String,
    source: ValueSource<R>,
}

impl<R> Rule<R> {
    /// Pair a field name with a value source.
    pub fn new(field: impl Into<String>, source: ValueSource<R>) -> Self {
        Rule {
            field: field.into(),
            source,
        }
    }

    /// Start a [`RuleBuilder`].
    pub fn builder(field: impl Into<String>) -> RuleBuilder<R> {
        RuleBuilder {
            field: field.into(),
            literal: None,
            delegate: None,
            callback: None,
        }
    }

    /// The document key this rule assigns.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Where the value comes from.
    pub fn source(&self) -> &ValueSource<R> {
        &self.source
    }
}

impl<R> fmt::Debug for Rule<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("field", &self.field)
            .field("source", &self.source)
            .finish()
    }
}

/// Builds a [`Rule`] from separately supplied parts.
///
/// At most one of a literal, a delegate or a callback may be given. With none
/// the rule produces no value.
pub struct RuleBuilder<R> {
    field: String,
    literal: Option<Vec<String>>,
    delegate: Option<(String, Vec<String>)>,
    callback: Option<Callable<RecordContext<R>, Option<Value>>>,
}

impl<R> RuleBuilder<R> {
    /// Add a fixed value. Repeated calls accumulate into a list.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.literal.get_or_insert_with(Vec::new).push(value.into());
        self
    }

    /// Delegate to a capability.
    #[must_use]
    pub fn delegate<I, S>(mut self, capability: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.delegate = Some((
            capability.into(),
            args.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Evaluate a callable.
    #[must_use]
    pub fn callback(mut self, callable: Callable<RecordContext<R>, Option<Value>>) -> Self {
        self.callback = Some(callable);
        self
    }

    /// Finish the rule.
    ///
    /// # Errors
    ///
    /// [`SiftError::Configuration`] when more than one value source was given.
    pub fn build(self) -> Result<Rule<R>> {
        let given = [
            self.literal.is_some(),
            self.delegate.is_some(),
            self.callback.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();
        if given > 1 {
            return Err(SiftError::Configuration(format!(
                "rule '{}': provide a value or a callback, not both",
                self.field
            )));
        }

        let source = if let Some(values) = self.literal {
            ValueSource::Literal(values)
        } else if let Some((capability, args)) = self.delegate {
            ValueSource::Delegate { capability, args }
        } else if let Some(callable) = self.callback {
            ValueSource::Callback(callable)
        } else {
            ValueSource::Literal(Vec::new())
        };
        Ok(Rule::new(self.field, source))
    }
}

impl<R> fmt::Debug for RuleBuilder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleBuilder")
            .field("field", &self.field)
            .field("literal", &self.literal)
            .field("delegate", &self.delegate)
            .field("callback", &self.callback)
            .finish()
    }
}

/// A per-record scratch value, evaluated after the Before hooks.
pub(crate) struct Variable<R> {
    pub(crate) name: String,
    pub(crate) source: ValueSource<R>,
}

/// A transform of selected document fields.
pub(crate) type FieldTransform = Arc<dyn Fn(Option<Value>) -> Result<Option<Value>> + Send + Sync>;

/// One step of the After phase, kept in registration order.
pub(crate) enum AfterStep {
    Hook(Callable<Document, ()>),
    Filter {
        fields: Vec<String>,
        transform: FieldTransform,
    },
}

/// The rule registry and the entry point for processing.
///
/// See the [`pipeline`](crate::pipeline) module for [`Mapper::process`].
pub struct Mapper<R> {
    pub(crate) config: MapperConfig,
    pub(crate) rules: Vec<Rule<R>>,
    pub(crate) befores: Vec<Callable<RecordContext<R>, ()>>,
    pub(crate) vars: Vec<Variable<R>>,
    pub(crate) afters: Vec<AfterStep>,
    pub(crate) defaults: Document,
    pub(crate) capabilities: Capabilities<R>,
    sealed: AtomicBool,
}

impl<R> Default for Mapper<R> {
    fn default() -> Self {
        Self::with_config(MapperConfig::default())
    }
}

impl<R> Mapper<R> {
    /// An empty mapper with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty mapper.
    #[must_use]
    pub fn with_config(config: MapperConfig) -> Self {
        Mapper {
            config,
            rules: Vec::new(),
            befores: Vec::new(),
            vars: Vec::new(),
            afters: Vec::new(),
            defaults: Document::new(),
            capabilities: Capabilities::default(),
            sealed: AtomicBool::new(false),
        }
    }

    /// The configuration.
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Registered rules in order.
    pub fn rules(&self) -> &[Rule<R>] {
        &self.rules
    }

    /// Mapper-level capabilities.
    pub fn capabilities(&self) -> &Capabilities<R> {
        &self.capabilities
    }

    /// Whether processing has started and the registry is frozen.
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    pub(crate) fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
    }

    fn ensure_open(&self, what: &str) -> Result<()> {
        if self.is_sealed() {
            return Err(SiftError::Configuration(format!(
                "cannot register {what} after processing has started"
            )));
        }
        Ok(())
    }

    /// Append a rule.
    ///
    /// # Errors
    ///
    /// [`SiftError::Configuration`] if processing has started, or if the field
    /// is already mapped and [`DuplicateFields::Reject`] is configured.
    pub fn add_rule(&mut self, rule: Rule<R>) -> Result<&mut Self> {
        self.ensure_open(&format!("rule '{}'", rule.field))?;
        if self.config.duplicate_fields == DuplicateFields::Reject
            && self.rules.iter().any(|r| r.field == rule.field)
        {
            return Err(SiftError::Configuration(format!(
                "field '{}' is already mapped",
                rule.field
            )));
        }
        debug!(field = %rule.field, source = ?rule.source, "registered rule");
        self.rules.push(rule);
        Ok(self)
    }

    /// Append a rule mapping `field` to `source`.
    ///
    /// # Errors
    ///
    /// See [`Mapper::add_rule`].
    pub fn register(
        &mut self,
        field: impl Into<String>,
        source: ValueSource<R>,
    ) -> Result<&mut Self> {
        self.add_rule(Rule::new(field, source))
    }

    /// Map a field to a fixed value.
    ///
    /// # Errors
    ///
    /// See [`Mapper::add_rule`].
    pub fn map_literal(
        &mut self,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self> {
        self.register(field, ValueSource::literal(value))
    }

    /// Map a field to a named capability.
    ///
    /// # Errors
    ///
    /// See [`Mapper::add_rule`].
    pub fn map_delegate(
        &mut self,
        field: impl Into<String>,
        capability: impl Into<String>,
    ) -> Result<&mut Self> {
        self.register(field, ValueSource::delegate(capability))
    }

    /// Map a field with a function of the record context.
    ///
    /// # Errors
    ///
    /// See [`Mapper::add_rule`].
    pub fn map_with<F>(&mut self, field: impl Into<String>, f: F) -> Result<&mut Self>
    where
        F: Fn(&mut RecordContext<R>) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        self.register(field, ValueSource::transformer(f))
    }

    /// Map a field with a function that takes no input.
    ///
    /// # Errors
    ///
    /// See [`Mapper::add_rule`].
    pub fn map_supplied<F>(&mut self, field: impl Into<String>, f: F) -> Result<&mut Self>
    where
        F: Fn() -> Result<Option<Value>> + Send + Sync + 'static,
    {
        self.register(field, ValueSource::supplier(f))
    }

    /// Register a Before hook.
    ///
    /// # Errors
    ///
    /// [`SiftError::Configuration`] if processing has started.
    pub fn before(&mut self, hook: Callable<RecordContext<R>, ()>) -> Result<&mut Self> {
        self.ensure_open("before hook")?;
        self.befores.push(hook);
        Ok(self)
    }

    /// Register an After hook.
    ///
    /// # Errors
    ///
    /// [`SiftError::Configuration`] if processing has started.
    pub fn after(&mut self, hook: Callable<Document, ()>) -> Result<&mut Self> {
        self.ensure_open("after hook")?;
        self.afters.push(AfterStep::Hook(hook));
        Ok(self)
    }

    /// Register the [`Cleaner`] as an After hook.
    ///
    /// # Errors
    ///
    /// [`SiftError::Configuration`] if processing has started.
    pub fn clean_documents(&mut self) -> Result<&mut Self> {
        self.after(Cleaner::default().into_hook())
    }

    /// Register a [`Cleaner`] that leaves the named fields untouched.
    ///
    /// # Errors
    ///
    /// [`SiftError::Configuration`] if processing has started.
    pub fn clean_documents_except<I, S>(&mut self, fields: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.after(Cleaner::preserving(fields).into_hook())
    }

    /// Register a scratch variable, evaluated per record after the Before
    /// hooks and readable from rules via [`RecordContext::var`].
    ///
    /// # Errors
    ///
    /// [`SiftError::Configuration`] if processing has started.
    pub fn var(&mut self, name: impl Into<String>, source: ValueSource<R>) -> Result<&mut Self> {
        let name = name.into();
        self.ensure_open(&format!("variable '{name}'"))?;
        self.vars.push(Variable { name, source });
        Ok(self)
    }

    /// Register a transform of the named fields, run in the After phase.
    ///
    /// The transform receives each field's current value (or `None`) and its
    /// result replaces it.
    ///
    /// # Errors
    ///
    /// [`SiftError::Configuration`] if processing has started.
    pub fn filter<I, S, F>(&mut self, fields: I, transform: F) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(Option<Value>) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        self.ensure_open("filter")?;
        self.afters.push(AfterStep::Filter {
            fields: fields.into_iter().map(Into::into).collect(),
            transform: Arc::new(transform),
        });
        Ok(self)
    }

    /// Set a value every document starts with; rules may overwrite it.
    ///
    /// # Errors
    ///
    /// [`SiftError::Configuration`] if processing has started.
    pub fn default_value(
        &mut self,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.ensure_open("default")?;
        self.defaults.insert(field, value);
        Ok(self)
    }

    /// Register a capability that delegate rules can name.
    ///
    /// # Errors
    ///
    /// [`SiftError::Configuration`] if processing has started.
    pub fn register_capability<F>(&mut self, name: impl Into<String>, f: F) -> Result<&mut Self>
    where
        F: Fn(&RecordContext<R>, &[String]) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        let name = name.into();
        self.ensure_open(&format!("capability '{name}'"))?;
        self.capabilities.insert(name, f);
        Ok(self)
    }
}

impl<R: SourceRecord + 'static> Mapper<R> {
    /// Map a field by extracting field codes from the record.
    ///
    /// # Errors
    ///
    /// [`SiftError::Extraction`] if a token is malformed (checked now rather
    /// than per record), or see [`Mapper::add_rule`].
    pub fn map_marc(
        &mut self,
        field: impl Into<String>,
        selector: impl Into<Selector>,
    ) -> Result<&mut Self> {
        let selector = selector.into();
        selector.specs()?;
        self.register(field, ValueSource::marc(selector))
    }
}

impl<R> fmt::Debug for Mapper<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("config", &self.config)
            .field("rules", &self.rules)
            .field("befores", &self.befores.len())
            .field("vars", &self.vars.iter().map(|v| &v.name).collect::<Vec<_>>())
            .field("afters", &self.afters.len())
            .field("defaults", &self.defaults)
            .field("capabilities", &self.capabilities)
            .field("sealed", &self.is_sealed())
            .finish()
    }
}
