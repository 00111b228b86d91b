//! Callable dispatch.
//!
//! Every rule body, hook and scratch variable is a [`Callable`]: either a
//! [`Callable::Supplier`] that takes no input, or a [`Callable::Transformer`]
//! that receives the context (the record context for rules and Before hooks,
//! the document for After hooks). The variant is chosen by the caller when the
//! callable is registered.
//!
//! A rule's [`ValueSource`] is then one of a literal, a delegate naming a
//! [`Capability`], or a callback.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::context::RecordContext;
use crate::document::Value;
use crate::error::{Result, SiftError};
use crate::extract::Selector;
use crate::source::SourceRecord;

/// A named operation on a record context, invoked by delegate rules with
/// string arguments.
pub type Capability<R> =
    Arc<dyn Fn(&RecordContext<R>, &[String]) -> Result<Option<Value>> + Send + Sync>;

/// A zero- or one-argument function evaluated against a context `C`.
pub enum Callable<C, T> {
    /// Called with no input.
    Supplier(Arc<dyn Fn() -> Result<T> + Send + Sync>),
    /// Called with the context.
    Transformer(Arc<dyn Fn(&mut C) -> Result<T> + Send + Sync>),
}

impl<C, T> Callable<C, T> {
    /// Wrap a function that takes no input.
    pub fn supplier<F>(f: F) -> Self
    where
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        Callable::Supplier(Arc::new(f))
    }

    /// Wrap a function of the context.
    pub fn transformer<F>(f: F) -> Self
    where
        F: Fn(&mut C) -> Result<T> + Send + Sync + 'static,
    {
        Callable::Transformer(Arc::new(f))
    }

    /// Number of parameters the callable accepts.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Callable::Supplier(_) => 0,
            Callable::Transformer(_) => 1,
        }
    }

    /// Call it: suppliers get nothing, transformers get `ctx`.
    ///
    /// # Errors
    ///
    /// Whatever the wrapped function returns.
    pub fn invoke(&self, ctx: &mut C) -> Result<T> {
        match self {
            Callable::Supplier(f) => f(),
            Callable::Transformer(f) => f(ctx),
        }
    }
}

impl<C, T> Clone for Callable<C, T> {
    fn clone(&self) -> Self {
        match self {
            Callable::Supplier(f) => Callable::Supplier(Arc::clone(f)),
            Callable::Transformer(f) => Callable::Transformer(Arc::clone(f)),
        }
    }
}

impl<C, T> fmt::Debug for Callable<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Supplier(_) => f.write_str("Callable::Supplier"),
            Callable::Transformer(_) => f.write_str("Callable::Transformer"),
        }
    }
}

/// Where a rule's value comes from.
pub enum ValueSource<R> {
    /// Fixed value(s): one is a scalar, several a list, none absent.
    Literal(Vec<String>),
    /// Invoke a named capability with the given arguments.
    Delegate {
        /// Capability name.
        capability: String,
        /// Arguments passed through verbatim.
        args: Vec<String>,
    },
    /// Evaluate a callable against the record context.
    Callback(Callable<RecordContext<R>, Option<Value>>),
}

impl<R> ValueSource<R> {
    /// A single fixed value.
    pub fn literal(value: impl Into<String>) -> Self {
        ValueSource::Literal(vec![value.into()])
    }

    /// Several fixed values, producing a list.
    pub fn literals<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueSource::Literal(values.into_iter().map(Into::into).collect())
    }

    /// Delegate to a capability with no arguments.
    pub fn delegate(capability: impl Into<String>) -> Self {
        Self::delegate_with(capability, Vec::<String>::new())
    }

    /// Delegate to a capability with arguments.
    pub fn delegate_with<I, S>(capability: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueSource::Delegate {
            capability: capability.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// A callback that ignores the record.
    pub fn supplier<F>(f: F) -> Self
    where
        F: Fn() -> Result<Option<Value>> + Send + Sync + 'static,
    {
        ValueSource::Callback(Callable::supplier(f))
    }

    /// A callback of the record context.
    pub fn transformer<F>(f: F) -> Self
    where
        F: Fn(&mut RecordContext<R>) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        ValueSource::Callback(Callable::transformer(f))
    }
}

impl<R: SourceRecord + 'static> ValueSource<R> {
    /// A callback extracting field codes from the record.
    pub fn marc(selector: impl Into<Selector>) -> Self {
        let selector = selector.into();
        Self::transformer(move |ctx| ctx.extract(selector.clone()))
    }
}

impl<R> Clone for ValueSource<R> {
    fn clone(&self) -> Self {
        match self {
            ValueSource::Literal(values) => ValueSource::Literal(values.clone()),
            ValueSource::Delegate { capability, args } => ValueSource::Delegate {
                capability: capability.clone(),
                args: args.clone(),
            },
            ValueSource::Callback(callable) => ValueSource::Callback(callable.clone()),
        }
    }
}

impl<R> fmt::Debug for ValueSource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Literal(values) => f.debug_tuple("Literal").field(values).finish(),
            ValueSource::Delegate { capability, args } => f
                .debug_struct("Delegate")
                .field("capability", capability)
                .field("args", args)
                .finish(),
            ValueSource::Callback(callable) => f.debug_tuple("Callback").field(callable).finish(),
        }
    }
}

/// Mapper-level capabilities, by name.
pub struct Capabilities<R> {
    entries: IndexMap<String, Capability<R>>,
}

impl<R> Default for Capabilities<R> {
    fn default() -> Self {
        Capabilities {
            entries: IndexMap::new(),
        }
    }
}

impl<R> Capabilities<R> {
    /// Register (or replace) a capability.
    pub fn insert<F>(&mut self, name: impl Into<String>, capability: F)
    where
        F: Fn(&RecordContext<R>, &[String]) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Arc::new(capability));
    }

    /// Look a capability up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Capability<R>> {
        self.entries.get(name)
    }

    /// Whether a capability is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<R> fmt::Debug for Capabilities<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

/// Resolve a rule's value against the current record.
///
/// Capabilities attached to the record context take precedence over the
/// mapper-level ones.
///
/// # Errors
///
/// [`SiftError::UnknownCapability`] for a delegate naming nothing known, or
/// whatever the capability or callback returns.
pub fn resolve<R>(
    source: &ValueSource<R>,
    ctx: &mut RecordContext<R>,
    capabilities: &Capabilities<R>,
) -> Result<Option<Value>> {
    match source {
        ValueSource::Literal(values) => Ok(match values.as_slice() {
            [] => None,
            [single] => Some(Value::Text(single.clone())),
            many => Some(Value::List(many.to_vec())),
        }),
        ValueSource::Delegate { capability, args } => {
            let found = ctx
                .attached_capability(capability)
                .or_else(|| capabilities.get(capability))
                .cloned()
                .ok_or_else(|| SiftError::UnknownCapability(capability.clone()))?;
            found(ctx, args)
        },
        ValueSource::Callback(callable) => callable.invoke(ctx),
    }
}
