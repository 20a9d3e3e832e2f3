//! Values and definitions stored in a [`ServiceRegistry`].
//!
//! A registry slot holds an [`Entry`]. The entry's tag decides how [`ServiceRegistry::get`]
//! treats it: plain values are returned as-is, services are invoked once and memoized,
//! factories are invoked on every access, and protected callables are never invoked.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::{RegistryError, ServiceRegistry};

/// A type-erased value held by the registry.
///
/// "Same instance" means [`Arc::ptr_eq`].
pub type Value = Arc<dyn Any + Send + Sync>;

type DefinitionFn = dyn Fn(&ServiceRegistry) -> Result<Value, RegistryError> + Send + Sync;

/// A callable that produces a value when invoked with the registry.
///
/// Cloning is cheap and preserves identity, see [`Definition::ptr_eq`].
#[derive(Clone)]
pub struct Definition(Arc<DefinitionFn>);

impl Definition {
    /// Wraps a fallible constructor.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ServiceRegistry) -> Result<Value, RegistryError> + Send + Sync + 'static,
    {
        Definition(Arc::new(f))
    }

    /// Wraps an infallible constructor whose result is stored behind an `Arc`.
    pub fn from_fn<T, F>(f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceRegistry) -> T + Send + Sync + 'static,
    {
        Definition::new(move |registry| Ok(Arc::new(f(registry)) as Value))
    }

    /// Invokes the definition with `registry` as its sole argument.
    pub fn invoke(&self, registry: &ServiceRegistry) -> Result<Value, RegistryError> {
        (self.0)(registry)
    }

    /// Returns `true` if both handles point to the same callable.
    pub fn ptr_eq(&self, other: &Definition) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Definition({:p})", Arc::as_ptr(&self.0))
    }
}

/// What a registry slot holds.
#[derive(Clone, Debug)]
pub enum Entry {
    /// A parameter. Never invoked.
    Value(Value),
    /// A shared service: invoked on first access, then frozen.
    Service(Definition),
    /// A factory: invoked on every access, never frozen.
    Factory(Definition),
    /// A callable stored as a parameter. Returned verbatim, never invoked.
    Protected(Definition),
}

impl Entry {
    /// Stores `value` as a parameter.
    pub fn value<T: Send + Sync + 'static>(value: T) -> Self {
        Entry::Value(Arc::new(value))
    }

    /// Stores a shared service built by `f`.
    pub fn service<T, F>(f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceRegistry) -> T + Send + Sync + 'static,
    {
        Entry::Service(Definition::from_fn(f))
    }

    /// Stores a shared service built by a fallible constructor.
    pub fn try_service<F>(f: F) -> Self
    where
        F: Fn(&ServiceRegistry) -> Result<Value, RegistryError> + Send + Sync + 'static,
    {
        Entry::Service(Definition::new(f))
    }

    /// Returns the callable behind a service, factory or protected entry.
    pub fn definition(&self) -> Option<&Definition> {
        match self {
            Entry::Value(_) => None,
            Entry::Service(d) | Entry::Factory(d) | Entry::Protected(d) => Some(d),
        }
    }

    pub fn is_factory(&self) -> bool {
        matches!(self, Entry::Factory(_))
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Entry::Protected(_))
    }
}

impl From<Definition> for Entry {
    fn from(definition: Definition) -> Self {
        Entry::Service(definition)
    }
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Entry::Value(value)
    }
}
