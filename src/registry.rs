//! A lazy, memoizing registry mapping string identifiers to values and service definitions.
//!
//! Plain values are stored and returned as-is. Definitions are invoked with the registry on
//! first access; the produced value replaces the definition in its slot and the identifier
//! becomes frozen. Factories are re-invoked on every access, protected callables are never
//! invoked.
//!
//! # Examples
//!
//! ```
//! use service_registry::{Entry, ServiceRegistry};
//! use std::sync::Arc;
//!
//! struct Mailer {
//!     transport: String,
//! }
//!
//! let registry = ServiceRegistry::new();
//! registry.set("transport", Entry::value("smtp".to_string())).unwrap();
//! registry
//!     .set(
//!         "mailer",
//!         Entry::service(|c| Mailer {
//!             transport: (*c.get_as::<String>("transport").unwrap()).clone(),
//!         }),
//!     )
//!     .unwrap();
//!
//! let first: Arc<Mailer> = registry.get_as("mailer").unwrap();
//! let second: Arc<Mailer> = registry.get_as("mailer").unwrap();
//! assert!(Arc::ptr_eq(&first, &second));
//! assert_eq!(first.transport, "smtp");
//! ```

use std::{
    cell::RefCell,
    collections::HashSet,
    fmt,
    sync::{Arc, Weak},
};

use indexmap::IndexMap;
use parking_lot::{Mutex, ReentrantMutex};

use crate::{Definition, Entry, RegistryError, RegistryEvent, ServiceProvider, Value};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `RegistryEvent` every time the registry is
/// interacted with. It must be thread-safe because registries can be shared across threads.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

// -------------------------------------------------------------------------------------------------
// State
// -------------------------------------------------------------------------------------------------

enum Slot {
    /// Not yet resolved, or never resolvable (values and factories).
    Open(Entry),
    /// A protected callable. `value` wraps `definition` once so every access returns it as-is.
    Protected { value: Value, definition: Definition },
    /// A shared service that has been produced. `raw` is the definition that produced it.
    Frozen { value: Value, raw: Definition },
}

impl From<Entry> for Slot {
    fn from(entry: Entry) -> Self {
        match entry {
            Entry::Protected(definition) => Slot::Protected {
                value: Arc::new(definition.clone()),
                definition,
            },
            entry => Slot::Open(entry),
        }
    }
}

#[derive(Default)]
struct State {
    slots: IndexMap<String, Slot>,
    resolving: HashSet<String>,
}

struct Shared {
    state: ReentrantMutex<RefCell<State>>,
    trace: Mutex<Option<Arc<TraceCallback>>>,
}

/// Marks an identifier as being resolved for as long as it is alive.
///
/// Dropping the guard clears the marker on every exit path, including errors and unwinding.
struct ResolvingGuard<'a> {
    state: &'a RefCell<State>,
    id: String,
}

impl<'a> ResolvingGuard<'a> {
    fn enter(state: &'a RefCell<State>, id: &str) -> Result<Self, RegistryError> {
        if !state.borrow_mut().resolving.insert(id.to_owned()) {
            return Err(RegistryError::CyclicDependency { id: id.to_owned() });
        }

        Ok(ResolvingGuard {
            state,
            id: id.to_owned(),
        })
    }
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        self.state.borrow_mut().resolving.remove(&self.id);
    }
}

// -------------------------------------------------------------------------------------------------
// Registry
// -------------------------------------------------------------------------------------------------

/// Identifier-keyed registry of parameters and lazily-built services.
///
/// `ServiceRegistry` is a handle: cloning it yields another handle to the same state, so
/// definitions can capture the registry they are resolved from.
///
/// A handle stored inside the registry it points to (directly, or through a [`Container`] or
/// [`ServiceLocator`]) keeps that registry alive forever. Services that need to hold on to
/// their registry should store a [`WeakServiceRegistry`] from [`downgrade`](Self::downgrade).
///
/// [`Container`]: crate::Container
/// [`ServiceLocator`]: crate::ServiceLocator
///
/// Every top-level operation holds a reentrant lock for its whole duration. Definitions may
/// call back into the registry from the resolving thread; other threads wait.
#[derive(Clone)]
pub struct ServiceRegistry {
    shared: Arc<Shared>,
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

/// A non-owning handle to a [`ServiceRegistry`], created by
/// [`ServiceRegistry::downgrade`].
#[derive(Clone, Debug)]
pub struct WeakServiceRegistry {
    shared: Weak<Shared>,
}

impl WeakServiceRegistry {
    /// Returns a handle to the registry, or `None` if every owning handle has been dropped.
    pub fn upgrade(&self) -> Option<ServiceRegistry> {
        self.shared.upgrade().map(|shared| ServiceRegistry { shared })
    }
}

impl ServiceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::with_state(State::default())
    }

    /// Creates a registry seeded with `values`, in iteration order.
    ///
    /// # Examples
    ///
    /// ```
    /// use service_registry::{Entry, ServiceRegistry};
    ///
    /// let registry = ServiceRegistry::from_values([("param", Entry::value("value"))]);
    /// assert_eq!(*registry.get_as::<&str>("param").unwrap(), "value");
    /// ```
    pub fn from_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Entry)>,
        K: Into<String>,
    {
        let mut state = State::default();
        for (id, entry) in values {
            state.slots.insert(id.into(), Slot::from(entry));
        }
        Self::with_state(state)
    }

    fn with_state(state: State) -> Self {
        ServiceRegistry {
            shared: Arc::new(Shared {
                state: ReentrantMutex::new(RefCell::new(state)),
                trace: Mutex::new(None),
            }),
        }
    }

    /// Returns `true` if both handles refer to the same registry.
    pub fn ptr_eq(&self, other: &ServiceRegistry) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Creates a handle that does not keep the registry alive.
    pub fn downgrade(&self) -> WeakServiceRegistry {
        WeakServiceRegistry {
            shared: Arc::downgrade(&self.shared),
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Tracing
    // ---------------------------------------------------------------------------------------------

    /// Sets a tracing callback invoked for every registry operation.
    ///
    /// The callback runs without any borrow of the registry state, so it may call into other
    /// registries (or this one) freely.
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        *self.shared.trace.lock() = Some(Arc::new(callback));
    }

    /// Clears the tracing callback.
    pub fn clear_trace_callback(&self) {
        *self.shared.trace.lock() = None;
    }

    fn emit(&self, event: impl FnOnce() -> RegistryEvent) {
        let callback = self.shared.trace.lock().clone();
        if let Some(callback) = callback {
            callback(&event());
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Slots
    // ---------------------------------------------------------------------------------------------

    /// Checks whether `id` has a slot, whatever it holds.
    pub fn exists(&self, id: &str) -> bool {
        let found = {
            let lock = self.shared.state.lock();
            let found = lock.borrow().slots.contains_key(id);
            found
        };

        self.emit(|| RegistryEvent::Exists {
            id: id.to_owned(),
            found,
        });

        found
    }

    /// Checks whether the service under `id` has already been produced.
    pub fn is_frozen(&self, id: &str) -> bool {
        let lock = self.shared.state.lock();
        let frozen = matches!(lock.borrow().slots.get(id), Some(Slot::Frozen { .. }));
        frozen
    }

    /// Stores `entry` under `id`.
    ///
    /// Replacing an entry keeps the identifier's original position in [`keys`](Self::keys).
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Frozen`] if the service under `id` has already been produced.
    ///   [`remove`](Self::remove) it first to redefine it.
    pub fn set(&self, id: impl Into<String>, entry: impl Into<Entry>) -> Result<(), RegistryError> {
        let id = id.into();

        {
            let lock = self.shared.state.lock();
            let mut state = lock.borrow_mut();
            if let Some(Slot::Frozen { .. }) = state.slots.get(&id) {
                return Err(RegistryError::frozen(&id));
            }
            state.slots.insert(id.clone(), Slot::from(entry.into()));
        }

        self.emit(|| RegistryEvent::Set { id });
        Ok(())
    }

    /// Resolves `id`.
    ///
    /// - Plain values and frozen services are returned as stored.
    /// - Protected callables are returned as a value holding the [`Definition`].
    /// - Factories are invoked with the registry on every call.
    /// - Shared services are invoked once; the result is memoized and `id` becomes frozen.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownIdentifier`] if `id` has no slot.
    /// - [`RegistryError::CyclicDependency`] if `id` is requested again while it is being built.
    /// - Any error returned by the invoked definition.
    pub fn get(&self, id: &str) -> Result<Value, RegistryError> {
        let result = self.resolve(id);

        self.emit(|| RegistryEvent::Get {
            id: id.to_owned(),
            found: result.is_ok(),
        });

        result
    }

    fn resolve(&self, id: &str) -> Result<Value, RegistryError> {
        let lock = self.shared.state.lock();

        let (definition, factory) = match lock.borrow().slots.get(id) {
            None => return Err(RegistryError::unknown(id)),
            Some(Slot::Frozen { value, .. }) => return Ok(value.clone()),
            Some(Slot::Open(Entry::Value(value))) => return Ok(value.clone()),
            Some(Slot::Protected { value, .. }) => return Ok(value.clone()),
            Some(Slot::Open(Entry::Protected(definition))) => {
                return Ok(Arc::new(definition.clone()) as Value)
            }
            Some(Slot::Open(Entry::Service(definition))) => (definition.clone(), false),
            Some(Slot::Open(Entry::Factory(definition))) => (definition.clone(), true),
        };

        let _guard = ResolvingGuard::enter(&lock, id)?;

        tracing::debug!(id, factory, "resolving service definition");
        self.emit(|| RegistryEvent::Resolve {
            id: id.to_owned(),
            factory,
        });

        let value = definition.invoke(self)?;

        if !factory {
            let mut state = lock.borrow_mut();
            if let Some(slot) = state.slots.get_mut(id) {
                *slot = Slot::Frozen {
                    value: value.clone(),
                    raw: definition,
                };
                tracing::debug!(id, "service frozen");
            }
        }

        Ok(value)
    }

    /// Resolves `id` and downcasts the result to `T`.
    ///
    /// # Errors
    ///
    /// Everything [`get`](Self::get) returns, plus [`RegistryError::TypeMismatch`] when the
    /// value is not a `T`.
    pub fn get_as<T: Send + Sync + 'static>(&self, id: &str) -> Result<Arc<T>, RegistryError> {
        self.get(id)?
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch {
                id: id.to_owned(),
                type_name: std::any::type_name::<T>(),
            })
    }

    /// Removes `id` together with its frozen state and raw definition. No-op if absent.
    ///
    /// The factory and protected tags live on the removed entry and go with it.
    pub fn remove(&self, id: &str) {
        let removed = {
            let lock = self.shared.state.lock();
            let removed = lock.borrow_mut().slots.shift_remove(id).is_some();
            removed
        };

        if removed {
            self.emit(|| RegistryEvent::Remove { id: id.to_owned() });
        }
    }

    /// Returns all identifiers in the order they were first set.
    pub fn keys(&self) -> Vec<String> {
        let lock = self.shared.state.lock();
        let keys = lock.borrow().slots.keys().cloned().collect();
        keys
    }

    // ---------------------------------------------------------------------------------------------
    // Definitions
    // ---------------------------------------------------------------------------------------------

    /// Marks a definition as a factory, re-invoked on every access.
    ///
    /// A protected callable stays protected. Returns the retagged entry so it can be passed
    /// straight to [`set`](Self::set).
    ///
    /// # Errors
    ///
    /// [`RegistryError::ExpectedInvokable`] if `entry` is a plain value.
    pub fn factory(&self, entry: Entry) -> Result<Entry, RegistryError> {
        match entry {
            Entry::Value(_) => Err(RegistryError::ExpectedInvokable {
                message: "Service definition is not a Closure or invokable object.",
            }),
            Entry::Protected(d) => Ok(Entry::Protected(d)),
            Entry::Service(d) | Entry::Factory(d) => Ok(Entry::Factory(d)),
        }
    }

    /// Protects a callable from being treated as a definition.
    ///
    /// [`get`](Self::get) returns the callable itself instead of invoking it.
    ///
    /// # Errors
    ///
    /// [`RegistryError::ExpectedInvokable`] if `entry` is a plain value.
    pub fn protect(&self, entry: Entry) -> Result<Entry, RegistryError> {
        match entry {
            Entry::Value(_) => Err(RegistryError::ExpectedInvokable {
                message: "Callable is not a Closure or invokable object.",
            }),
            Entry::Service(d) | Entry::Factory(d) | Entry::Protected(d) => {
                Ok(Entry::Protected(d))
            }
        }
    }

    /// Returns the definition that produced `id`, or the stored entry if nothing was produced.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownIdentifier`] if `id` has no slot.
    pub fn raw(&self, id: &str) -> Result<Entry, RegistryError> {
        let lock = self.shared.state.lock();
        let entry = match lock.borrow().slots.get(id) {
            None => return Err(RegistryError::unknown(id)),
            Some(Slot::Frozen { raw, .. }) => Entry::Service(raw.clone()),
            Some(Slot::Protected { definition, .. }) => Entry::Protected(definition.clone()),
            Some(Slot::Open(entry)) => entry.clone(),
        };
        Ok(entry)
    }

    /// Wraps the definition under `id` with `extender`.
    ///
    /// The composed definition invokes the current one, then passes its result and the
    /// registry to `extender`. It is installed under `id` (keeping its position) and returned.
    /// A factory stays a factory. Extending a protected callable logs a warning and turns it
    /// into a shared service.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownIdentifier`] if `id` has no slot.
    /// - [`RegistryError::Frozen`] if the service was already produced.
    /// - [`RegistryError::InvalidServiceIdentifier`] if `id` holds a plain value.
    pub fn extend<F>(&self, id: &str, extender: F) -> Result<Entry, RegistryError>
    where
        F: Fn(Value, &ServiceRegistry) -> Result<Value, RegistryError> + Send + Sync + 'static,
    {
        let lock = self.shared.state.lock();

        let current = match lock.borrow().slots.get(id) {
            None => return Err(RegistryError::unknown(id)),
            Some(Slot::Frozen { .. }) => return Err(RegistryError::frozen(id)),
            Some(Slot::Protected { definition, .. }) => Entry::Protected(definition.clone()),
            Some(Slot::Open(entry)) => entry.clone(),
        };

        let (base, factory) = match current {
            Entry::Value(_) => {
                return Err(RegistryError::InvalidServiceIdentifier { id: id.to_owned() })
            }
            Entry::Protected(definition) => {
                tracing::warn!(
                    id,
                    "Are you sure \"{}\" should be protected if you are trying to extend it?",
                    id
                );
                self.emit(|| RegistryEvent::ProtectedExtended { id: id.to_owned() });
                (definition, false)
            }
            Entry::Service(definition) => (definition, false),
            Entry::Factory(definition) => (definition, true),
        };

        let composed = Definition::new(move |registry| {
            let value = base.invoke(registry)?;
            extender(value, registry)
        });

        let entry = if factory {
            Entry::Factory(composed)
        } else {
            Entry::Service(composed)
        };

        self.set(id, entry.clone())?;
        drop(lock);

        self.emit(|| RegistryEvent::Extend { id: id.to_owned() });
        Ok(entry)
    }

    // ---------------------------------------------------------------------------------------------
    // Providers
    // ---------------------------------------------------------------------------------------------

    /// Runs `provider` against this registry.
    ///
    /// Returns the registry so calls can be chained.
    pub fn register<P>(&self, provider: &P) -> Result<&Self, RegistryError>
    where
        P: ServiceProvider + ?Sized,
    {
        self.register_with(provider, std::iter::empty::<(String, Entry)>())
    }

    /// Runs `provider` against this registry, then stores `values` in order.
    ///
    /// # Errors
    ///
    /// Whatever the provider returns, or [`RegistryError::Frozen`] if one of `values` targets
    /// a frozen service.
    pub fn register_with<P, I, K>(&self, provider: &P, values: I) -> Result<&Self, RegistryError>
    where
        P: ServiceProvider + ?Sized,
        I: IntoIterator<Item = (K, Entry)>,
        K: Into<String>,
    {
        self.emit(|| RegistryEvent::Provider {});
        provider.register(self)?;

        for (id, entry) in values {
            self.set(id, entry)?;
        }

        Ok(self)
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
