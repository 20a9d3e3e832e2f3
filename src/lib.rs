//! # Service Registry
//!
//! A minimal inversion-of-control container: string identifiers map to plain values or to
//! lazily built, memoized services.
//!
//! ## Quick Start
//!
//! ```rust
//! use service_registry::{Entry, ServiceRegistry};
//! use std::sync::Arc;
//!
//! struct Logger {
//!     prefix: String,
//! }
//!
//! let registry = ServiceRegistry::new();
//! registry.set("prefix", Entry::value("[app]".to_string())).unwrap();
//! registry
//!     .set("logger", Entry::service(|c| Logger {
//!         prefix: c.get_as::<String>("prefix").map(|p| (*p).clone()).unwrap_or_default(),
//!     }))
//!     .unwrap();
//!
//! let logger: Arc<Logger> = registry.get_as("logger").unwrap();
//! assert_eq!(logger.prefix, "[app]");
//! ```
//!
//! ## Features
//!
//! - **Lazy services**: definitions run on first access and are frozen afterwards
//! - **Factories**: definitions re-run on every access
//! - **Protected callables**: callables stored as plain values
//! - **Extension**: decorate a definition before it is first resolved
//! - **Cycle detection**: re-entrant resolution of an identifier fails instead of recursing
//! - **Tracing support**: `tracing` diagnostics plus an optional per-registry event callback
//!
//! ## Main Types
//!
//! - [`ServiceRegistry`] - the registry and its resolution engine
//! - [`Entry`] / [`Definition`] - what a slot holds
//! - [`Container`] / [`ServiceLocator`] - read-only facades implementing [`ServiceContainer`]
//! - [`ServiceIterator`] - lazy traversal over selected identifiers
//! - [`ServiceProvider`] - bulk registration hook
//! - [`define_registry!`] - process-wide named registries

mod container;
mod container_trait;
mod entry;
mod iterator;
mod locator;
mod macros;
mod provider;
mod registry;
mod registry_error;
mod registry_event;

pub use container::Container;
pub use container_trait::ServiceContainer;
pub use entry::{Definition, Entry, Value};
pub use iterator::{ServiceIterator, Services};
pub use locator::{Alias, ServiceLocator};
pub use provider::ServiceProvider;
pub use registry::{ServiceRegistry, TraceCallback, WeakServiceRegistry};
pub use registry_error::{ContainerError, RegistryError};
pub use registry_event::RegistryEvent;
