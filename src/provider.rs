//! Bulk registration hook.

use crate::{RegistryError, ServiceRegistry};

/// Registers a group of related entries on a registry.
///
/// Providers run once per [`ServiceRegistry::register`] call. Closures taking the registry
/// implement this trait, so a provider can be a plain function.
///
/// # Examples
///
/// ```rust
/// use service_registry::{Entry, RegistryError, ServiceProvider, ServiceRegistry};
///
/// struct DatabaseProvider;
///
/// impl ServiceProvider for DatabaseProvider {
///     fn register(&self, registry: &ServiceRegistry) -> Result<(), RegistryError> {
///         registry.set("db.url", Entry::value("postgres://localhost"))?;
///         registry.set("db.pool_size", Entry::value(8u32))
///     }
/// }
///
/// let registry = ServiceRegistry::new();
/// registry.register(&DatabaseProvider).unwrap();
/// assert_eq!(registry.keys(), vec!["db.url", "db.pool_size"]);
/// ```
pub trait ServiceProvider {
    fn register(&self, registry: &ServiceRegistry) -> Result<(), RegistryError>;
}

impl<F> ServiceProvider for F
where
    F: Fn(&ServiceRegistry) -> Result<(), RegistryError>,
{
    fn register(&self, registry: &ServiceRegistry) -> Result<(), RegistryError> {
        self(registry)
    }
}
