//! Read-only view of a whole registry.

use crate::{ContainerError, ServiceContainer, ServiceRegistry, Value};

/// Exposes every identifier of a registry through [`ServiceContainer`].
///
/// # Examples
///
/// ```rust
/// use service_registry::{Container, ContainerError, Entry, ServiceContainer, ServiceRegistry};
///
/// let registry = ServiceRegistry::new();
/// registry.set("service", Entry::service(|_| 7u8)).unwrap();
///
/// let container = Container::new(registry);
/// assert!(container.has("service"));
/// assert_eq!(*container.get_as::<u8>("service").unwrap(), 7);
/// assert!(matches!(container.get("missing"), Err(ContainerError::NotFound { .. })));
/// ```
#[derive(Clone, Debug)]
pub struct Container {
    registry: ServiceRegistry,
}

impl Container {
    pub fn new(registry: ServiceRegistry) -> Self {
        Container { registry }
    }
}

impl ServiceContainer for Container {
    fn get(&self, id: &str) -> Result<Value, ContainerError> {
        Ok(self.registry.get(id)?)
    }

    fn has(&self, id: &str) -> bool {
        self.registry.exists(id)
    }
}
