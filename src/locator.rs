//! Alias-restricted view of a registry.

use indexmap::IndexMap;

use crate::{ContainerError, ServiceContainer, ServiceRegistry, Value};

/// One allow-listed identifier, optionally exposed under an alias.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alias {
    alias: String,
    id: String,
}

impl Alias {
    /// Exposes `id` under its own name.
    pub fn same(id: impl Into<String>) -> Self {
        let id = id.into();
        Alias {
            alias: id.clone(),
            id,
        }
    }

    /// Exposes `id` as `alias`.
    pub fn mapped(alias: impl Into<String>, id: impl Into<String>) -> Self {
        Alias {
            alias: alias.into(),
            id: id.into(),
        }
    }
}

impl From<&str> for Alias {
    fn from(id: &str) -> Self {
        Alias::same(id)
    }
}

impl From<String> for Alias {
    fn from(id: String) -> Self {
        Alias::same(id)
    }
}

impl<A: Into<String>, I: Into<String>> From<(A, I)> for Alias {
    fn from((alias, id): (A, I)) -> Self {
        Alias::mapped(alias, id)
    }
}

/// Exposes a fixed allow-list of registry entries, each under an alias.
///
/// Identifiers outside the allow-list are invisible, even if the registry holds them.
///
/// # Examples
///
/// ```rust
/// use service_registry::{Entry, ServiceContainer, ServiceLocator, ServiceRegistry};
///
/// let registry = ServiceRegistry::new();
/// registry.set("service", Entry::service(|_| "instance")).unwrap();
///
/// let locator = ServiceLocator::new(registry, [("alias", "service")]);
/// assert!(locator.has("alias"));
/// assert!(!locator.has("service"));
/// assert_eq!(*locator.get_as::<&str>("alias").unwrap(), "instance");
/// ```
#[derive(Clone, Debug)]
pub struct ServiceLocator {
    registry: ServiceRegistry,
    aliases: IndexMap<String, String>,
}

impl ServiceLocator {
    /// Builds a locator over `registry`. A later alias replaces an earlier one with the same name.
    pub fn new<I, A>(registry: ServiceRegistry, ids: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Alias>,
    {
        let aliases = ids
            .into_iter()
            .map(|entry| {
                let Alias { alias, id } = entry.into();
                (alias, id)
            })
            .collect();

        ServiceLocator { registry, aliases }
    }

    /// Visible aliases, in the order given at construction.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }
}

impl ServiceContainer for ServiceLocator {
    fn get(&self, id: &str) -> Result<Value, ContainerError> {
        let target = self
            .aliases
            .get(id)
            .ok_or_else(|| ContainerError::NotFound { id: id.to_owned() })?;

        Ok(self.registry.get(target)?)
    }

    fn has(&self, id: &str) -> bool {
        self.aliases
            .get(id)
            .is_some_and(|target| self.registry.exists(target))
    }
}
