//! Ordered, restartable traversal over a chosen set of registry entries.

use std::slice;

use crate::{RegistryError, ServiceRegistry, Value};

/// Resolves a fixed, ordered list of identifiers on demand.
///
/// Nothing is resolved until the sequence is walked. Each call to [`iter`](Self::iter) starts
/// over from the first identifier.
///
/// # Examples
///
/// ```rust
/// use service_registry::{Entry, ServiceIterator, ServiceRegistry};
///
/// let registry = ServiceRegistry::new();
/// registry.set("foo", Entry::service(|_| "bar")).unwrap();
/// registry.set("baz", Entry::value(1u8)).unwrap();
///
/// let services = ServiceIterator::new(registry, ["foo"]);
/// let ids: Vec<String> = services.iter().map(|item| item.unwrap().0).collect();
/// assert_eq!(ids, vec!["foo"]);
/// ```
#[derive(Clone, Debug)]
pub struct ServiceIterator {
    registry: ServiceRegistry,
    ids: Vec<String>,
}

impl ServiceIterator {
    pub fn new<I, K>(registry: ServiceRegistry, ids: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        ServiceIterator {
            registry,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Walks the identifiers from the start, resolving each one as it is reached.
    pub fn iter(&self) -> Services<'_> {
        Services {
            registry: &self.registry,
            ids: self.ids.iter(),
        }
    }
}

impl<'a> IntoIterator for &'a ServiceIterator {
    type Item = Result<(String, Value), RegistryError>;
    type IntoIter = Services<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`ServiceIterator::iter`].
#[derive(Clone, Debug)]
pub struct Services<'a> {
    registry: &'a ServiceRegistry,
    ids: slice::Iter<'a, String>,
}

impl Iterator for Services<'_> {
    type Item = Result<(String, Value), RegistryError>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.ids.next()?;
        Some(self.registry.get(id).map(|value| (id.clone(), value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl ExactSizeIterator for Services<'_> {}
