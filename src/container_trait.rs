//! Read-only contract shared by the facades over a [`ServiceRegistry`](crate::ServiceRegistry).
//!
//! Facades cannot set, remove or extend entries. Missing identifiers surface as
//! [`ContainerError::NotFound`] instead of the registry's own unknown-identifier error.

use std::sync::Arc;

use crate::{ContainerError, RegistryError, Value};

/// Read-only access to resolved entries.
///
/// Implementors provide `get` and `has`; typed retrieval is provided on top.
pub trait ServiceContainer {
    /// Resolves `id`.
    ///
    /// # Errors
    ///
    /// - [`ContainerError::NotFound`] if `id` is not visible through this container
    /// - [`ContainerError::Registry`] for any other resolution failure
    fn get(&self, id: &str) -> Result<Value, ContainerError>;

    /// Checks whether `id` can be resolved through this container.
    fn has(&self, id: &str) -> bool;

    /// Resolves `id` and downcasts it to `T`.
    ///
    /// # Errors
    ///
    /// Everything `get` returns, plus a wrapped [`RegistryError::TypeMismatch`].
    fn get_as<T: Send + Sync + 'static>(&self, id: &str) -> Result<Arc<T>, ContainerError>
    where
        Self: Sized,
    {
        self.get(id)?.downcast::<T>().map_err(|_| {
            ContainerError::Registry(RegistryError::TypeMismatch {
                id: id.to_owned(),
                type_name: std::any::type_name::<T>(),
            })
        })
    }
}
