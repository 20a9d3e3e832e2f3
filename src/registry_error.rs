use std::error::Error;

/// Errors raised by [`ServiceRegistry`](crate::ServiceRegistry) operations.
///
/// All of them are configuration or programming errors. Nothing is retried internally.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The identifier has no slot.
    #[error("Identifier \"{id}\" is not defined.")]
    UnknownIdentifier { id: String },

    /// The identifier's service was already produced and cannot be overwritten or extended.
    #[error("Cannot override frozen service \"{id}\".")]
    Frozen { id: String },

    /// Resolution of the identifier re-entered itself before completing.
    #[error("Cyclic dependency detected while resolving \"{id}\".")]
    CyclicDependency { id: String },

    /// `extend` targeted an identifier holding a plain value.
    #[error("Identifier \"{id}\" does not contain an object definition.")]
    InvalidServiceIdentifier { id: String },

    /// `factory` or `protect` received a plain value instead of a definition.
    #[error("{message}")]
    ExpectedInvokable { message: &'static str },

    /// The resolved value is not of the requested type.
    #[error("Type mismatch for \"{id}\": expected {type_name}")]
    TypeMismatch { id: String, type_name: &'static str },

    /// A definition failed while producing its value.
    #[error("service definition failed: {0}")]
    Service(#[source] Box<dyn Error + Send + Sync>),
}

impl RegistryError {
    /// Wraps an arbitrary error raised inside a definition.
    pub fn service(error: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        RegistryError::Service(error.into())
    }

    pub(crate) fn unknown(id: &str) -> Self {
        RegistryError::UnknownIdentifier { id: id.to_owned() }
    }

    pub(crate) fn frozen(id: &str) -> Self {
        RegistryError::Frozen { id: id.to_owned() }
    }
}

/// Errors surfaced by read-only facades over the registry.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// The identifier is not visible through this container.
    #[error("Identifier \"{id}\" is not defined.")]
    NotFound { id: String },

    #[error(transparent)]
    Registry(RegistryError),
}

impl From<RegistryError> for ContainerError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::UnknownIdentifier { id } => ContainerError::NotFound { id },
            other => ContainerError::Registry(other),
        }
    }
}
