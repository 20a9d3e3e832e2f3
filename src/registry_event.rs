/// Events emitted by a registry during operations.
///
/// These events are passed to the tracing callback set via
/// [`ServiceRegistry::set_trace_callback`](crate::ServiceRegistry::set_trace_callback).
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use service_registry::RegistryEvent;
///
/// let event = RegistryEvent::Set { id: "logger".to_string() };
/// assert_eq!(event.to_string(), "set { id: logger }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// An entry was stored under `id`.
    Set { id: String },

    /// A value was requested.
    Get {
        id: String,
        /// Whether the value was delivered.
        found: bool,
    },

    /// An existence check was performed.
    Exists { id: String, found: bool },

    /// A definition was invoked to produce a value.
    Resolve {
        id: String,
        /// `true` when the definition is a factory and the result was not memoized.
        factory: bool,
    },

    /// An entry was removed.
    Remove { id: String },

    /// A definition was wrapped by an extender.
    Extend { id: String },

    /// A protected callable was extended. Advisory only; the extension still happens.
    ProtectedExtended { id: String },

    /// A provider ran against the registry.
    Provider {},
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Set { id } => write!(f, "set {{ id: {} }}", id),
            RegistryEvent::Get { id, found } => {
                write!(f, "get {{ id: {}, found: {} }}", id, found)
            }
            RegistryEvent::Exists { id, found } => {
                write!(f, "exists {{ id: {}, found: {} }}", id, found)
            }
            RegistryEvent::Resolve { id, factory } => {
                write!(f, "resolve {{ id: {}, factory: {} }}", id, factory)
            }
            RegistryEvent::Remove { id } => write!(f, "remove {{ id: {} }}", id),
            RegistryEvent::Extend { id } => write!(f, "extend {{ id: {} }}", id),
            RegistryEvent::ProtectedExtended { id } => {
                write!(f, "protected-extended {{ id: {} }}", id)
            }
            RegistryEvent::Provider {} => write!(f, "Registering a provider"),
        }
    }
}
