//! Macros for creating process-wide registries.

/// Creates a module holding a lazily initialised, process-wide [`ServiceRegistry`].
///
/// The macro generates a module containing:
/// - The registry static (hidden)
/// - `registry()`, returning the static for trait-based or facade use
/// - Free functions delegating to the registry: `set`, `get`, `get_as`, `exists`,
///   `remove`, `keys`, `set_trace_callback`, `clear_trace_callback`
///
/// [`ServiceRegistry`]: crate::ServiceRegistry
///
/// # Examples
///
/// ```rust
/// use service_registry::{define_registry, Entry};
/// use std::sync::Arc;
///
/// define_registry!(app);
///
/// app::set("greeting", Entry::value("Hello".to_string())).unwrap();
/// app::set("counter", Entry::service(|_| 42i32)).unwrap();
///
/// let greeting: Arc<String> = app::get_as("greeting").unwrap();
/// let counter: Arc<i32> = app::get_as("counter").unwrap();
///
/// assert_eq!(&**greeting, "Hello");
/// assert_eq!(*counter, 42);
/// ```
///
/// # Multiple Registries
///
/// Each invocation creates an isolated registry:
///
/// ```rust
/// use service_registry::{define_registry, Entry};
///
/// define_registry!(database);
/// define_registry!(cache);
///
/// database::set("url", Entry::value("postgres://localhost")).unwrap();
///
/// assert!(database::exists("url"));
/// assert!(!cache::exists("url"));
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        #[allow(dead_code)]
        pub mod $name {
            use std::sync::{Arc, LazyLock};

            use $crate::{Entry, RegistryError, RegistryEvent, ServiceRegistry, Value};

            static REGISTRY: LazyLock<ServiceRegistry> = LazyLock::new(ServiceRegistry::new);

            /// The registry behind this module.
            pub fn registry() -> &'static ServiceRegistry {
                &REGISTRY
            }

            pub fn set(id: impl Into<String>, entry: impl Into<Entry>) -> Result<(), RegistryError> {
                REGISTRY.set(id, entry)
            }

            pub fn get(id: &str) -> Result<Value, RegistryError> {
                REGISTRY.get(id)
            }

            pub fn get_as<T: Send + Sync + 'static>(id: &str) -> Result<Arc<T>, RegistryError> {
                REGISTRY.get_as(id)
            }

            pub fn exists(id: &str) -> bool {
                REGISTRY.exists(id)
            }

            pub fn remove(id: &str) {
                REGISTRY.remove(id)
            }

            pub fn keys() -> Vec<String> {
                REGISTRY.keys()
            }

            pub fn set_trace_callback(callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
                REGISTRY.set_trace_callback(callback)
            }

            pub fn clear_trace_callback() {
                REGISTRY.clear_trace_callback()
            }
        }
    };
}
