//! Integration tests for process-wide registries created with `define_registry!`.
//!
//! NOTE: All tests use #[serial] because they share the same registry (app).
//! Running them in parallel would cause interference.

use serial_test::serial;
use service_registry::{
    define_registry, Container, Entry, RegistryError, ServiceContainer, ServiceProvider,
    ServiceRegistry, Value,
};
use std::sync::Arc;

define_registry!(app);

fn reset() {
    for id in app::keys() {
        app::remove(&id);
    }
}

#[derive(Clone, Debug, PartialEq)]
struct AppConfig {
    database_url: String,
    max_connections: u32,
}

struct Database {
    url: String,
}

struct DatabaseProvider;

impl ServiceProvider for DatabaseProvider {
    fn register(&self, registry: &ServiceRegistry) -> Result<(), RegistryError> {
        registry.set(
            "database",
            Entry::try_service(|c| {
                let config = c.get_as::<AppConfig>("config")?;
                Ok(Arc::new(Database {
                    url: config.database_url.clone(),
                }) as Value)
            }),
        )
    }
}

#[test]
#[serial]
fn test_configuration_pattern() {
    reset();

    let config = AppConfig {
        database_url: "postgresql://localhost/mydb".to_string(),
        max_connections: 100,
    };
    app::set("config", Entry::value(config.clone())).unwrap();

    let retrieved: Arc<AppConfig> = app::get_as("config").unwrap();
    assert_eq!(*retrieved, config);
}

#[test]
#[serial]
fn test_provider_pattern() {
    reset();

    app::registry()
        .register_with(
            &DatabaseProvider,
            [(
                "config",
                Entry::value(AppConfig {
                    database_url: "postgres://db".to_string(),
                    max_connections: 4,
                }),
            )],
        )
        .unwrap();

    let db: Arc<Database> = app::get_as("database").unwrap();
    assert_eq!(db.url, "postgres://db");
    assert_eq!(app::get_as::<AppConfig>("config").unwrap().max_connections, 4);
    assert_eq!(app::keys(), vec!["database", "config"]);
}

#[test]
#[serial]
fn test_reset_allows_redefinition() {
    reset();

    app::set("counter", Entry::service(|_| 1u32)).unwrap();
    assert_eq!(*app::get_as::<u32>("counter").unwrap(), 1);
    assert!(matches!(
        app::set("counter", Entry::value(2u32)),
        Err(RegistryError::Frozen { .. })
    ));

    reset();
    app::set("counter", Entry::value(2u32)).unwrap();
    assert_eq!(*app::get_as::<u32>("counter").unwrap(), 2);
}

#[test]
#[serial]
fn test_facade_over_global_registry() {
    reset();

    app::set("greeting", Entry::value("hello")).unwrap();
    let container = Container::new(app::registry().clone());

    assert!(container.has("greeting"));
    assert_eq!(*container.get_as::<&str>("greeting").unwrap(), "hello");
}

#[test]
#[serial]
fn test_thread_access() {
    reset();

    app::set("shared", Entry::service(|_| String::from("built once"))).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| app::get_as::<String>("shared").unwrap()))
        .collect();
    let values: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(values.iter().all(|v| Arc::ptr_eq(v, &values[0])));
}
