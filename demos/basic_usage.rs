//! Basic usage example for service-registry.
//!
//! Demonstrates:
//! - Storing parameters with `Entry::value`
//! - Lazily built, shared services with `Entry::service`
//! - Factories that build a fresh instance on every `get`
//! - Protected callables that are stored rather than invoked
//! - Read-only access through `Container` and `ServiceLocator`
//!
//! Run with: `cargo run --example basic_usage`

use service_registry::{
    Container, Definition, Entry, RegistryError, ServiceContainer, ServiceLocator,
    ServiceRegistry, Value,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct AppConfig {
    name: String,
    debug_mode: bool,
}

#[derive(Debug)]
struct Request {
    number: u32,
}

fn main() -> Result<(), RegistryError> {
    println!("=== service-registry: Basic Usage ===\n");

    let registry = ServiceRegistry::new();

    // -------------------------------------------------------------------------
    // 1. Parameters
    // -------------------------------------------------------------------------
    println!("1. Storing parameters...");

    registry.set("app.name", Entry::value("MyApp".to_string()))?;
    registry.set("app.debug", Entry::value(true))?;

    println!("   Stored: app.name, app.debug");

    // -------------------------------------------------------------------------
    // 2. A shared service built from parameters
    // -------------------------------------------------------------------------
    println!("\n2. Defining a shared service...");

    registry.set(
        "config",
        Entry::try_service(|c| {
            Ok(Arc::new(AppConfig {
                name: (*c.get_as::<String>("app.name")?).clone(),
                debug_mode: *c.get_as::<bool>("app.debug")?,
            }) as Value)
        }),
    )?;

    let first: Arc<AppConfig> = registry.get_as("config")?;
    let second: Arc<AppConfig> = registry.get_as("config")?;
    println!("   Resolved: {:?}", first);
    println!("   Same instance: {}", Arc::ptr_eq(&first, &second));
    println!("   Frozen: {}", registry.is_frozen("config"));

    // -------------------------------------------------------------------------
    // 3. A factory
    // -------------------------------------------------------------------------
    println!("\n3. Defining a factory...");

    let counter = Arc::new(AtomicU32::new(1));
    let request = registry.factory(Entry::service(move |_| Request {
        number: counter.fetch_add(1, Ordering::SeqCst),
    }))?;
    registry.set("request", request)?;

    for _ in 0..3 {
        let request: Arc<Request> = registry.get_as("request")?;
        println!("   Built request #{}", request.number);
    }

    // -------------------------------------------------------------------------
    // 4. A protected callable
    // -------------------------------------------------------------------------
    println!("\n4. Protecting a callable...");

    let random = registry.protect(Entry::service(|_| 4u8))?;
    registry.set("random", random)?;

    let callable: Arc<Definition> = registry.get_as("random")?;
    let rolled = callable.invoke(&registry)?;
    println!("   Rolled a {:?}", rolled.downcast_ref::<u8>());

    // -------------------------------------------------------------------------
    // 5. Read-only facades
    // -------------------------------------------------------------------------
    println!("\n5. Read-only facades...");

    let container = Container::new(registry.clone());
    println!("   container.has(\"config\") = {}", container.has("config"));

    let locator = ServiceLocator::new(registry.clone(), [("settings", "config")]);
    println!("   locator.has(\"settings\") = {}", locator.has("settings"));
    println!("   locator.has(\"config\")   = {}", locator.has("config"));
    if let Ok(settings) = locator.get_as::<AppConfig>("settings") {
        println!("   settings.name = {}, debug = {}", settings.name, settings.debug_mode);
    }

    println!("\n   Keys: {:?}", registry.keys());
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
