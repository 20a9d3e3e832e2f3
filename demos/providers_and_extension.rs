//! Providers, extension and tracing.
//!
//! Demonstrates:
//! - Grouping registrations in a `ServiceProvider`
//! - Decorating a definition with `extend` before it is first resolved
//! - Watching registry activity with a trace callback
//! - Iterating over a chosen set of services
//!
//! Run with: `cargo run --example providers_and_extension`

use service_registry::{
    Entry, RegistryError, ServiceIterator, ServiceProvider, ServiceRegistry, Value,
};
use std::sync::Arc;

struct Mailer {
    transport: String,
    signature: Option<String>,
}

struct MailerProvider;

impl ServiceProvider for MailerProvider {
    fn register(&self, registry: &ServiceRegistry) -> Result<(), RegistryError> {
        registry.set("mailer.transport", Entry::value("smtp".to_string()))?;
        registry.set(
            "mailer",
            Entry::try_service(|c| {
                Ok(Arc::new(Mailer {
                    transport: (*c.get_as::<String>("mailer.transport")?).clone(),
                    signature: None,
                }) as Value)
            }),
        )
    }
}

fn main() -> Result<(), RegistryError> {
    println!("=== service-registry: Providers and Extension ===\n");

    let registry = ServiceRegistry::new();
    registry.set_trace_callback(|event| println!("   [trace] {}", event));

    // -------------------------------------------------------------------------
    // 1. Register a provider, overriding one of its parameters
    // -------------------------------------------------------------------------
    println!("1. Registering MailerProvider...");

    registry.register_with(
        &MailerProvider,
        [("mailer.transport", Entry::value("sendmail".to_string()))],
    )?;

    // -------------------------------------------------------------------------
    // 2. Extend the mailer before anyone uses it
    // -------------------------------------------------------------------------
    println!("\n2. Extending the mailer...");

    registry.extend("mailer", |value, _| {
        let mailer = value
            .downcast_ref::<Mailer>()
            .ok_or_else(|| RegistryError::service("mailer has an unexpected type"))?;
        Ok(Arc::new(Mailer {
            transport: mailer.transport.clone(),
            signature: Some("-- sent by MyApp".to_string()),
        }) as Value)
    })?;

    // -------------------------------------------------------------------------
    // 3. Resolve it
    // -------------------------------------------------------------------------
    println!("\n3. Resolving the mailer...");

    let mailer: Arc<Mailer> = registry.get_as("mailer")?;
    println!(
        "   transport = {}, signature = {:?}",
        mailer.transport, mailer.signature
    );

    // Extending a resolved service is rejected
    if let Err(err) = registry.extend("mailer", |value, _| Ok(value)) {
        println!("   extend after resolution: {}", err);
    }

    // -------------------------------------------------------------------------
    // 4. Iterate
    // -------------------------------------------------------------------------
    println!("\n4. Iterating over selected services...");
    registry.clear_trace_callback();

    let services = ServiceIterator::new(registry.clone(), ["mailer.transport", "mailer"]);
    for item in &services {
        let (id, _) = item?;
        println!("   - {}", id);
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
