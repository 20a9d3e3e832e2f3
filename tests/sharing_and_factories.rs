//! Integration tests for memoized services, factories, protected callables and raw access.

use service_registry::{Definition, Entry, RegistryError, ServiceRegistry, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct DummyService {
    id: usize,
}

struct NonInvokable {
    name: &'static str,
}

fn counting_service(calls: &Arc<AtomicUsize>) -> Entry {
    let calls = calls.clone();
    Entry::service(move |_| DummyService {
        id: calls.fetch_add(1, Ordering::SeqCst),
    })
}

#[test]
fn test_unknown_ids_are_absent() {
    let registry = ServiceRegistry::new();

    for id in ["foo", "", "a.b.c"] {
        assert!(!registry.exists(id));
        assert!(matches!(
            registry.get(id),
            Err(RegistryError::UnknownIdentifier { .. })
        ));
    }
}

#[test]
fn test_plain_values_are_returned_unchanged() {
    let registry = ServiceRegistry::new();
    let shared = Arc::new(NonInvokable { name: "param" });

    registry.set("object", shared.clone() as Value).unwrap();
    registry.set("list", Entry::value(vec![1, 2, 3])).unwrap();

    let object = registry.get_as::<NonInvokable>("object").unwrap();
    assert!(Arc::ptr_eq(&object, &shared));
    assert_eq!(object.name, "param");

    for _ in 0..3 {
        assert_eq!(*registry.get_as::<Vec<i32>>("list").unwrap(), vec![1, 2, 3]);
    }
    assert!(!registry.is_frozen("list"));
}

#[test]
fn test_shared_service_is_built_once() {
    let registry = ServiceRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    registry.set("shared_service", counting_service(&calls)).unwrap();

    let services: Vec<_> = (0..5)
        .map(|_| registry.get_as::<DummyService>("shared_service").unwrap())
        .collect();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(services.iter().all(|s| Arc::ptr_eq(s, &services[0])));
}

#[test]
fn test_raw_after_resolution() {
    let registry = ServiceRegistry::new();
    let definition = Definition::from_fn(|_| DummyService { id: 1 });
    registry.set("service", definition.clone()).unwrap();

    let produced = registry.get_as::<DummyService>("service").unwrap();
    assert_eq!(produced.id, 1);

    match registry.raw("service").unwrap() {
        Entry::Service(raw) => assert!(raw.ptr_eq(&definition)),
        other => panic!("expected the original definition, got {other:?}"),
    }
}

#[test]
fn test_raw_of_plain_value() {
    let registry = ServiceRegistry::new();
    registry.set("param", Entry::value(3u8)).unwrap();

    match registry.raw("param").unwrap() {
        Entry::Value(value) => assert_eq!(value.downcast_ref::<u8>(), Some(&3)),
        other => panic!("expected a value, got {other:?}"),
    }
}

#[test]
fn test_factory_returns_unique_instances() {
    let registry = ServiceRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let entry = registry.factory(counting_service(&calls)).unwrap();
    registry.set("service", entry).unwrap();

    let one = registry.get_as::<DummyService>("service").unwrap();
    let two = registry.get_as::<DummyService>("service").unwrap();

    assert!(!Arc::ptr_eq(&one, &two));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(!registry.is_frozen("service"));

    // Factories never freeze, so they can be replaced at any time
    registry.set("service", Entry::value(0u8)).unwrap();
}

#[test]
fn test_factory_raw_is_the_factory() {
    let registry = ServiceRegistry::new();
    let entry = registry.factory(Entry::service(|_| "foo")).unwrap();
    let definition = entry.definition().cloned().unwrap();
    registry.set("service", entry).unwrap();

    let _ = registry.get("service").unwrap();

    let raw = registry.raw("service").unwrap();
    assert!(raw.is_factory());
    assert!(raw.definition().unwrap().ptr_eq(&definition));
}

#[test]
fn test_same_factory_under_two_ids() {
    let registry = ServiceRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let entry = registry.factory(counting_service(&calls)).unwrap();

    registry.set("one", entry.clone()).unwrap();
    registry.set("two", entry).unwrap();

    registry.get("one").unwrap();
    registry.get("one").unwrap();
    registry.get("two").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    // Removing one id leaves the other one a factory
    registry.remove("one");
    registry.get("two").unwrap();
    registry.get("two").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 5);
}

#[test]
fn test_protected_callable_is_a_value() {
    let registry = ServiceRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let entry = registry.protect(counting_service(&calls)).unwrap();
    let definition = entry.definition().cloned().unwrap();
    registry.set("protected_service", entry).unwrap();

    let stored = registry.get_as::<Definition>("protected_service").unwrap();
    assert!(stored.ptr_eq(&definition));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    // Caller can still invoke it explicitly
    let built = stored.invoke(&registry).unwrap();
    assert_eq!(built.downcast_ref::<DummyService>().unwrap().id, 0);
    assert!(!registry.is_frozen("protected_service"));
}

#[test]
fn test_factory_does_not_unprotect() {
    let registry = ServiceRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let protected = registry.protect(counting_service(&calls)).unwrap();
    let entry = registry.factory(protected).unwrap();
    assert!(entry.is_protected());
    assert!(!entry.is_factory());
    registry.set("protected_service", entry).unwrap();

    registry.get_as::<Definition>("protected_service").unwrap();
    registry.get_as::<Definition>("protected_service").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!registry.is_frozen("protected_service"));
}

#[test]
fn test_protected_value_is_stable_across_gets() {
    let registry = ServiceRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let entry = registry.protect(counting_service(&calls)).unwrap();
    registry.set("protected_service", entry).unwrap();

    let first = registry.get("protected_service").unwrap();
    let second = registry.get("protected_service").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(registry.raw("protected_service").unwrap().is_protected());
}

#[test]
fn test_invalid_definitions_are_rejected() {
    let registry = ServiceRegistry::new();

    assert!(matches!(
        registry.factory(Entry::value(NonInvokable { name: "x" })),
        Err(RegistryError::ExpectedInvokable { .. })
    ));
    assert!(matches!(
        registry.protect(Entry::value(123)),
        Err(RegistryError::ExpectedInvokable { .. })
    ));
}

#[test]
fn test_frozen_service_cannot_be_overwritten() {
    let registry = ServiceRegistry::new();
    registry.set("foo", Entry::service(|_| DummyService { id: 1 })).unwrap();
    let first = registry.get_as::<DummyService>("foo").unwrap();

    let err = registry
        .set("foo", Entry::service(|_| DummyService { id: 2 }))
        .unwrap_err();
    assert_eq!(err.to_string(), "Cannot override frozen service \"foo\".");

    // The delivered instance is still the one served
    let again = registry.get_as::<DummyService>("foo").unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    registry.remove("foo");
    registry.set("foo", Entry::service(|_| DummyService { id: 2 })).unwrap();
    assert_eq!(registry.get_as::<DummyService>("foo").unwrap().id, 2);
}

#[test]
fn test_unresolved_service_can_be_overwritten() {
    let registry = ServiceRegistry::new();
    registry.set("foo", Entry::service(|_| 1u8)).unwrap();
    registry.set("foo", Entry::service(|_| 2u8)).unwrap();

    assert_eq!(*registry.get_as::<u8>("foo").unwrap(), 2);
}

#[test]
fn test_remove_clears_every_trace() {
    let registry = ServiceRegistry::new();
    registry.set("param", Entry::value("value")).unwrap();
    registry.set("service", Entry::service(|_| DummyService { id: 0 })).unwrap();
    registry.get("service").unwrap();

    registry.remove("param");
    registry.remove("service");

    assert!(!registry.exists("param"));
    assert!(!registry.exists("service"));
    assert!(!registry.is_frozen("service"));
    assert!(matches!(
        registry.raw("service"),
        Err(RegistryError::UnknownIdentifier { .. })
    ));
    assert!(registry.keys().is_empty());
}

#[test]
fn test_definitions_depend_on_each_other() {
    let registry = ServiceRegistry::new();
    registry.set("dsn", Entry::value("sqlite::memory:".to_string())).unwrap();
    registry
        .set(
            "connection",
            Entry::try_service(|c| {
                let dsn = c.get_as::<String>("dsn")?;
                Ok(Arc::new(format!("connected to {dsn}")) as Value)
            }),
        )
        .unwrap();

    assert_eq!(
        *registry.get_as::<String>("connection").unwrap(),
        "connected to sqlite::memory:"
    );
}

#[test]
fn test_definition_error_propagates() {
    let registry = ServiceRegistry::new();
    registry
        .set(
            "broken",
            Entry::try_service(|c| c.get_as::<String>("missing").map(|v| v as Value)),
        )
        .unwrap();

    let err = registry.get("broken").unwrap_err();
    assert!(matches!(err, RegistryError::UnknownIdentifier { ref id } if id == "missing"));
    assert!(!registry.is_frozen("broken"));
}
