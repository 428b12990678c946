//! Integration tests for the producer shapes: closures, function pointers, associated
//! functions and methods bound to a receiver.

use lazy_registry::{Producer, Registry, RegistryError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

struct ConnectionPool {
    size: usize,
    built: AtomicUsize,
}

impl ConnectionPool {
    fn default_size() -> usize {
        42
    }

    fn parse_size() -> Result<usize, std::num::ParseIntError> {
        "not a number".parse()
    }

    fn doubled(&self) -> usize {
        self.built.fetch_add(1, Ordering::SeqCst);
        self.size * 2
    }

    fn checked(&self) -> Result<usize, String> {
        if self.size == 0 {
            Err("empty pool".to_string())
        } else {
            Ok(self.size)
        }
    }
}

#[test]
fn test_static_method_producer() {
    let registry = Registry::new();
    registry
        .set(
            "c",
            Producer::static_method::<ConnectionPool, _>(
                "default_size",
                ConnectionPool::default_size,
            ),
        )
        .unwrap();

    assert_eq!(registry.is_resolved("c"), Some(false));
    assert_eq!(*registry.get_as::<usize>("c").unwrap(), 42);
}

#[test]
fn test_failing_static_method_producer() {
    let registry = Registry::new();
    registry
        .set(
            "c",
            Producer::try_static_method::<ConnectionPool, _, _>(
                "parse_size",
                ConnectionPool::parse_size,
            ),
        )
        .unwrap();

    let err = registry.get("c").unwrap_err();
    assert!(matches!(err, RegistryError::Producer(_)));
    assert_eq!(registry.is_resolved("c"), Some(false));
}

#[test]
fn test_instance_method_producer() {
    let registry = Registry::new();
    let pool = Arc::new(ConnectionPool {
        size: 42,
        built: AtomicUsize::new(0),
    });

    registry
        .set("d", Producer::method(pool.clone(), "doubled", ConnectionPool::doubled))
        .unwrap();

    assert_eq!(pool.built.load(Ordering::SeqCst), 0);
    assert_eq!(*registry.get_as::<usize>("d").unwrap(), 84);
    assert_eq!(*registry.get_as::<usize>("d").unwrap(), 84);

    // the method ran against the same receiver, exactly once
    assert_eq!(pool.built.load(Ordering::SeqCst), 1);
}

#[test]
fn test_instance_method_error() {
    let registry = Registry::new();
    let pool = Arc::new(ConnectionPool {
        size: 0,
        built: AtomicUsize::new(0),
    });

    registry
        .set("d", Producer::try_method(pool, "checked", ConnectionPool::checked))
        .unwrap();

    let err = registry.get("d").unwrap_err();
    assert_eq!(err.to_string(), "empty pool");
}

#[test]
fn test_function_pointer_producer() {
    fn build() -> String {
        "built".to_string()
    }

    let registry = Registry::new();
    registry.set_lazy("f", build).unwrap();

    let value: String = registry.get_cloned("f").unwrap();
    assert_eq!(value, "built");
}

#[test]
fn test_closure_capturing_state() {
    let multiplier = 3;
    let registry = Registry::new();
    registry.set_lazy("m", move || 14 * multiplier).unwrap();

    assert_eq!(*registry.get_as::<i32>("m").unwrap(), 42);
}

#[test]
fn test_callable_as_value() {
    // A callable stored as a literal is returned as-is, never invoked.
    type Callback = Box<dyn Fn(i32) -> i32 + Send + Sync>;

    let registry = Registry::new();
    let add_ten: Callback = Box::new(|x| x + 10);
    registry.set_value("cb", add_ten).unwrap();

    let cb: Arc<Callback> = registry.get_as("cb").unwrap();
    assert_eq!(cb(32), 42);
}

#[test]
fn test_producer_returning_trait_object() {
    trait Service: Send + Sync {
        fn name(&self) -> &str;
    }

    struct Mailer;
    impl Service for Mailer {
        fn name(&self) -> &str {
            "mailer"
        }
    }

    let registry = Registry::new();
    registry
        .set_lazy("svc", || Arc::new(Mailer) as Arc<dyn Service>)
        .unwrap();

    let svc: Arc<Arc<dyn Service>> = registry.get_as("svc").unwrap();
    assert_eq!(svc.name(), "mailer");
}

#[test]
fn test_producers_resolve_in_access_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let registry = Registry::new();

    for key in ["first", "second", "third"] {
        let order = order.clone();
        registry
            .set_lazy(key, move || order.lock().unwrap().push(key))
            .unwrap();
    }

    registry.get("third").unwrap();
    registry.get("first").unwrap();
    registry.get("third").unwrap();

    assert_eq!(*order.lock().unwrap(), vec!["third", "first"]);
    assert_eq!(registry.is_resolved("second"), Some(false));
}
