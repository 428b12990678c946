//! Lazily wired services with lazy-registry.
//!
//! Demonstrates:
//! - Closures, associated functions and bound methods as producers
//! - Producers that read other keys
//! - A failing producer that succeeds on retry
//! - Observing resolution through the trace callback
//!
//! Run with: `cargo run --example lazy_services`

use lazy_registry::{Producer, Registry, RegistryError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct Database {
    url: String,
}

impl Database {
    fn connect() -> Database {
        println!("   (connecting to the database)");
        Database {
            url: "postgres://localhost/app".to_string(),
        }
    }
}

struct Settings {
    workers: usize,
}

impl Settings {
    fn worker_names(&self) -> Vec<String> {
        (0..self.workers).map(|i| format!("worker-{i}")).collect()
    }
}

fn main() -> Result<(), RegistryError> {
    println!("=== lazy-registry: Lazy Services ===\n");

    let registry = Arc::new(Registry::named("services"));
    registry.set_trace_callback(|event| println!("   [trace] {event}"));

    // -------------------------------------------------------------------------
    // 1. Wire producers; nothing runs yet
    // -------------------------------------------------------------------------
    println!("1. Wiring producers...");

    let settings = Arc::new(Settings { workers: 3 });
    let deps = Arc::downgrade(&registry);
    let online = Arc::new(AtomicBool::new(false));
    let online_check = online.clone();

    registry
        .set("db", Producer::static_method::<Database, _>("connect", Database::connect))?
        .set("workers", Producer::method(settings, "worker_names", Settings::worker_names))?
        .set(
            "summary",
            Producer::try_function(move || -> Result<String, RegistryError> {
                let registry = deps.upgrade().ok_or(RegistryError::UnknownKey {
                    key: "db".to_string(),
                })?;
                let db: Arc<Database> = registry.get_as("db")?;
                let workers: Arc<Vec<String>> = registry.get_as("workers")?;
                Ok(format!("{} with {} workers", db.url, workers.len()))
            }),
        )?
        .set(
            "remote",
            Producer::try_function(move || {
                if online_check.load(Ordering::SeqCst) {
                    Ok("remote config loaded")
                } else {
                    Err("remote host unreachable")
                }
            }),
        )?;

    // -------------------------------------------------------------------------
    // 2. First access resolves, including dependencies
    // -------------------------------------------------------------------------
    println!("\n2. Resolving summary...");
    let summary: Arc<String> = registry.get_as("summary")?;
    println!("   summary = {summary}");

    println!("\n3. Second access is cached...");
    let _ = registry.get_as::<String>("summary")?;

    // -------------------------------------------------------------------------
    // 4. Failures are not cached
    // -------------------------------------------------------------------------
    println!("\n4. Failing producer...");
    if let Err(e) = registry.get("remote") {
        println!("   first attempt: {e}");
    }
    online.store(true, Ordering::SeqCst);
    println!("   retry: {}", registry.get_as::<&str>("remote")?);

    registry.clear_trace_callback();
    println!("\n=== Example Complete ===");
    Ok(())
}
