//! Basic usage example for lazy-registry.
//!
//! Demonstrates:
//! - Storing literal values under string keys
//! - Retrieving values with `get_as()` (returns `Arc<T>`) and `get_cloned()` (returns `T`)
//! - Checking presence with `contains()`
//! - The write-once rule and replacing a value via `remove()`
//!
//! Run with: `cargo run --example basic_usage`

use lazy_registry::define_registry;
use std::sync::Arc;

// Create an isolated registry for this example
define_registry!(app);

#[derive(Debug, Clone, PartialEq)]
struct AppConfig {
    name: String,
    version: u32,
    debug_mode: bool,
}

fn main() {
    println!("=== lazy-registry: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. Store literal values
    // -------------------------------------------------------------------------
    println!("1. Storing literal values...");

    app::set_value("answer", 42i32)
        .and_then(|r| r.set_value("greeting", "Hello, lazy-registry!".to_string()))
        .and_then(|r| {
            r.set_value(
                "config",
                AppConfig {
                    name: "MyApp".to_string(),
                    version: 1,
                    debug_mode: true,
                },
            )
        })
        .expect("fresh keys");

    println!("   Stored: answer, greeting, config");

    // -------------------------------------------------------------------------
    // 2. Check presence with contains()
    // -------------------------------------------------------------------------
    println!("\n2. Checking presence with contains()...");

    for key in ["answer", "greeting", "config", "missing"] {
        println!("   contains({key:?}) = {}", app::contains(key));
    }

    // -------------------------------------------------------------------------
    // 3. Retrieve values
    // -------------------------------------------------------------------------
    println!("\n3. Retrieving values...");

    let answer: Arc<i32> = app::get_as("answer").expect("answer is set");
    let greeting: String = app::get_cloned("greeting").expect("greeting is set");
    let config: AppConfig = app::get_cloned("config").expect("config is set");

    println!("   answer:   {answer}");
    println!("   greeting: {greeting}");
    println!("   config:   {config:?}");

    // -------------------------------------------------------------------------
    // 4. Write-once
    // -------------------------------------------------------------------------
    println!("\n4. Overwriting is refused...");

    if let Err(e) = app::set_value("answer", 7i32) {
        println!("   Error (expected): {e}");
    }

    app::remove("answer")
        .set_value("answer", 7i32)
        .expect("removed key can be set again");
    println!("   After remove + set: answer = {}", app::get_as::<i32>("answer").expect("set"));

    // -------------------------------------------------------------------------
    // 5. Handle missing keys
    // -------------------------------------------------------------------------
    println!("\n5. Handling missing keys...");

    match app::get("missing") {
        Ok(_) => println!("   Unexpectedly found a value"),
        Err(e) => println!("   Error (expected): {e}"),
    }

    println!("\n=== Example Complete ===");
    println!("Keys: {:?}", app::registry().keys());
}
