//! Core trait exposing a `'static` registry.
//!
//! This module provides the `RegistryApi` trait with default implementations of every
//! registry operation, so a zero-sized handle type only has to say where its registry
//! lives. `define_registry!` generates such a handle.

use std::sync::Arc;

use crate::producer::{Binding, Value};
use crate::{Registry, RegistryError, RegistryEvent};

/// Registry operations over a registry that lives for the whole program.
///
/// Implementors provide [`registry`](RegistryApi::registry); everything else is a default
/// method forwarding to it. Chaining methods return the handle so calls read the same as on
/// a [`Registry`].
pub trait RegistryApi {
    /// Access the registry static.
    fn registry() -> &'static Registry;

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Set a tracing callback for registry operations.
    ///
    /// The callback must NOT call `set_trace_callback`/`clear_trace_callback` on the same
    /// registry. Reading from it, or using other registries, is fine.
    fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        Self::registry().set_trace_callback(callback);
    }

    /// Clear the tracing callback.
    ///
    /// Note: This does not affect stored entries, only the tracing callback.
    fn clear_trace_callback(&self) {
        Self::registry().clear_trace_callback();
    }

    // -------------------------------------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------------------------------------

    /// Check if `key` has an entry.
    fn contains(&self, key: &str) -> bool {
        Self::registry().contains(key)
    }

    /// Store a literal or a producer under `key`.
    ///
    /// # Errors
    ///
    /// - `key` already has an entry
    fn set(
        &self,
        key: impl Into<String>,
        binding: impl Into<Binding>,
    ) -> Result<&Self, RegistryError> {
        Self::registry().set(key, binding)?;
        Ok(self)
    }

    /// Store a literal value under `key`.
    ///
    /// # Errors
    ///
    /// - `key` already has an entry
    fn set_value<T: Send + Sync + 'static>(
        &self,
        key: impl Into<String>,
        value: T,
    ) -> Result<&Self, RegistryError> {
        Self::registry().set_value(key, value)?;
        Ok(self)
    }

    /// Store a closure under `key`, resolved on first `get`.
    ///
    /// # Errors
    ///
    /// - `key` already has an entry
    fn set_lazy<T, F>(&self, key: impl Into<String>, f: F) -> Result<&Self, RegistryError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::registry().set_lazy(key, f)?;
        Ok(self)
    }

    /// Retrieve the value under `key`, resolving it if needed.
    ///
    /// # Errors
    ///
    /// - `key` is not present
    /// - the producer failed
    fn get(&self, key: &str) -> Result<Value, RegistryError> {
        Self::registry().get(key)
    }

    /// Retrieve the value under `key` as `Arc<T>`.
    ///
    /// # Errors
    ///
    /// - `key` is not present
    /// - the producer failed
    /// - the value is not a `T`
    fn get_as<T: Send + Sync + 'static>(&self, key: &str) -> Result<Arc<T>, RegistryError> {
        Self::registry().get_as(key)
    }

    /// Retrieve an owned clone of the value under `key`.
    ///
    /// # Errors
    ///
    /// Same as [`get_as`](RegistryApi::get_as).
    fn get_cloned<T: Send + Sync + Clone + 'static>(&self, key: &str) -> Result<T, RegistryError> {
        Self::registry().get_cloned(key)
    }

    /// Delete the entry for `key`; absent keys are ignored.
    fn remove(&self, key: &str) -> &Self {
        Self::registry().remove(key);
        self
    }

    /// Remove every entry.
    ///
    /// This method is primarily intended for testing. Values already handed out and the
    /// tracing callback are not affected.
    #[doc(hidden)]
    fn clear(&self) {
        Self::registry().clear();
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::RegistryApi;
    use crate::{Producer, Registry, RegistryError};

    use serial_test::serial;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, LazyLock, Mutex};

    static REGISTRY: LazyLock<Registry> = LazyLock::new(|| Registry::named("trait-tests"));

    struct Api;

    impl RegistryApi for Api {
        fn registry() -> &'static Registry {
            &REGISTRY
        }
    }

    const API: Api = Api;

    #[test]
    #[serial]
    fn test_set_and_get_literal() -> Result<(), RegistryError> {
        // Clear any previous state
        API.clear();

        API.set_value("answer", 42i32)?;

        let num: Arc<i32> = API.get_as("answer")?;
        assert_eq!(*num, 42);

        let num_2 = API.get_cloned::<i32>("answer")?;
        assert_eq!(num_2, 42);

        Ok(())
    }

    #[test]
    #[serial]
    fn test_get_nonexistent() {
        API.clear();

        let result = API.get("nope");
        assert!(matches!(result, Err(RegistryError::UnknownKey { ref key }) if key == "nope"));
    }

    #[test]
    #[serial]
    fn test_write_once() {
        API.clear();

        API.set_value("k", 10i32).unwrap();
        assert!(matches!(
            API.set_value("k", 20i32),
            Err(RegistryError::DuplicateKey { .. })
        ));

        let num: Arc<i32> = API.get_as("k").unwrap();
        assert_eq!(*num, 10);
    }

    #[test]
    #[serial]
    fn test_lazy_through_trait() {
        API.clear();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        API.set("lazy", Producer::function(move || calls_clone.fetch_add(1, Ordering::SeqCst)))
            .unwrap()
            .set_lazy("other", || "x")
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let _ = API.get("lazy").unwrap();
        let _ = API.get("lazy").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[serial]
    fn test_remove_chaining() {
        API.clear();

        API.set_value("x", 1).unwrap().set_value("y", 2).unwrap().remove("x");

        assert!(!API.contains("x"));
        assert!(API.contains("y"));
    }

    #[test]
    #[serial]
    fn test_trace_callback() {
        API.clear();
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();

        API.set_trace_callback(move |e| {
            events_clone.lock().unwrap().push(e.to_string());
        });

        API.set_value("a", 5u8).unwrap();
        let _ = API.contains("a");

        API.clear_trace_callback();
        let _ = API.get("a");

        let captured = events.lock().unwrap();
        assert_eq!(
            *captured,
            vec!["set { key: a, lazy: false }", "contains { key: a, found: true }"]
        );
    }

    #[test]
    #[serial]
    fn test_clear_emits_event() {
        API.clear();
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();

        API.set_trace_callback(move |e| {
            events_clone.lock().unwrap().push(e.to_string());
        });

        API.clear();

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0], "Clearing the Registry");

        API.clear_trace_callback();
    }
}
