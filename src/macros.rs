//! Macros for creating global registries.

/// Creates an isolated, program-wide registry with a single macro invocation.
///
/// The macro generates a module containing:
/// - A `LazyLock<Registry>` static named after the module (hidden)
/// - An `Api` struct that implements `RegistryApi`, and an `API` constant
/// - Free functions mirroring the registry operations
///
/// # Examples
///
/// ```rust
/// use lazy_registry::{define_registry, Producer};
/// use std::sync::Arc;
///
/// define_registry!(services);
///
/// services::set_value("greeting", "Hello".to_string()).unwrap();
/// services::set("answer", Producer::function(|| 42i32)).unwrap();
///
/// let msg: Arc<String> = services::get_as("greeting").unwrap();
/// let num: Arc<i32> = services::get_as("answer").unwrap();
///
/// assert_eq!(&**msg, "Hello");
/// assert_eq!(*num, 42);
/// ```
///
/// # Multiple Registries
///
/// ```rust
/// use lazy_registry::define_registry;
///
/// define_registry!(database);
/// define_registry!(cache);
///
/// database::set_value("url", "postgres://localhost".to_string()).unwrap();
///
/// assert!(database::contains("url"));
/// assert!(!cache::contains("url"));
/// ```
///
/// # Trait-Based Usage
///
/// ```rust
/// use lazy_registry::{define_registry, RegistryApi};
///
/// define_registry!(app);
///
/// app::API.set_value("port", 8080u16).unwrap();
/// assert_eq!(app::API.get_cloned::<u16>("port").unwrap(), 8080);
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        pub mod $name {
            #![allow(dead_code)]

            use std::sync::{Arc, LazyLock};

            static REGISTRY: LazyLock<$crate::Registry> =
                LazyLock::new(|| $crate::Registry::named(stringify!($name)));

            /// Zero-sized handle implementing the registry API.
            #[derive(Debug, Clone, Copy)]
            pub struct Api;

            impl $crate::RegistryApi for Api {
                fn registry() -> &'static $crate::Registry {
                    &REGISTRY
                }
            }

            /// Convenient constant for trait-based access.
            pub const API: Api = Api;

            /// The underlying registry.
            pub fn registry() -> &'static $crate::Registry {
                &REGISTRY
            }

            /// Check if `key` has an entry.
            pub fn contains(key: &str) -> bool {
                REGISTRY.contains(key)
            }

            /// Store a literal or a producer under `key`.
            pub fn set(
                key: impl Into<String>,
                binding: impl Into<$crate::Binding>,
            ) -> Result<&'static $crate::Registry, $crate::RegistryError> {
                REGISTRY.set(key, binding)
            }

            /// Store a literal value under `key`.
            pub fn set_value<T: Send + Sync + 'static>(
                key: impl Into<String>,
                value: T,
            ) -> Result<&'static $crate::Registry, $crate::RegistryError> {
                REGISTRY.set_value(key, value)
            }

            /// Store a closure under `key`, resolved on first `get`.
            pub fn set_lazy<T, F>(
                key: impl Into<String>,
                f: F,
            ) -> Result<&'static $crate::Registry, $crate::RegistryError>
            where
                T: Send + Sync + 'static,
                F: Fn() -> T + Send + Sync + 'static,
            {
                REGISTRY.set_lazy(key, f)
            }

            /// Retrieve the value under `key`.
            pub fn get(key: &str) -> Result<$crate::Value, $crate::RegistryError> {
                REGISTRY.get(key)
            }

            /// Retrieve the value under `key` as `Arc<T>`.
            pub fn get_as<T: Send + Sync + 'static>(
                key: &str,
            ) -> Result<Arc<T>, $crate::RegistryError> {
                REGISTRY.get_as(key)
            }

            /// Retrieve an owned clone of the value under `key`.
            pub fn get_cloned<T: Send + Sync + Clone + 'static>(
                key: &str,
            ) -> Result<T, $crate::RegistryError> {
                REGISTRY.get_cloned(key)
            }

            /// Delete the entry for `key`.
            pub fn remove(key: &str) -> &'static $crate::Registry {
                REGISTRY.remove(key)
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static,
            ) {
                REGISTRY.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                REGISTRY.clear_trace_callback()
            }

            #[doc(hidden)]
            pub fn clear() {
                REGISTRY.clear()
            }
        }
    };
}
