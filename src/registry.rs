//! A write-once key-value registry with lazily resolved entries.
//!
//! Values are stored under string keys either as literals or as [`Producer`]s. A producer
//! runs on the first `get` of its key and the result is cached for every later call.
//!
//! # Examples
//!
//! ```
//! use lazy_registry::{Binding, Producer, Registry};
//! use std::sync::Arc;
//!
//! let registry = Registry::new();
//! registry
//!     .set("greeting", Binding::value("Hello".to_string()))?
//!     .set("answer", Producer::function(|| 6 * 7))?;
//!
//! let greeting: Arc<String> = registry.get_as("greeting")?;
//! assert_eq!(&*greeting, "Hello");
//! assert_eq!(*registry.get_as::<i32>("answer")?, 42);
//! # Ok::<(), lazy_registry::RegistryError>(())
//! ```

use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use tracing::{debug, trace};

use crate::entry::{RegistryEntry, Resolution};
use crate::producer::{Binding, Producer, Value};
use crate::{RegistryError, RegistryEvent};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `RegistryEvent` every time the registry is
/// interacted with. It must be thread-safe because a registry can be shared across threads.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

const DEFAULT_NAME: &str = "registry";

/// Write-once key-value store with lazy, memoized producers.
///
/// All operations take `&self`; the registry can be shared behind an `Arc` or a static.
/// Resolving one key never blocks operations on other keys.
pub struct Registry {
    name: Cow<'static, str>,
    entries: RwLock<HashMap<String, Arc<RegistryEntry>>>,
    trace: Mutex<Option<Arc<TraceCallback>>>,
}

impl Registry {
    /// Creates an empty, unnamed registry.
    pub fn new() -> Self {
        Self::named(DEFAULT_NAME)
    }

    /// Creates an empty registry whose name shows up in log records.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(HashMap::new()),
            trace: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ---------------------------------------------------------------------------------------------
    // Tracing
    // ---------------------------------------------------------------------------------------------

    /// Sets a tracing callback that will be invoked on every registry interaction.
    ///
    /// Replaces any previous callback. The callback runs after the registry's storage lock
    /// has been released, so it may read from this or any other registry, but it must not
    /// change this registry's callback.
    ///
    /// # Example
    /// ```rust
    /// use lazy_registry::Registry;
    ///
    /// let registry = Registry::new();
    /// registry.set_trace_callback(|event| println!("[registry-trace] {event}"));
    /// ```
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clears the tracing callback (disables registry tracing).
    pub fn clear_trace_callback(&self) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    fn emit_event(&self, event: RegistryEvent) {
        // Clone the callback out so user code never runs under the trace lock.
        let callback = self
            .trace
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(&event);
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Registry
    // ---------------------------------------------------------------------------------------------

    fn lookup(&self, key: &str) -> Option<Arc<RegistryEntry>> {
        self.entries
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .get(key)
            .cloned()
    }

    /// Returns `true` if an entry exists for `key`.
    ///
    /// Never resolves anything; an unresolved producer still counts as present.
    pub fn contains(&self, key: &str) -> bool {
        let found = self
            .entries
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .contains_key(key);

        self.emit_event(RegistryEvent::Contains {
            key: key.to_string(),
            found,
        });

        found
    }

    /// Stores a new entry under `key`.
    ///
    /// Literals are cached immediately. Producers are stored unresolved and run on the
    /// first [`get`](Self::get).
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateKey`] if `key` already exists. Entries are write-once: to
    /// replace one, [`remove`](Self::remove) it first. The existing entry is left untouched.
    pub fn set(
        &self,
        key: impl Into<String>,
        binding: impl Into<Binding>,
    ) -> Result<&Self, RegistryError> {
        let key = key.into();
        let binding = binding.into();
        let lazy = binding.is_lazy();

        {
            let mut entries = self.entries.write().unwrap_or_else(|p| p.into_inner());
            if entries.contains_key(&key) {
                debug!(registry = %self.name, key = %key, "Rejected duplicate key");
                return Err(RegistryError::DuplicateKey { key });
            }
            entries.insert(key.clone(), Arc::new(RegistryEntry::new(binding)));
        }

        debug!(registry = %self.name, key = %key, lazy, "Entry set");
        self.emit_event(RegistryEvent::Set { key, lazy });

        Ok(self)
    }

    /// Stores a literal value. Shorthand for `set(key, Binding::value(value))`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateKey`] if `key` already exists.
    pub fn set_value<T: Send + Sync + 'static>(
        &self,
        key: impl Into<String>,
        value: T,
    ) -> Result<&Self, RegistryError> {
        self.set(key, Binding::value(value))
    }

    /// Stores a lazily evaluated closure. Shorthand for `set(key, Producer::function(f))`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateKey`] if `key` already exists.
    pub fn set_lazy<T, F>(&self, key: impl Into<String>, f: F) -> Result<&Self, RegistryError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.set(key, Producer::function(f))
    }

    /// Returns the value stored under `key`, resolving its producer on first access.
    ///
    /// Concurrent callers asking for the same unresolved key wait for a single producer run
    /// and all receive the same `Arc`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownKey`] if `key` was never set or has been removed
    /// - [`RegistryError::Producer`] carrying the producer's own error; the entry stays
    ///   unresolved and the next `get` runs the producer again
    ///
    /// A producer must not `get` its own key, directly or through other producers that
    /// lead back to it. If `a` reads `b` and `b` reads `a`, the first `get` waits on itself
    /// forever. Reading keys that do not depend back on the caller is fine.
    pub fn get(&self, key: &str) -> Result<Value, RegistryError> {
        let Some(entry) = self.lookup(key) else {
            self.emit_event(RegistryEvent::Get {
                key: key.to_string(),
                found: false,
            });
            return Err(RegistryError::UnknownKey {
                key: key.to_string(),
            });
        };

        let result = match entry.resolve() {
            Ok((value, Resolution::Cached)) => {
                trace!(registry = %self.name, key, "Cache hit");
                Ok(value)
            }
            Ok((value, Resolution::Produced)) => {
                trace!(
                    registry = %self.name,
                    key,
                    producer = %describe(&entry),
                    "Entry resolved"
                );
                self.emit_event(RegistryEvent::Resolve {
                    key: key.to_string(),
                    ok: true,
                });
                Ok(value)
            }
            Err(err) => {
                debug!(
                    registry = %self.name,
                    key,
                    producer = %describe(&entry),
                    error = %err,
                    "Producer failed, entry left unresolved"
                );
                self.emit_event(RegistryEvent::Resolve {
                    key: key.to_string(),
                    ok: false,
                });
                Err(RegistryError::Producer(err))
            }
        };

        self.emit_event(RegistryEvent::Get {
            key: key.to_string(),
            found: result.is_ok(),
        });

        result
    }

    /// Returns the value under `key` downcast to `T`.
    ///
    /// # Errors
    ///
    /// Everything [`get`](Self::get) reports, plus [`RegistryError::TypeMismatch`] if the
    /// value is not a `T`. A mismatch does not affect the entry's cached value.
    pub fn get_as<T: Send + Sync + 'static>(&self, key: &str) -> Result<Arc<T>, RegistryError> {
        let value: Arc<dyn Any + Send + Sync> = self.get(key)?;
        value
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch {
                key: key.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Returns an owned clone of the value under `key`.
    ///
    /// # Errors
    ///
    /// Same as [`get_as`](Self::get_as).
    pub fn get_cloned<T: Send + Sync + Clone + 'static>(
        &self,
        key: &str,
    ) -> Result<T, RegistryError> {
        let arc = self.get_as::<T>(key)?;
        Ok((*arc).clone())
    }

    /// Deletes the entry for `key`. Removing an absent key is a no-op.
    ///
    /// Callers already holding the value keep it; a resolution in progress completes for
    /// its caller.
    pub fn remove(&self, key: &str) -> &Self {
        let found = self
            .entries
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .remove(key)
            .is_some();

        if found {
            debug!(registry = %self.name, key, "Entry removed");
        }
        self.emit_event(RegistryEvent::Remove {
            key: key.to_string(),
            found,
        });

        self
    }

    /// Reports whether the entry for `key` has been resolved; `None` if `key` is absent.
    pub fn is_resolved(&self, key: &str) -> Option<bool> {
        self.lookup(key).map(|entry| entry.is_resolved())
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All keys currently present, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .keys()
            .cloned()
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Removes every entry.
    ///
    /// Mostly useful for tests and for global registries. Values already handed out stay
    /// valid, and the tracing callback is kept.
    pub fn clear(&self) {
        let dropped = {
            let mut entries = self.entries.write().unwrap_or_else(|p| p.into_inner());
            let dropped = entries.len();
            entries.clear();
            dropped
        };

        debug!(registry = %self.name, dropped, "Registry cleared");
        self.emit_event(RegistryEvent::Clear {});
    }
}

fn describe(entry: &RegistryEntry) -> String {
    entry
        .producer()
        .map_or_else(|| "literal".to_string(), Producer::describe)
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("name", &self.name)
            .field("keys", &self.keys())
            .finish_non_exhaustive()
    }
}

// -------------------------------------------------------------------------------------------------
// Builder
// -------------------------------------------------------------------------------------------------

/// Configures a [`Registry`] before it is shared.
///
/// # Examples
///
/// ```
/// use lazy_registry::Registry;
///
/// let registry = Registry::builder()
///     .name("services")
///     .trace_callback(|event| eprintln!("{event}"))
///     .build();
/// assert_eq!(registry.name(), "services");
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    name: Option<Cow<'static, str>>,
    trace: Option<Arc<TraceCallback>>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn trace_callback(
        mut self,
        callback: impl Fn(&RegistryEvent) + Send + Sync + 'static,
    ) -> Self {
        self.trace = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn build(self) -> Registry {
        let registry = Registry::named(self.name.unwrap_or(Cow::Borrowed(DEFAULT_NAME)));
        *registry.trace.lock().unwrap_or_else(|p| p.into_inner()) = self.trace;
        registry
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
