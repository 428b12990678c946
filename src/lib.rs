//! # Lazy Registry
//!
//! A write-once key-value registry whose entries are either plain values or producers
//! resolved on first access and cached afterwards.
//!
//! Entries are stored under string keys and can be set exactly once; replacing one takes an
//! explicit `remove` first. Producers run at most once per entry on success, even when
//! several threads ask for the same key at the same time.
//!
//! ## Quick Start
//!
//! ```rust
//! use lazy_registry::{Producer, Registry};
//! use std::sync::Arc;
//!
//! let registry = Registry::new();
//! registry
//!     .set_value("name", "Hello, World!".to_string())
//!     .unwrap()
//!     .set("len", Producer::function(|| "Hello, World!".len()))
//!     .unwrap();
//!
//! let message: Arc<String> = registry.get_as("name").unwrap();
//! assert_eq!(&*message, "Hello, World!");
//! assert_eq!(*registry.get_as::<usize>("len").unwrap(), 13);
//! ```
//!
//! ## Features
//!
//! - **Write-once**: `set` on an existing key fails with [`RegistryError::DuplicateKey`]
//! - **Lazy**: functions, associated functions and bound methods run on first `get`
//! - **Thread-safe**: resolution is serialized per key; other keys never wait
//! - **Tracing support**: `tracing` log records plus an optional per-registry callback
//!
//! ## Main Types
//!
//! - [`Registry`] - The registry itself: `contains`, `get`, `set`, `remove`
//! - [`Producer`] - Deferred computations accepted by `set`
//! - [`Binding`] - Literal value or producer
//! - [`RegistryApi`] / [`define_registry!`] - Program-wide registries

mod entry;
mod macros;
mod producer;
mod registry;
mod registry_error;
mod registry_event;
mod registry_trait;

pub use producer::{Binding, Producer, ProducerError, ProducerResult, Value};
pub use registry::{Registry, RegistryBuilder, TraceCallback};
pub use registry_error::RegistryError;
pub use registry_event::RegistryEvent;
pub use registry_trait::RegistryApi;
