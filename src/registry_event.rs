/// Events emitted by the registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use lazy_registry::RegistryEvent;
///
/// let event = RegistryEvent::Set { key: "db".to_string(), lazy: true };
/// assert_eq!(event.to_string(), "set { key: db, lazy: true }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A new entry was stored.
    Set {
        /// The key of the new entry
        key: String,
        /// Whether the entry holds a producer that still has to be resolved
        lazy: bool,
    },

    /// A value was requested from the registry.
    Get {
        key: String,
        /// Whether a value was returned
        found: bool,
    },

    /// A producer was invoked to resolve an entry.
    Resolve {
        key: String,
        /// Whether the producer succeeded and the entry is now resolved
        ok: bool,
    },

    /// A key existence check was performed.
    Contains { key: String, found: bool },

    /// An entry removal was requested.
    Remove {
        key: String,
        /// Whether an entry actually existed
        found: bool,
    },

    /// The registry was cleared.
    Clear {},
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Set { key, lazy } => write!(f, "set {{ key: {key}, lazy: {lazy} }}"),
            RegistryEvent::Get { key, found } => {
                write!(f, "get {{ key: {key}, found: {found} }}")
            }
            RegistryEvent::Resolve { key, ok } => write!(f, "resolve {{ key: {key}, ok: {ok} }}"),
            RegistryEvent::Contains { key, found } => {
                write!(f, "contains {{ key: {key}, found: {found} }}")
            }
            RegistryEvent::Remove { key, found } => {
                write!(f, "remove {{ key: {key}, found: {found} }}")
            }
            RegistryEvent::Clear {} => write!(f, "Clearing the Registry"),
        }
    }
}
