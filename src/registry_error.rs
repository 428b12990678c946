use crate::producer::ProducerError;

/// Errors reported by registry operations.
///
/// Key errors carry the offending key so callers can tell which lookup failed.
/// Producer failures are passed through as-is.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// `get` on a key that was never set or has been removed.
    #[error("Registry - No such key {key}")]
    UnknownKey { key: String },

    /// `set` on a key that already has an entry. Entries are write-once.
    #[error("Registry - Cannot override key {key}: key is already set.")]
    DuplicateKey { key: String },

    /// Typed access asked for a type the stored value does not have.
    #[error("Registry - Key {key} does not hold a value of type {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    /// The producer bound to the key failed during lazy resolution.
    #[error(transparent)]
    Producer(ProducerError),
}

impl RegistryError {
    /// The key the error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            RegistryError::UnknownKey { key }
            | RegistryError::DuplicateKey { key }
            | RegistryError::TypeMismatch { key, .. } => Some(key),
            RegistryError::Producer(_) => None,
        }
    }

    /// Consumes the error and returns the producer's own error, if that is what this is.
    pub fn into_producer_error(self) -> Option<ProducerError> {
        match self {
            RegistryError::Producer(err) => Some(err),
            _ => None,
        }
    }
}
