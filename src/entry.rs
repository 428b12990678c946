//! A single registry record and its one-time resolution.

use std::sync::Mutex;

use crate::producer::{Binding, Producer, ProducerError, Value};

/// The stored record for one key.
#[derive(Debug)]
pub(crate) struct RegistryEntry {
    state: EntryState,
}

/// A literal is born resolved. A lazy entry's `slot` doubles as its resolved flag: `Some`
/// means the producer has run. It only ever goes from `None` to `Some`.
#[derive(Debug)]
enum EntryState {
    Literal(Value),
    Lazy {
        producer: Producer,
        slot: Mutex<Option<Value>>,
    },
}

/// How `resolve` obtained its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// The value was already cached.
    Cached,
    /// The producer ran during this call.
    Produced,
}

impl RegistryEntry {
    pub(crate) fn new(binding: Binding) -> Self {
        let state = match binding {
            Binding::Value(value) => EntryState::Literal(value),
            Binding::Producer(producer) => EntryState::Lazy {
                producer,
                slot: Mutex::new(None),
            },
        };
        Self { state }
    }

    pub(crate) fn producer(&self) -> Option<&Producer> {
        match &self.state {
            EntryState::Literal(_) => None,
            EntryState::Lazy { producer, .. } => Some(producer),
        }
    }

    pub(crate) fn is_resolved(&self) -> bool {
        match &self.state {
            EntryState::Literal(_) => true,
            EntryState::Lazy { slot, .. } => {
                slot.lock().unwrap_or_else(|p| p.into_inner()).is_some()
            }
        }
    }

    /// Returns the cached value, running the producer first if needed.
    ///
    /// The entry lock is held across the producer call so concurrent callers wait for the
    /// first one and then read its result. A failed or panicking producer leaves the slot
    /// empty; the next call runs it again.
    pub(crate) fn resolve(&self) -> Result<(Value, Resolution), ProducerError> {
        let (producer, slot) = match &self.state {
            EntryState::Literal(value) => return Ok((Value::clone(value), Resolution::Cached)),
            EntryState::Lazy { producer, slot } => (producer, slot),
        };

        // A poisoned slot still holds a consistent `Option`: the panicking producer never
        // got to write it.
        let mut slot = slot.lock().unwrap_or_else(|p| p.into_inner());

        if let Some(value) = slot.as_ref() {
            return Ok((Value::clone(value), Resolution::Cached));
        }

        let value = producer.invoke()?;
        *slot = Some(Value::clone(&value));

        Ok((value, Resolution::Produced))
    }
}
