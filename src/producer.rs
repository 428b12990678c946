//! Deferred value producers and the bindings accepted by `Registry::set`.
//!
//! A [`Producer`] is a closed set of callable shapes: a plain zero-argument function, an
//! associated ("static") function of a type, or a method bound to a shared receiver. The
//! registry dispatches on the variant when it resolves an entry; nothing is looked up by
//! name at call time.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A type-erased value stored in the registry.
pub type Value = Arc<dyn Any + Send + Sync>;

/// Error type a producer may fail with. Returned to the `get` caller unchanged.
pub type ProducerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Outcome of one producer invocation.
pub type ProducerResult = Result<Value, ProducerError>;

type Thunk = Arc<dyn Fn() -> ProducerResult + Send + Sync>;

/// A deferred computation resolved on the first `get` of its key.
#[derive(Clone)]
pub enum Producer {
    /// A closure or function pointer taking no arguments.
    Function(Thunk),

    /// An associated function of `owner`, called without a receiver.
    StaticMethod {
        /// Type name of the type the function belongs to
        owner: &'static str,
        method: &'static str,
        call: Thunk,
    },

    /// A method called on `receiver`.
    InstanceMethod {
        /// Type name of the receiver
        owner: &'static str,
        method: &'static str,
        receiver: Value,
        call: Thunk,
    },
}

impl Producer {
    /// Wraps an infallible zero-argument function.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_registry::{Producer, Registry};
    ///
    /// let registry = Registry::new();
    /// registry.set("answer", Producer::function(|| 42u32)).unwrap();
    /// assert_eq!(*registry.get_as::<u32>("answer").unwrap(), 42);
    /// ```
    pub fn function<T, F>(f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Producer::Function(Arc::new(move || Ok(Arc::new(f()) as Value)))
    }

    /// Wraps a fallible zero-argument function. An `Err` is handed to the `get` caller and
    /// the entry stays unresolved.
    pub fn try_function<T, E, F>(f: F) -> Self
    where
        T: Send + Sync + 'static,
        E: Into<ProducerError> + 'static,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        Producer::Function(Arc::new(move || {
            f().map(|v| Arc::new(v) as Value).map_err(Into::into)
        }))
    }

    /// Binds an associated function of `O` (no receiver).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_registry::{Producer, Registry};
    ///
    /// struct Config;
    /// impl Config {
    ///     fn default_port() -> u16 {
    ///         8080
    ///     }
    /// }
    ///
    /// let registry = Registry::new();
    /// registry
    ///     .set("port", Producer::static_method::<Config, _>("default_port", Config::default_port))
    ///     .unwrap();
    /// assert_eq!(*registry.get_as::<u16>("port").unwrap(), 8080);
    /// ```
    pub fn static_method<O, T>(method: &'static str, call: fn() -> T) -> Self
    where
        O: ?Sized + 'static,
        T: Send + Sync + 'static,
    {
        Producer::StaticMethod {
            owner: std::any::type_name::<O>(),
            method,
            call: Arc::new(move || Ok(Arc::new(call()) as Value)),
        }
    }

    /// Fallible variant of [`Producer::static_method`].
    pub fn try_static_method<O, T, E>(method: &'static str, call: fn() -> Result<T, E>) -> Self
    where
        O: ?Sized + 'static,
        T: Send + Sync + 'static,
        E: Into<ProducerError> + 'static,
    {
        Producer::StaticMethod {
            owner: std::any::type_name::<O>(),
            method,
            call: Arc::new(move || call().map(|v| Arc::new(v) as Value).map_err(Into::into)),
        }
    }

    /// Binds `call` to `receiver`; resolution invokes `call(&receiver)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_registry::{Producer, Registry};
    /// use std::sync::Arc;
    ///
    /// struct Factory {
    ///     base: u32,
    /// }
    /// impl Factory {
    ///     fn doubled(&self) -> u32 {
    ///         self.base * 2
    ///     }
    /// }
    ///
    /// let registry = Registry::new();
    /// let factory = Arc::new(Factory { base: 42 });
    /// registry.set("d", Producer::method(factory, "doubled", Factory::doubled)).unwrap();
    /// assert_eq!(*registry.get_as::<u32>("d").unwrap(), 84);
    /// ```
    pub fn method<R, T>(receiver: Arc<R>, method: &'static str, call: fn(&R) -> T) -> Self
    where
        R: Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        let target = Arc::clone(&receiver);
        Producer::InstanceMethod {
            owner: std::any::type_name::<R>(),
            method,
            receiver,
            call: Arc::new(move || Ok(Arc::new(call(&target)) as Value)),
        }
    }

    /// Fallible variant of [`Producer::method`].
    pub fn try_method<R, T, E>(
        receiver: Arc<R>,
        method: &'static str,
        call: fn(&R) -> Result<T, E>,
    ) -> Self
    where
        R: Send + Sync + 'static,
        T: Send + Sync + 'static,
        E: Into<ProducerError> + 'static,
    {
        let target = Arc::clone(&receiver);
        Producer::InstanceMethod {
            owner: std::any::type_name::<R>(),
            method,
            receiver,
            call: Arc::new(move || {
                call(&target)
                    .map(|v| Arc::new(v) as Value)
                    .map_err(Into::into)
            }),
        }
    }

    /// Runs the producer once.
    pub(crate) fn invoke(&self) -> ProducerResult {
        match self {
            Producer::Function(call) => call(),
            Producer::StaticMethod { call, .. } => call(),
            Producer::InstanceMethod { call, .. } => call(),
        }
    }

    /// Short, human readable description used in log records.
    pub fn describe(&self) -> String {
        match self {
            Producer::Function(_) => "fn()".to_string(),
            Producer::StaticMethod { owner, method, .. } => format!("{owner}::{method}"),
            Producer::InstanceMethod { owner, method, .. } => format!("<{owner}>.{method}"),
        }
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Producer::Function(_) => f.write_str("Function"),
            Producer::StaticMethod { owner, method, .. } => f
                .debug_struct("StaticMethod")
                .field("owner", owner)
                .field("method", method)
                .finish_non_exhaustive(),
            Producer::InstanceMethod { owner, method, .. } => f
                .debug_struct("InstanceMethod")
                .field("owner", owner)
                .field("method", method)
                .finish_non_exhaustive(),
        }
    }
}

/// What `Registry::set` stores under a key: a literal or a producer.
#[derive(Clone, Debug)]
pub enum Binding {
    /// Stored as-is and resolved immediately.
    Value(Value),
    /// Resolved on the first `get`.
    Producer(Producer),
}

impl Binding {
    /// Wraps a literal value.
    pub fn value<T: Send + Sync + 'static>(value: T) -> Self {
        Binding::Value(Arc::new(value))
    }

    /// Wraps an already shared literal value without re-boxing it.
    pub fn shared<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Binding::Value(value)
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Binding::Producer(_))
    }
}

impl From<Producer> for Binding {
    fn from(producer: Producer) -> Self {
        Binding::Producer(producer)
    }
}
