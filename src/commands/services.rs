//! Per-dispatch service container.
//!
//! Binders ask the [`ServiceContext`] for what they need by type. A missing
//! service is a no-match for that overload, not an error.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::session::TerminalHandle;
use super::stream::BindError;

/// The argument tokens handed to this cycle's argument stream.
///
/// For a command this is everything after the command name. For an
/// interaction it is the whole line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArgs(pub Vec<String>);

/// The name a command was invoked under.
///
/// Only present during normal command resolution; interactions have no name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandName(pub String);

#[derive(Clone)]
struct Registration {
    kind: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

/// A mapping from service type to instance, built fresh for each dispatch cycle.
#[derive(Clone, Default)]
pub struct ServiceContext {
    services: HashMap<TypeId, Registration>,
}

impl ServiceContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the default services for a dispatch cycle.
    pub fn defaults(terminal: TerminalHandle, raw_args: Vec<String>) -> Self {
        Self::new().with(terminal).with(RawArgs(raw_args))
    }

    /// Builder-style registration.
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    /// Registers a service, replacing any existing one of the same type.
    ///
    /// Returns true if a previous registration was replaced.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) -> bool {
        self.services
            .insert(
                TypeId::of::<T>(),
                Registration {
                    kind: type_name::<T>(),
                    value: Arc::new(value),
                },
            )
            .is_some()
    }

    /// Looks up a service by type.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|r| r.value.downcast_ref::<T>())
    }

    /// Looks up a service a binder cannot do without.
    pub fn require<T: Any + Send + Sync>(&self) -> Result<&T, BindError> {
        self.get::<T>()
            .ok_or(BindError::MissingService(type_name::<T>()))
    }

    /// Returns true if a service of this type is registered.
    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }

    /// Fills in every default this context does not already provide.
    ///
    /// Existing registrations win on conflict, so an interaction's own
    /// services shadow the cycle defaults.
    pub fn merge_defaults(&mut self, defaults: ServiceContext) {
        for (id, registration) in defaults.services {
            self.services.entry(id).or_insert(registration);
        }
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns true if no services are registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.services.values().map(|r| r.kind).collect();
        kinds.sort_unstable();
        f.debug_struct("ServiceContext")
            .field("services", &kinds)
            .finish()
    }
}
