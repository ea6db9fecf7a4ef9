//! Command overloads.
//!
//! Several overloads can share a command name. Each one declares a priority
//! and an argument count (used to order matching candidates), an allowed
//! predicate, and a binder that turns the argument stream into an invoker.

use std::fmt;

use super::outcome::Outcome;
use super::services::ServiceContext;
use super::stream::{ArgumentStream, BindError};
use crate::error::Result;

/// A bound, ready-to-run command action.
pub type Invoker<'a> = Box<dyn FnOnce() -> Result<Outcome> + 'a>;

/// Outcome of binding an overload's arguments.
pub type BindResult<'a> = std::result::Result<Invoker<'a>, BindError>;

/// Boxes a closure as an [`Invoker`].
pub fn invoker<'a, F>(action: F) -> Invoker<'a>
where
    F: FnOnce() -> Result<Outcome> + 'a,
{
    Box::new(action)
}

/// One registered variant of a command.
pub trait CommandOverload {
    /// Higher priorities are tried first.
    fn priority(&self) -> i32 {
        0
    }

    /// Expected argument count, the tie-break between equal priorities.
    fn argument_count(&self) -> usize;

    /// Environment or permission gate, checked before binding.
    fn is_allowed(&self) -> bool {
        true
    }

    /// Usage line for help output.
    fn usage(&self) -> Option<&str> {
        None
    }

    /// Matches the remaining arguments against this overload's shape.
    ///
    /// The stream is shared with the other overloads of the same command for
    /// this cycle and is not rewound after a failure.
    fn bind<'a>(
        &'a self,
        stream: &mut ArgumentStream,
        services: &ServiceContext,
    ) -> BindResult<'a>;
}

type Binder = Box<dyn Fn(&mut ArgumentStream, &ServiceContext) -> BindResult<'static>>;

type Predicate = Box<dyn Fn() -> bool>;

/// An overload assembled from closures.
pub struct Overload {
    priority: i32,
    argument_count: usize,
    usage: Option<String>,
    allowed: Option<Predicate>,
    binder: Binder,
}

impl Overload {
    /// Creates an overload with priority 0 that is always allowed.
    pub fn new<B>(argument_count: usize, binder: B) -> Self
    where
        B: Fn(&mut ArgumentStream, &ServiceContext) -> BindResult<'static> + 'static,
    {
        Self {
            priority: 0,
            argument_count,
            usage: None,
            allowed: None,
            binder: Box::new(binder),
        }
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the usage line shown in help.
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// Gates the overload behind a predicate.
    pub fn allowed_when<P>(mut self, predicate: P) -> Self
    where
        P: Fn() -> bool + 'static,
    {
        self.allowed = Some(Box::new(predicate));
        self
    }
}

impl CommandOverload for Overload {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn argument_count(&self) -> usize {
        self.argument_count
    }

    fn is_allowed(&self) -> bool {
        self.allowed.as_ref().map_or(true, |allowed| allowed())
    }

    fn usage(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    fn bind<'a>(
        &'a self,
        stream: &mut ArgumentStream,
        services: &ServiceContext,
    ) -> BindResult<'a> {
        (self.binder)(stream, services)
    }
}

impl fmt::Debug for Overload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overload")
            .field("priority", &self.priority)
            .field("argument_count", &self.argument_count)
            .field("usage", &self.usage)
            .field("gated", &self.allowed.is_some())
            .finish()
    }
}
