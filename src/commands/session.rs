//! Host-side session state.
//!
//! A [`Session`] pairs the host's terminal handle with the interaction stack
//! for that terminal. Each session owns its own stack, so two sessions never
//! see each other's pending interactions.

use std::fmt;
use std::sync::Arc;

use super::interaction::{Interaction, InteractionStack};
use super::output::Response;

/// The host environment a command runs against.
pub trait Terminal: Send + Sync + fmt::Debug {
    /// Identifier for the terminal (tty name, connection id, ...).
    fn id(&self) -> &str;

    /// The user attached to the terminal.
    fn user(&self) -> &str;
}

/// Shared handle to the host terminal, registered as a service each cycle.
pub type TerminalHandle = Arc<dyn Terminal>;

/// A plain line-oriented console terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleTerminal {
    id: String,
    user: String,
}

impl ConsoleTerminal {
    /// Creates a new console terminal.
    pub fn new(id: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user: user.into(),
        }
    }

    /// Creates a console terminal already wrapped in a handle.
    pub fn handle(id: impl Into<String>, user: impl Into<String>) -> TerminalHandle {
        Arc::new(Self::new(id, user))
    }
}

impl Terminal for ConsoleTerminal {
    fn id(&self) -> &str {
        &self.id
    }

    fn user(&self) -> &str {
        &self.user
    }
}

/// Per-terminal dispatch state threaded through every dispatch cycle.
#[derive(Debug)]
pub struct Session {
    terminal: TerminalHandle,
    interactions: InteractionStack,
}

impl Session {
    /// Creates a session with an empty interaction stack.
    pub fn new(terminal: TerminalHandle) -> Self {
        Self {
            terminal,
            interactions: InteractionStack::new(),
        }
    }

    /// The terminal this session is attached to.
    pub fn terminal(&self) -> &TerminalHandle {
        &self.terminal
    }

    /// Pending interactions for this session.
    pub fn interactions(&self) -> &InteractionStack {
        &self.interactions
    }

    /// Mutable access to the pending interactions.
    pub fn interactions_mut(&mut self) -> &mut InteractionStack {
        &mut self.interactions
    }

    /// Registers an interaction to receive the next input line.
    ///
    /// Returns the interaction's prompt.
    pub fn register_interaction(&mut self, interaction: Box<dyn Interaction>) -> Response {
        self.interactions.register(interaction)
    }
}
