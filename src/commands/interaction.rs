//! Multi-step interactions.
//!
//! A command can answer with an [`Interaction`] instead of a final response.
//! The interaction's prompt is shown right away and the interaction is pushed
//! onto the session's [`InteractionStack`]. On the next input line the
//! dispatcher pops the top entry and offers it the whole line before any
//! command lookup happens.
//!
//! Popping is final: an interaction that declines or fails is gone. Older
//! entries further down the stack stay where they are and are only reached
//! once everything above them has been popped.

use std::fmt;

use super::outcome::Outcome;
use super::output::Response;
use super::services::ServiceContext;
use super::stream::ArgumentStream;
use crate::error::ParleyError;

/// Result of offering an input line to an interaction.
#[derive(Debug)]
pub enum InteractionOutcome {
    /// The interaction did not want this line; normal command resolution runs.
    Declined,
    /// The interaction handled the line.
    Completed(Outcome),
    /// The interaction failed. Logged and treated like [`Self::Declined`].
    Failed(ParleyError),
}

impl InteractionOutcome {
    /// Shorthand for completing with a display response.
    pub fn respond(response: Response) -> Self {
        Self::Completed(Outcome::Display(response))
    }
}

/// A suspended continuation that consumes the next input line.
pub trait Interaction {
    /// Short label used in log output.
    fn label(&self) -> &str {
        "interaction"
    }

    /// Services this interaction brings along. The cycle defaults are merged
    /// underneath, so these win on conflict.
    fn services(&self) -> ServiceContext {
        ServiceContext::new()
    }

    /// Shown when the interaction is registered.
    fn prompt(&self) -> Response;

    /// Handles the next input line. `stream` covers the whole line, including
    /// what would otherwise be the command name.
    ///
    /// Report failures as [`InteractionOutcome::Failed`]. Handlers must not
    /// panic: panics are not caught and unwind through the dispatcher.
    fn handle_response(
        self: Box<Self>,
        stream: &mut ArgumentStream,
        services: &ServiceContext,
    ) -> InteractionOutcome;
}

/// An interaction built from a prompt and a closure.
pub struct FnInteraction<F> {
    label: String,
    prompt: Response,
    services: ServiceContext,
    handler: F,
}

impl<F> FnInteraction<F>
where
    F: FnOnce(&mut ArgumentStream, &ServiceContext) -> InteractionOutcome,
{
    /// Creates an interaction that shows `prompt` and runs `handler` on the next line.
    pub fn new(label: impl Into<String>, prompt: Response, handler: F) -> Self {
        Self {
            label: label.into(),
            prompt,
            services: ServiceContext::new(),
            handler,
        }
    }

    /// Attaches interaction-owned services.
    pub fn with_services(mut self, services: ServiceContext) -> Self {
        self.services = services;
        self
    }
}

impl<F> Interaction for FnInteraction<F>
where
    F: FnOnce(&mut ArgumentStream, &ServiceContext) -> InteractionOutcome,
{
    fn label(&self) -> &str {
        &self.label
    }

    fn services(&self) -> ServiceContext {
        self.services.clone()
    }

    fn prompt(&self) -> Response {
        self.prompt.clone()
    }

    fn handle_response(
        self: Box<Self>,
        stream: &mut ArgumentStream,
        services: &ServiceContext,
    ) -> InteractionOutcome {
        let this = *self;
        (this.handler)(stream, services)
    }
}

/// Last-in-first-out stack of pending interactions for one session.
#[derive(Default)]
pub struct InteractionStack {
    pending: Vec<Box<dyn Interaction>>,
}

impl InteractionStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes an interaction without looking at its prompt.
    pub fn push(&mut self, interaction: Box<dyn Interaction>) {
        tracing::debug!(
            label = interaction.label(),
            depth = self.pending.len() + 1,
            "Interaction registered"
        );
        self.pending.push(interaction);
    }

    /// Pushes an interaction and returns its prompt.
    pub fn register(&mut self, interaction: Box<dyn Interaction>) -> Response {
        let prompt = interaction.prompt();
        self.push(interaction);
        prompt
    }

    /// Removes and returns the most recently registered interaction.
    pub fn pop(&mut self) -> Option<Box<dyn Interaction>> {
        self.pending.pop()
    }

    /// Label of the interaction that will see the next line.
    pub fn peek_label(&self) -> Option<&str> {
        self.pending.last().map(|i| i.label())
    }

    /// Number of pending interactions.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops every pending interaction.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl fmt::Debug for InteractionStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.pending.iter().map(|i| i.label()).collect();
        f.debug_struct("InteractionStack")
            .field("pending", &labels)
            .finish()
    }
}
