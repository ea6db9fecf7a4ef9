//! Handler results and their conversion into display responses.

use std::fmt;

use super::interaction::{Interaction, InteractionStack};
use super::output::Response;

/// What a command action or interaction handler produced.
pub enum Outcome {
    /// A ready-made display response.
    Display(Response),
    /// A follow-up interaction that should receive the next input line.
    Interaction(Box<dyn Interaction>),
    /// Any other value; shown through its `Display` form.
    Raw(Box<dyn fmt::Display>),
    /// Nothing to show. The handler declined.
    Empty,
}

impl Outcome {
    /// Wraps an arbitrary displayable value.
    pub fn raw(value: impl fmt::Display + 'static) -> Self {
        Self::Raw(Box::new(value))
    }

    /// Wraps an interaction.
    pub fn interaction(interaction: impl Interaction + 'static) -> Self {
        Self::Interaction(Box::new(interaction))
    }

    /// Returns true for [`Outcome::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<Response> for Outcome {
    fn from(response: Response) -> Self {
        Self::Display(response)
    }
}

impl<T: Into<Outcome>> From<Option<T>> for Outcome {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Display(response) => f.debug_tuple("Display").field(response).finish(),
            Self::Interaction(interaction) => {
                f.debug_tuple("Interaction").field(&interaction.label()).finish()
            }
            Self::Raw(value) => f.debug_tuple("Raw").field(&value.to_string()).finish(),
            Self::Empty => f.write_str("Empty"),
        }
    }
}

/// Normalizes a handler result into the response shown for this cycle.
///
/// An interaction is registered on `stack` for the next cycle and its prompt
/// becomes this cycle's response. Returns `None` for [`Outcome::Empty`].
pub fn convert(outcome: Outcome, stack: &mut InteractionStack) -> Option<Response> {
    match outcome {
        Outcome::Display(response) => Some(response),
        Outcome::Interaction(interaction) => Some(stack.register(interaction)),
        Outcome::Raw(value) => Some(Response::Text(value.to_string())),
        Outcome::Empty => None,
    }
}
