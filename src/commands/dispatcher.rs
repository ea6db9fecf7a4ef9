//! Dispatch cycle orchestration.
//!
//! One call to [`Dispatcher::try_execute`] is one dispatch cycle:
//!
//! 1. Tokenize the line. An empty line produces nothing.
//! 2. If the session has a pending interaction, pop it and offer it the whole
//!    line. A non-empty result ends the cycle. A decline or failure falls
//!    through with the same tokens.
//! 3. Look up the overloads for the first token. Every allowed overload binds
//!    against one shared argument stream; the ones that bind become candidates.
//! 4. Run the candidates in comparer order until one produces a non-empty
//!    response.
//!
//! `Ok(None)` means nothing handled the line and the host should fall back to
//! its own default handling.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::comparer::{sort_candidates, Candidate};
use super::interaction::InteractionOutcome;
use super::outcome::convert;
use super::output::Response;
use super::registry::CommandRegistry;
use super::services::{CommandName, ServiceContext};
use super::session::Session;
use super::stream::{ArgumentStream, BindError};
use super::tokenizer::tokenize;
use crate::error::{ParleyError, Result};

/// What happens when an overload faults while binding or running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultPolicy {
    /// Return the error from `try_execute`.
    #[default]
    Propagate,
    /// Log a warning and move on to the next candidate.
    Harden,
}

impl std::str::FromStr for FaultPolicy {
    type Err = ParleyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "propagate" => Ok(Self::Propagate),
            "harden" => Ok(Self::Harden),
            _ => Err(ParleyError::config(format!(
                "Invalid fault policy: {s}. Expected: propagate or harden"
            ))),
        }
    }
}

/// Tunables for a [`Dispatcher`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Overload fault handling.
    pub fault_policy: FaultPolicy,
    /// Log full error detail for recovered failures.
    pub verbose_errors: bool,
}

/// Resolves input lines against a registry.
pub struct Dispatcher<R> {
    registry: R,
    settings: DispatchSettings,
}

impl<R: CommandRegistry> Dispatcher<R> {
    /// Creates a dispatcher with default settings.
    pub fn new(registry: R) -> Self {
        Self::with_settings(registry, DispatchSettings::default())
    }

    /// Creates a dispatcher with explicit settings.
    pub fn with_settings(registry: R, settings: DispatchSettings) -> Self {
        Self { registry, settings }
    }

    /// The registry commands are resolved against.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// The active settings.
    pub fn settings(&self) -> DispatchSettings {
        self.settings
    }

    /// Runs one dispatch cycle for `line`.
    pub fn try_execute(&self, line: &str, session: &mut Session) -> Result<Option<Response>> {
        let tokens = tokenize(line);
        if tokens.is_empty() {
            return Ok(None);
        }

        if let Some(response) = self.try_interaction(&tokens, session) {
            return Ok(Some(response));
        }

        self.resolve_command(&tokens, session)
    }

    /// Pops and consults at most one pending interaction.
    fn try_interaction(&self, tokens: &[String], session: &mut Session) -> Option<Response> {
        let interaction = session.interactions_mut().pop()?;
        let label = interaction.label().to_string();

        let mut stream = ArgumentStream::new(tokens.to_vec());
        let mut services = interaction.services();
        services.merge_defaults(ServiceContext::defaults(
            session.terminal().clone(),
            tokens.to_vec(),
        ));

        match interaction.handle_response(&mut stream, &services) {
            InteractionOutcome::Completed(outcome) => {
                let response = convert(outcome, session.interactions_mut());
                if response.is_none() {
                    debug!(label = label.as_str(), "Interaction produced no response");
                }
                response
            }
            InteractionOutcome::Declined => {
                debug!(label = label.as_str(), "Interaction declined input");
                None
            }
            InteractionOutcome::Failed(err) => {
                self.report_failure("Interaction", &label, &err);
                None
            }
        }
    }

    /// Resolves the first token as a command name and runs the best candidate.
    fn resolve_command(&self, tokens: &[String], session: &mut Session) -> Result<Option<Response>> {
        let Some((name, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let overloads = self.registry.overloads(name);
        if overloads.is_empty() {
            return Ok(None);
        }

        // Shared by every overload this cycle; see `ArgumentStream`.
        let mut stream = ArgumentStream::new(args.to_vec());
        let services = ServiceContext::defaults(session.terminal().clone(), args.to_vec())
            .with(CommandName(name.clone()));

        let mut candidates = Vec::with_capacity(overloads.len());
        for overload in overloads {
            if !overload.is_allowed() {
                continue;
            }
            match overload.bind(&mut stream, &services) {
                Ok(invoker) => candidates.push(Candidate { overload, invoker }),
                Err(BindError::Fault(msg)) => {
                    self.handle_fault(name, ParleyError::command(format!("{name}: {msg}")))?;
                }
                Err(_) => {}
            }
        }

        sort_candidates(&mut candidates);

        for candidate in candidates {
            debug!(
                command = name.as_str(),
                priority = candidate.overload.priority(),
                argument_count = candidate.overload.argument_count(),
                "Invoking overload"
            );
            match (candidate.invoker)() {
                Ok(outcome) => {
                    if let Some(response) = convert(outcome, session.interactions_mut()) {
                        return Ok(Some(response));
                    }
                }
                Err(err) => self.handle_fault(name, err)?,
            }
        }

        Ok(None)
    }

    fn handle_fault(&self, name: &str, err: ParleyError) -> Result<()> {
        match self.settings.fault_policy {
            FaultPolicy::Propagate => Err(err),
            FaultPolicy::Harden => {
                self.report_failure("Command", name, &err);
                Ok(())
            }
        }
    }

    fn report_failure(&self, kind: &str, label: &str, err: &ParleyError) {
        if self.settings.verbose_errors {
            warn!(label, error = ?err, "{kind} failed: {err}");
        } else {
            warn!(label, "{kind} failed: {err}");
        }
    }
}
