//! Built-in commands (help, echo, add, whoami, rename, forget, quit).

use std::sync::{Arc, Mutex, PoisonError};

use super::interaction::{FnInteraction, InteractionOutcome};
use super::outcome::Outcome;
use super::output::Response;
use super::overload::{invoker, Overload};
use super::registry::{InMemoryRegistry, NameMatching};
use super::services::ServiceContext;
use super::session::{Terminal, TerminalHandle};
use super::stream::{ArgumentStream, BindError};
use crate::error::ParleyError;

/// Nickname shared between `whoami`, `rename` and `forget`.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    nickname: Arc<Mutex<Option<String>>>,
}

impl Profile {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current nickname, if one is set.
    pub fn nickname(&self) -> Option<String> {
        self.nickname
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the nickname.
    pub fn set_nickname(&self, nickname: Option<String>) {
        *self.nickname.lock().unwrap_or_else(PoisonError::into_inner) = nickname;
    }
}

/// Builds a registry holding every built-in command.
pub fn builtin_registry(matching: NameMatching, profile: &Profile) -> InMemoryRegistry {
    let mut registry = InMemoryRegistry::with_matching(matching);
    register_builtins(&mut registry, profile);
    registry
}

/// Registers the built-in commands. `help` is registered last so its listing
/// covers everything registered before it.
pub fn register_builtins(registry: &mut InMemoryRegistry, profile: &Profile) {
    registry
        .register("echo", echo())
        .register("add", add(2).with_usage("add <a> <b>"))
        .register("add", add(3).with_usage("add <a> <b> <c>"))
        .register("whoami", whoami(profile.clone()))
        .register("rename", rename_now(profile.clone()))
        .register("rename", rename_prompt(profile.clone()))
        .register("forget", forget(profile.clone()))
        .register("quit", quit())
        .register_alias("exit", "quit");
    register_help(registry);
}

/// Registers `help` with a listing of what is registered right now.
pub fn register_help(registry: &mut InMemoryRegistry) {
    let mut rows: Vec<Vec<String>> = registry
        .catalog()
        .into_iter()
        .map(|info| {
            let mut name = info.name;
            if !info.aliases.is_empty() {
                name = format!("{name} ({})", info.aliases.join(", "));
            }
            vec![name, info.usages.join(" | ")]
        })
        .collect();
    rows.push(vec!["help".to_string(), "help".to_string()]);
    let case_insensitive = registry.matching() == NameMatching::CaseInsensitive;

    registry.register(
        "help",
        Overload::new(0, move |stream, _| {
            stream.expect_end()?;
            let rows = rows.clone();
            Ok(invoker(move || {
                let table = Response::table(
                    vec!["Command".to_string(), "Usage".to_string()],
                    rows,
                );
                if !case_insensitive {
                    return Ok(Outcome::Display(table));
                }
                Ok(Outcome::Display(Response::multiple(vec![
                    table,
                    Response::text("Command names are not case-sensitive."),
                ])))
            }))
        })
        .with_usage("help"),
    );
}

fn echo() -> Overload {
    Overload::new(0, |stream, _| {
        let words = stream.rest();
        Ok(invoker(move || Ok(Outcome::Display(Response::text(words.join(" "))))))
    })
    .with_usage("echo <words...>")
}

/// Parses exactly `count` integers. Checks shape with `peek` first so that a
/// sibling overload still sees an untouched stream when this one declines.
fn integers(stream: &mut ArgumentStream, count: usize) -> Result<Vec<i64>, BindError> {
    if stream.remaining() < count {
        return Err(BindError::Exhausted);
    }
    if stream.remaining() > count {
        return Err(BindError::Trailing(stream.remaining() - count));
    }
    for offset in 0..count {
        let token = stream.peek(offset).unwrap_or_default();
        if token.parse::<i64>().is_err() {
            return Err(BindError::mismatch("integer", token));
        }
    }
    (0..count)
        .map(|_| stream.next_parsed::<i64>("integer"))
        .collect()
}

fn add(count: usize) -> Overload {
    Overload::new(count, move |stream, _| {
        let numbers = integers(stream, count)?;
        Ok(invoker(move || {
            numbers
                .iter()
                .try_fold(0i64, |acc, n| acc.checked_add(*n))
                .map(Outcome::raw)
                .ok_or_else(|| ParleyError::command("add: integer overflow"))
        }))
    })
}

fn whoami(profile: Profile) -> Overload {
    Overload::new(0, move |stream, services| {
        stream.expect_end()?;
        let terminal = services.require::<TerminalHandle>()?.clone();
        let nickname = profile.nickname();
        Ok(invoker(move || {
            let name = nickname.unwrap_or_else(|| terminal.user().to_string());
            Ok(Outcome::raw(format!("{name} on {}", terminal.id())))
        }))
    })
    .with_usage("whoami")
}

fn rename_now(profile: Profile) -> Overload {
    Overload::new(1, move |stream, _| {
        if stream.remaining() > 1 {
            return Err(BindError::Trailing(stream.remaining() - 1));
        }
        let name = stream.next()?.to_string();
        let profile = profile.clone();
        Ok(invoker(move || {
            let reply = format!("You are now {name}.");
            profile.set_nickname(Some(name));
            Ok(Outcome::raw(reply))
        }))
    })
    .with_usage("rename <name>")
}

fn rename_prompt(profile: Profile) -> Overload {
    Overload::new(0, move |stream, _| {
        stream.expect_end()?;
        let profile = profile.clone();
        Ok(invoker(move || {
            Ok(Outcome::interaction(
                FnInteraction::new(
                    "rename",
                    Response::text("What should I call you?"),
                    |stream, services| {
                        let Some(profile) = services.get::<Profile>() else {
                            return InteractionOutcome::Failed(ParleyError::internal(
                                "rename: profile service missing",
                            ));
                        };
                        if stream.remaining() != 1 {
                            return InteractionOutcome::Failed(ParleyError::interaction(
                                "rename: a name is a single word",
                            ));
                        }
                        match stream.next() {
                            Ok(name) => {
                                let reply = format!("You are now {name}.");
                                profile.set_nickname(Some(name.to_string()));
                                InteractionOutcome::Completed(Outcome::raw(reply))
                            }
                            Err(err) => InteractionOutcome::Failed(ParleyError::interaction(
                                format!("rename: {err}"),
                            )),
                        }
                    },
                )
                .with_services(ServiceContext::new().with(profile)),
            ))
        }))
    })
    .with_usage("rename")
}

fn forget(profile: Profile) -> Overload {
    Overload::new(0, move |stream, _| {
        stream.expect_end()?;
        let profile = profile.clone();
        Ok(invoker(move || {
            if profile.nickname().is_none() {
                return Ok(Outcome::raw("No nickname to forget."));
            }
            Ok(Outcome::interaction(FnInteraction::new(
                "forget",
                Response::text("Forget your nickname? (yes/no)"),
                move |stream, _| {
                    match stream.peek(0).map(str::to_lowercase).as_deref() {
                        Some("yes" | "y") => {
                            profile.set_nickname(None);
                            InteractionOutcome::respond(Response::text("Nickname forgotten."))
                        }
                        Some("no" | "n") => {
                            InteractionOutcome::respond(Response::text("Nickname kept."))
                        }
                        _ => InteractionOutcome::Declined,
                    }
                },
            )))
        }))
    })
    .with_usage("forget")
}

fn quit() -> Overload {
    Overload::new(0, |_, _| Ok(invoker(|| Ok(Outcome::Display(Response::exit())))))
        .with_usage("quit")
}
