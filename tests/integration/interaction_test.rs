//! Multi-step interactions across dispatch cycles.

use super::{dispatcher, exec, session};
use parley::commands::{
    builtin_registry, invoker, ArgumentStream, FnInteraction, InMemoryRegistry, Interaction,
    InteractionOutcome, NameMatching, Outcome, Overload, Profile, RawArgs, Response,
    ServiceContext, Terminal, TerminalHandle,
};
use parley::error::ParleyError;
use pretty_assertions::assert_eq;

/// Number guessing game that re-registers itself until the answer is found.
struct Guess {
    secret: i64,
    attempts: u32,
    hint: Option<&'static str>,
}

impl Interaction for Guess {
    fn label(&self) -> &str {
        "guess"
    }

    fn prompt(&self) -> Response {
        match self.hint {
            None => Response::text("Guess a number"),
            Some(hint) => Response::text(format!("Too {hint}. Guess again")),
        }
    }

    fn handle_response(
        self: Box<Self>,
        stream: &mut ArgumentStream,
        _services: &ServiceContext,
    ) -> InteractionOutcome {
        if stream.remaining() != 1 {
            return InteractionOutcome::Declined;
        }
        let Ok(n) = stream.next_parsed::<i64>("integer") else {
            return InteractionOutcome::Declined;
        };

        let attempts = self.attempts + 1;
        if n == self.secret {
            return InteractionOutcome::respond(Response::text(format!(
                "Correct after {attempts} tries"
            )));
        }
        InteractionOutcome::Completed(Outcome::interaction(Guess {
            secret: self.secret,
            attempts,
            hint: Some(if n < self.secret { "low" } else { "high" }),
        }))
    }
}

fn game_registry() -> InMemoryRegistry {
    let mut registry = builtin_registry(NameMatching::Exact, &Profile::new());
    registry.register(
        "play",
        Overload::new(0, |stream, _| {
            stream.expect_end()?;
            Ok(invoker(|| {
                Ok(Outcome::interaction(Guess {
                    secret: 7,
                    attempts: 0,
                    hint: None,
                }))
            }))
        }),
    );
    registry
}

fn text(s: &str) -> Option<Response> {
    Some(Response::text(s))
}

#[test]
fn test_interaction_chains_until_complete() {
    let d = dispatcher(game_registry(), Default::default());
    let mut s = session();

    assert_eq!(exec(&d, &mut s, "play"), text("Guess a number"));
    assert_eq!(exec(&d, &mut s, "3"), text("Too low. Guess again"));
    assert_eq!(s.interactions().len(), 1);
    assert_eq!(exec(&d, &mut s, "9"), text("Too high. Guess again"));
    assert_eq!(exec(&d, &mut s, "7"), text("Correct after 3 tries"));
    assert!(s.interactions().is_empty());

    // Nothing pending any more, and "7" is not a command.
    assert_eq!(exec(&d, &mut s, "7"), None);
}

#[test]
fn test_declined_line_goes_to_commands_and_drops_interaction() {
    let d = dispatcher(game_registry(), Default::default());
    let mut s = session();

    exec(&d, &mut s, "play");
    assert_eq!(exec(&d, &mut s, "whoami"), text("tester on pts/0"));
    assert!(s.interactions().is_empty());
    assert_eq!(exec(&d, &mut s, "7"), None);
}

#[test]
fn test_sessions_do_not_share_interactions() {
    let d = dispatcher(game_registry(), Default::default());
    let mut first = session();
    let mut second = session();

    exec(&d, &mut first, "play");

    assert_eq!(exec(&d, &mut second, "7"), None);
    assert_eq!(exec(&d, &mut first, "7"), text("Correct after 1 tries"));
}

#[test]
fn test_interaction_sees_whole_line() {
    let d = dispatcher(game_registry(), Default::default());
    let mut s = session();

    s.register_interaction(Box::new(FnInteraction::new(
        "capture",
        Response::text("Say something"),
        |stream, services| {
            let raw = services
                .get::<RawArgs>()
                .map(|args| args.0.join(","))
                .unwrap_or_default();
            let first = stream.peek(0).unwrap_or_default().to_string();
            InteractionOutcome::respond(Response::text(format!("{first}|{raw}")))
        },
    )));

    assert_eq!(exec(&d, &mut s, "whoami now"), text("whoami|whoami,now"));
}

#[test]
fn test_own_services_shadow_defaults() {
    let d = dispatcher(game_registry(), Default::default());
    let mut s = session();

    s.register_interaction(Box::new(
        FnInteraction::new("shadow", Response::text("?"), |_, services| {
            let raw = services.get::<RawArgs>().map(|args| args.0.join(","));
            let user = services
                .get::<TerminalHandle>()
                .map(|terminal| terminal.user().to_string());
            InteractionOutcome::respond(Response::text(format!("{raw:?} {user:?}")))
        })
        .with_services(ServiceContext::new().with(RawArgs(vec!["mine".to_string()]))),
    ));

    assert_eq!(
        exec(&d, &mut s, "anything"),
        text(r#"Some("mine") Some("tester")"#)
    );
}

#[test]
fn test_failed_interaction_falls_through() {
    let d = dispatcher(game_registry(), Default::default());
    let mut s = session();

    s.register_interaction(Box::new(FnInteraction::new(
        "broken",
        Response::text("?"),
        |_, _| InteractionOutcome::Failed(ParleyError::interaction("cannot handle input")),
    )));

    assert_eq!(exec(&d, &mut s, "echo still here"), text("still here"));
    assert!(s.interactions().is_empty());
}

#[test]
fn test_only_top_interaction_is_consulted() {
    let d = dispatcher(game_registry(), Default::default());
    let mut s = session();

    s.register_interaction(Box::new(FnInteraction::new(
        "bottom",
        Response::text("bottom?"),
        |_, _| InteractionOutcome::respond(Response::text("bottom handled")),
    )));
    s.register_interaction(Box::new(FnInteraction::new(
        "top",
        Response::text("top?"),
        |_, _| InteractionOutcome::Declined,
    )));

    // The top entry declines; the bottom one waits for the next line.
    assert_eq!(exec(&d, &mut s, "echo a"), text("a"));
    assert_eq!(s.interactions().peek_label(), Some("bottom"));
    assert_eq!(exec(&d, &mut s, "anything"), text("bottom handled"));
    assert!(s.interactions().is_empty());
}

#[test]
fn test_register_returns_prompt() {
    let mut s = session();
    let prompt = s.register_interaction(Box::new(Guess {
        secret: 1,
        attempts: 0,
        hint: Some("low"),
    }));
    assert_eq!(prompt, Response::text("Too low. Guess again"));
    assert_eq!(s.interactions().peek_label(), Some("guess"));
}
