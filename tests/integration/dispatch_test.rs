//! Command resolution through the public API.

use super::{dispatcher, exec, session};
use parley::commands::{
    invoker, ArgumentStream, BindError, BindResult, CommandName, CommandOverload,
    InMemoryRegistry, NameMatching, Outcome, Overload, RawArgs, Response, ServiceContext,
    Terminal, TerminalHandle,
};
use parley::error::ParleyError;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Hand-written overload whose invoker borrows from the overload itself.
struct Greet {
    greeting: String,
    priority: i32,
}

impl CommandOverload for Greet {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn argument_count(&self) -> usize {
        1
    }

    fn usage(&self) -> Option<&str> {
        Some("greet <name>")
    }

    fn bind<'a>(
        &'a self,
        stream: &mut ArgumentStream,
        services: &ServiceContext,
    ) -> BindResult<'a> {
        let name = stream.next()?.to_string();
        stream.expect_end()?;
        let terminal = services.require::<TerminalHandle>()?.clone();
        Ok(invoker(move || {
            Ok(Outcome::raw(format!(
                "{} {name}, from {}",
                self.greeting,
                terminal.user()
            )))
        }))
    }
}

fn text(s: &str) -> Option<Response> {
    Some(Response::text(s))
}

#[test]
fn test_custom_overload_borrows_own_state() {
    let mut registry = InMemoryRegistry::new();
    registry.register(
        "greet",
        Greet {
            greeting: "Hello".to_string(),
            priority: 0,
        },
    );
    let d = dispatcher(registry, Default::default());
    let mut s = session();

    assert_eq!(exec(&d, &mut s, "greet Ada"), text("Hello Ada, from tester"));
    assert_eq!(exec(&d, &mut s, "greet"), None);
    assert_eq!(exec(&d, &mut s, "greet Ada Lovelace"), None);
}

#[test]
fn test_priority_beats_argument_count() {
    let mut registry = InMemoryRegistry::new();
    registry
        .register(
            "pick",
            Overload::new(0, |_, _| Ok(invoker(|| Ok(Outcome::raw("preferred")))))
                .with_priority(10),
        )
        .register(
            "pick",
            Overload::new(2, |stream, _| {
                let all = stream.rest();
                Ok(invoker(move || Ok(Outcome::raw(format!("many: {}", all.len())))))
            }),
        );
    let d = dispatcher(registry, Default::default());
    let mut s = session();

    assert_eq!(exec(&d, &mut s, "pick a b"), text("preferred"));
}

#[test]
fn test_greedy_overload_starves_later_siblings() {
    let mut registry = InMemoryRegistry::new();
    registry
        .register(
            "pick",
            Overload::new(2, |stream, _| {
                let all = stream.rest();
                Ok(invoker(move || Ok(Outcome::raw(format!("many: {}", all.len())))))
            }),
        )
        .register(
            "pick",
            Greet {
                greeting: "first".to_string(),
                priority: 10,
            },
        );
    let d = dispatcher(registry, Default::default());
    let mut s = session();

    // The stream is not rewound, so the higher-priority overload sees no
    // arguments left and declines.
    assert_eq!(exec(&d, &mut s, "pick x"), text("many: 1"));
}

#[test]
fn test_argument_count_breaks_priority_ties() {
    let mut registry = InMemoryRegistry::new();
    for count in [0usize, 3, 1] {
        registry.register(
            "rank",
            Overload::new(count, move |_, _| {
                Ok(invoker(move || Ok(Outcome::raw(format!("count {count}")))))
            }),
        );
    }
    let d = dispatcher(registry, Default::default());
    let mut s = session();

    assert_eq!(exec(&d, &mut s, "rank"), text("count 3"));
}

#[test]
fn test_empty_outcome_tries_next_candidate() {
    let mut registry = InMemoryRegistry::new();
    registry
        .register(
            "maybe",
            Overload::new(0, |_, _| Ok(invoker(|| Ok(Outcome::Empty)))).with_priority(5),
        )
        .register(
            "maybe",
            Overload::new(0, |_, _| Ok(invoker(|| Ok(Outcome::raw("fallback"))))),
        );
    let d = dispatcher(registry, Default::default());
    let mut s = session();

    assert_eq!(exec(&d, &mut s, "maybe"), text("fallback"));
}

#[test]
fn test_all_empty_outcomes_yield_nothing() {
    let mut registry = InMemoryRegistry::new();
    registry.register(
        "quiet",
        Overload::new(0, |_, _| Ok(invoker(|| Ok(Outcome::from(None::<Response>))))),
    );
    let d = dispatcher(registry, Default::default());
    let mut s = session();

    assert_eq!(exec(&d, &mut s, "quiet"), None);
    assert_eq!(exec(&d, &mut s, "missing"), None);
}

#[test]
fn test_disallowed_overload_never_binds() {
    let binds = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&binds);

    let mut registry = InMemoryRegistry::new();
    registry
        .register(
            "admin",
            Overload::new(0, move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(invoker(|| Ok(Outcome::raw("secret"))))
            })
            .with_priority(100)
            .allowed_when(|| false),
        )
        .register(
            "admin",
            Overload::new(0, |_, _| Ok(invoker(|| Ok(Outcome::raw("denied"))))),
        );
    let d = dispatcher(registry, Default::default());
    let mut s = session();

    assert_eq!(exec(&d, &mut s, "admin"), text("denied"));
    assert_eq!(binds.load(Ordering::SeqCst), 0);
}

#[test]
fn test_default_services_are_available() {
    let mut registry = InMemoryRegistry::new();
    registry.register(
        "inspect",
        Overload::new(0, |_, services| {
            let name = services.require::<CommandName>()?.0.clone();
            let raw = services.require::<RawArgs>()?.0.join(",");
            let tty = services.require::<TerminalHandle>()?.id().to_string();
            Ok(invoker(move || Ok(Outcome::raw(format!("{name}|{raw}|{tty}")))))
        }),
    );
    let d = dispatcher(registry, Default::default());
    let mut s = session();

    assert_eq!(
        exec(&d, &mut s, r#"inspect a "b c""#),
        text("inspect|a,b c|pts/0")
    );
}

#[test]
fn test_invoker_fault_propagates_by_default() {
    let mut registry = InMemoryRegistry::new();
    registry.register(
        "boom",
        Overload::new(0, |_, _| {
            Ok(invoker(|| Err(ParleyError::command("boom: kaput"))))
        }),
    );
    let d = dispatcher(registry, Default::default());
    let mut s = session();

    let err = d.try_execute("boom", &mut s).unwrap_err();
    assert_eq!(err.category(), "Command Error");
    assert_eq!(err.to_string(), "Command error: boom: kaput");
}

#[test]
fn test_hardened_dispatcher_skips_faulting_candidates() {
    let mut registry = InMemoryRegistry::new();
    registry
        .register(
            "flaky",
            Overload::new(0, |_, _| Err(BindError::fault("bad state"))).with_priority(2),
        )
        .register(
            "flaky",
            Overload::new(0, |_, _| {
                Ok(invoker(|| Err(ParleyError::internal("unreachable state"))))
            })
            .with_priority(1),
        )
        .register(
            "flaky",
            Overload::new(0, |_, _| Ok(invoker(|| Ok(Outcome::raw("recovered"))))),
        );
    let d = dispatcher(registry, parley::commands::FaultPolicy::Harden);
    let mut s = session();

    assert_eq!(exec(&d, &mut s, "flaky"), text("recovered"));
}

#[test]
fn test_binder_fault_names_the_command() {
    let mut registry = InMemoryRegistry::new();
    registry.register(
        "flaky",
        Overload::new(0, |_, _| Err(BindError::fault("bad state"))),
    );
    let d = dispatcher(registry, Default::default());
    let mut s = session();

    let err = d.try_execute("flaky", &mut s).unwrap_err();
    assert_eq!(err.to_string(), "Command error: flaky: bad state");
}

#[test]
fn test_case_insensitive_registry() {
    let mut registry = InMemoryRegistry::with_matching(NameMatching::CaseInsensitive);
    registry.register(
        "Shout",
        Overload::new(0, |stream, _| {
            let words = stream.rest().join(" ").to_uppercase();
            Ok(invoker(move || Ok(Outcome::raw(words))))
        }),
    );
    let d = dispatcher(registry, Default::default());
    let mut s = session();

    assert_eq!(exec(&d, &mut s, "sHoUt hi there"), text("HI THERE"));
}
