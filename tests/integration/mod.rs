//! Integration tests exercising the public dispatch API.

pub mod dispatch_test;
pub mod interaction_test;

use parley::commands::{
    ConsoleTerminal, DispatchSettings, Dispatcher, FaultPolicy, InMemoryRegistry, Response,
    Session,
};

/// A fresh session on a console terminal.
pub fn session() -> Session {
    Session::new(ConsoleTerminal::handle("pts/0", "tester"))
}

/// Dispatcher over `registry` with the given fault policy.
pub fn dispatcher(registry: InMemoryRegistry, fault_policy: FaultPolicy) -> Dispatcher<InMemoryRegistry> {
    Dispatcher::with_settings(
        registry,
        DispatchSettings {
            fault_policy,
            verbose_errors: true,
        },
    )
}

/// Runs a line and expects no propagated error.
pub fn exec(
    dispatcher: &Dispatcher<InMemoryRegistry>,
    session: &mut Session,
    line: &str,
) -> Option<Response> {
    dispatcher
        .try_execute(line, session)
        .unwrap_or_else(|e| panic!("{line:?} failed: {e}"))
}
