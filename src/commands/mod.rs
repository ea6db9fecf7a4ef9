//! Command parsing and dispatch for Parley.
//!
//! Raw lines are tokenized, offered to a pending interaction if the session
//! has one, and otherwise resolved against the overloads registered under the
//! first token. Everything a handler returns is normalized into a
//! [`Response`].

pub mod builtins;
pub mod comparer;
pub mod dispatcher;
pub mod interaction;
pub mod outcome;
pub mod output;
pub mod overload;
pub mod registry;
pub mod services;
pub mod session;
pub mod stream;
pub mod tokenizer;

pub use builtins::{builtin_registry, Profile};
pub use comparer::{compare_overloads, sort_candidates, Candidate};
pub use dispatcher::{DispatchSettings, Dispatcher, FaultPolicy};
pub use interaction::{FnInteraction, Interaction, InteractionOutcome, InteractionStack};
pub use outcome::{convert, Outcome};
pub use output::{ControlAction, Response};
pub use overload::{invoker, BindResult, CommandOverload, Invoker, Overload};
pub use registry::{CommandInfo, CommandRegistry, InMemoryRegistry, NameMatching};
pub use services::{CommandName, RawArgs, ServiceContext};
pub use session::{ConsoleTerminal, Session, Terminal, TerminalHandle};
pub use stream::{ArgumentStream, BindError};
pub use tokenizer::tokenize;
