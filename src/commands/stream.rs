//! Cursor over command arguments.
//!
//! The dispatcher hands one [`ArgumentStream`] per dispatch cycle to every
//! candidate overload in turn. The stream is **not** rewound between
//! candidates: a binder that consumes two tokens and then fails leaves the
//! cursor two tokens further on, and the next candidate only sees what is
//! left. Binders that want a fair attempt for their siblings should `peek`
//! before they `next`.

use std::str::FromStr;

use thiserror::Error;

/// Why a binder could not produce an invoker.
///
/// Every variant except [`BindError::Fault`] means "this overload does not
/// match" and the dispatcher silently moves on to the next candidate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The binder asked for more tokens than remain.
    #[error("argument stream exhausted")]
    Exhausted,

    /// A token did not have the expected shape.
    #[error("expected {expected}, found '{found}'")]
    Mismatch {
        /// What the binder was looking for.
        expected: &'static str,
        /// The token that was consumed.
        found: String,
    },

    /// Tokens remained after the overload's shape was satisfied.
    #[error("{0} unexpected trailing argument(s)")]
    Trailing(usize),

    /// The binder requested a service the context does not provide.
    #[error("service '{0}' is not available")]
    MissingService(&'static str),

    /// The binder hit an unexpected failure. Subject to the dispatcher's fault
    /// policy instead of being treated as a no-match.
    #[error("{0}")]
    Fault(String),
}

impl BindError {
    /// Creates a mismatch error for a consumed token.
    pub fn mismatch(expected: &'static str, found: impl Into<String>) -> Self {
        Self::Mismatch {
            expected,
            found: found.into(),
        }
    }

    /// Creates a fault that the dispatcher's fault policy will handle.
    pub fn fault(msg: impl Into<String>) -> Self {
        Self::Fault(msg.into())
    }

    /// Returns true if this is an ordinary no-match rather than a fault.
    pub fn is_no_match(&self) -> bool {
        !matches!(self, Self::Fault(_))
    }
}

/// An ordered sequence of tokens with a read cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentStream {
    tokens: Vec<String>,
    cursor: usize,
}

impl ArgumentStream {
    /// Creates a stream positioned at the first token.
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Number of tokens not yet consumed.
    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.cursor
    }

    /// Returns true if every token has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Looks at the token `offset` places past the cursor without consuming it.
    pub fn peek(&self, offset: usize) -> Option<&str> {
        self.tokens.get(self.cursor + offset).map(String::as_str)
    }

    /// Consumes the next token.
    pub fn next(&mut self) -> Result<&str, BindError> {
        let token = self
            .tokens
            .get(self.cursor)
            .map(String::as_str)
            .ok_or(BindError::Exhausted)?;
        self.cursor += 1;
        Ok(token)
    }

    /// Consumes the next token and parses it.
    ///
    /// The token is consumed even when parsing fails.
    pub fn next_parsed<T: FromStr>(&mut self, expected: &'static str) -> Result<T, BindError> {
        let token = self.next()?;
        token
            .parse()
            .map_err(|_| BindError::mismatch(expected, token))
    }

    /// Consumes every remaining token.
    pub fn rest(&mut self) -> Vec<String> {
        let rest = self.tokens[self.cursor..].to_vec();
        self.cursor = self.tokens.len();
        rest
    }

    /// Fails with [`BindError::Trailing`] if any tokens remain.
    pub fn expect_end(&self) -> Result<(), BindError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(BindError::Trailing(n)),
        }
    }

    /// The full original token sequence, regardless of the cursor.
    pub fn all(&self) -> &[String] {
        &self.tokens
    }
}
