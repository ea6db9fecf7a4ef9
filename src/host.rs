//! Line-oriented host around the dispatcher.
//!
//! The host owns a [`Dispatcher`] and one [`Session`], applies the fall-through
//! handling when nothing claims a line, and drives a read/dispatch/print loop
//! over any buffered reader.

use std::borrow::Cow;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::commands::{tokenize, CommandRegistry, Dispatcher, Response, Session};
use crate::error::{ParleyError, Result};

/// How responses are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable rendering.
    #[default]
    Text,
    /// One JSON object per response.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}. Expected: text or json")),
        }
    }
}

/// Result of a [`Host::run`] loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Lines read from the input.
    pub lines: usize,
    /// Responses written to the output.
    pub responses: usize,
    /// Whether the loop stopped because a command asked to exit.
    pub exited: bool,
    /// Label of the interaction that was still waiting for input.
    pub abandoned: Option<String>,
    /// Wall time spent in the loop.
    #[serde(skip)]
    pub duration: Duration,
}

/// Dispatcher plus the session it runs against.
pub struct Host<R> {
    dispatcher: Dispatcher<R>,
    session: Session,
    format: OutputFormat,
}

impl<R: CommandRegistry> Host<R> {
    /// Creates a host writing text output.
    pub fn new(dispatcher: Dispatcher<R>, session: Session) -> Self {
        Self {
            dispatcher,
            session,
            format: OutputFormat::Text,
        }
    }

    /// Sets the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Handles one input line.
    ///
    /// Blank lines yield `None`. A line nothing claims gets an
    /// "Unknown command" error, and a propagated fault is logged and shown
    /// as an error response.
    pub fn handle_line(&mut self, line: &str) -> Option<Response> {
        match self.dispatcher.try_execute(line, &mut self.session) {
            Ok(Some(response)) => Some(response),
            Ok(None) => {
                let tokens = tokenize(line);
                let name = tokens.first()?;
                debug!(command = name.as_str(), "No handler for input");
                Some(Response::error(format!(
                    "Unknown command: {name}. Type help for available commands."
                )))
            }
            Err(e) => {
                error!("{}: {}", e.category(), e);
                Some(Response::error(e.to_string()))
            }
        }
    }

    /// Reads lines from `input` until EOF or an exit response.
    ///
    /// When `prompt` is set it is written before each line is read. Bytes
    /// that are not valid UTF-8 are replaced rather than ending the loop.
    /// Interactions still pending when the loop ends are dropped.
    pub fn run<B: BufRead, W: Write>(
        &mut self,
        mut input: B,
        output: &mut W,
        prompt: Option<&str>,
    ) -> Result<RunSummary> {
        let start = Instant::now();
        let mut summary = RunSummary {
            lines: 0,
            responses: 0,
            exited: false,
            abandoned: None,
            duration: Duration::ZERO,
        };

        let mut buf = Vec::new();
        loop {
            if let Some(prompt) = prompt {
                write!(output, "{prompt}")?;
                output.flush()?;
            }
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = decode_line(&buf);
            summary.lines += 1;

            if let Some(response) = self.handle_line(&line) {
                self.write_response(output, &response)?;
                summary.responses += 1;
                if response.is_exit() {
                    summary.exited = true;
                    break;
                }
            }
        }

        output.flush()?;
        let interactions = self.session.interactions_mut();
        summary.abandoned = interactions.peek_label().map(str::to_string);
        interactions.clear();
        summary.duration = start.elapsed();
        debug!(
            lines = summary.lines,
            responses = summary.responses,
            exited = summary.exited,
            abandoned = summary.abandoned.as_deref(),
            "Input loop finished"
        );
        Ok(summary)
    }

    fn write_response<W: Write>(&self, output: &mut W, response: &Response) -> Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(output, "{}", response.render())?,
            OutputFormat::Json => {
                let json = serde_json::to_string(response).map_err(|e| {
                    ParleyError::internal(format!("Failed to serialize response: {e}"))
                })?;
                writeln!(output, "{json}")?;
            }
        }
        Ok(())
    }
}

/// Strips the line terminator and decodes, replacing invalid UTF-8.
fn decode_line(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    let line = String::from_utf8_lossy(bytes);
    if matches!(line, Cow::Owned(_)) {
        warn!("Input line is not valid UTF-8, invalid bytes replaced");
    }
    line
}
