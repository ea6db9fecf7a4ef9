//! Transport-agnostic display responses.
//!
//! A [`Response`] is what a dispatch cycle hands back to the host. The host
//! decides how to show it: [`Response::render`] produces plain text, and the
//! `serde` representation is used for JSON output.

use serde::{Deserialize, Serialize};

/// A display node produced by a dispatch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Response {
    /// Informational text.
    Text(String),

    /// Error text shown to the user.
    Error(String),

    /// Tabular data.
    Table {
        /// Column headers.
        headers: Vec<String>,
        /// Row data (each row is a vector of cell values).
        rows: Vec<Vec<String>>,
    },

    /// Host control action.
    Control(ControlAction),

    /// Several responses shown in order.
    Multiple(Vec<Response>),
}

/// Control actions that affect the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    /// Stop reading input.
    Exit,
}

impl Response {
    /// Creates a text response.
    pub fn text(msg: impl Into<String>) -> Self {
        Self::Text(msg.into())
    }

    /// Creates an error response.
    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    /// Creates a table response.
    pub fn table(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self::Table { headers, rows }
    }

    /// Creates a multiple response from a vector.
    pub fn multiple(responses: Vec<Response>) -> Self {
        Self::Multiple(responses)
    }

    /// Creates an exit control action.
    pub fn exit() -> Self {
        Self::Control(ControlAction::Exit)
    }

    /// Returns true if this response, or any nested one, asks the host to exit.
    pub fn is_exit(&self) -> bool {
        match self {
            Self::Control(ControlAction::Exit) => true,
            Self::Multiple(responses) => responses.iter().any(Response::is_exit),
            _ => false,
        }
    }

    /// Renders the response as plain text.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Error(msg) => format!("Error: {msg}"),
            Self::Table { headers, rows } => render_table(headers, rows),
            Self::Control(ControlAction::Exit) => "Goodbye.".to_string(),
            Self::Multiple(responses) => responses
                .iter()
                .map(Response::render)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0);

    let mut widths = vec![0; columns];
    for row in std::iter::once(headers).chain(rows.iter().map(Vec::as_slice)) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_row = |row: &[String]| {
        widths
            .iter()
            .enumerate()
            .map(|(i, &width)| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                format!("{cell:<width$}")
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(headers)];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.extend(rows.iter().map(|row| format_row(row.as_slice())));
    lines.join("\n")
}
