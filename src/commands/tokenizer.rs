//! Tokenizer for raw command lines.
//!
//! Splits a line into plain string tokens:
//! - Whitespace-separated words
//! - Double-quoted runs: `"hello world"` → `hello world`
//! - Unterminated quotes run to the end of the line: `say "hi` → `hi`
//!
//! A quote that appears inside a bare word is kept as literal content of that
//! word (`a"b` stays `a"b`). The split is a single regex pass, so it is linear
//! in the length of the line.

use std::sync::LazyLock;

use regex::Regex;

/// Either a quoted run (closing quote optional) or a maximal non-space run.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]*)"?|(\S+)"#).expect("token pattern is a valid regex")
});

/// Tokenizes a raw command line.
///
/// The line is trimmed first. An empty or all-whitespace line yields an empty
/// vector.
pub fn tokenize(input: &str) -> Vec<String> {
    let input = input.trim();
    if input.is_empty() {
        return Vec::new();
    }

    TOKEN_PATTERN
        .captures_iter(input)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}
