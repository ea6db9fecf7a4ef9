//! Command registry.
//!
//! The dispatcher only needs [`CommandRegistry::overloads`]. The
//! [`InMemoryRegistry`] is a straightforward implementation with alias
//! support and a configurable name comparison.

use serde::{Deserialize, Serialize};

use super::overload::CommandOverload;

/// Lookup of overloads by command name.
pub trait CommandRegistry {
    /// Overloads registered under `name`, in registration order.
    ///
    /// Unknown names yield an empty vector.
    fn overloads(&self, name: &str) -> Vec<&dyn CommandOverload>;
}

/// How command names are compared during lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatching {
    /// Byte-for-byte comparison.
    #[default]
    Exact,
    /// Unicode case-insensitive comparison.
    CaseInsensitive,
}

impl NameMatching {
    /// Returns true if `requested` names the command registered as `registered`.
    pub fn matches(self, registered: &str, requested: &str) -> bool {
        match self {
            Self::Exact => registered == requested,
            Self::CaseInsensitive => registered.to_lowercase() == requested.to_lowercase(),
        }
    }
}

/// Metadata about a registered command, for help output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    /// The command name.
    pub name: String,
    /// Aliases that resolve to this command.
    pub aliases: Vec<String>,
    /// Usage lines of the command's overloads, in registration order.
    pub usages: Vec<String>,
}

struct Entry {
    name: String,
    overload: Box<dyn CommandOverload>,
}

/// Registry backed by a vector, preserving registration order.
#[derive(Default)]
pub struct InMemoryRegistry {
    matching: NameMatching,
    entries: Vec<Entry>,
    /// alias -> canonical command name
    aliases: Vec<(String, String)>,
}

impl InMemoryRegistry {
    /// Creates an empty registry with exact name matching.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with the given name matching.
    pub fn with_matching(matching: NameMatching) -> Self {
        Self {
            matching,
            ..Self::default()
        }
    }

    /// The name comparison in use.
    pub fn matching(&self) -> NameMatching {
        self.matching
    }

    /// Adds an overload under `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        overload: impl CommandOverload + 'static,
    ) -> &mut Self {
        self.entries.push(Entry {
            name: name.into(),
            overload: Box::new(overload),
        });
        self
    }

    /// Registers an alias that resolves to a canonical command name.
    pub fn register_alias(
        &mut self,
        alias: impl Into<String>,
        command: impl Into<String>,
    ) -> &mut Self {
        self.aliases.push((alias.into(), command.into()));
        self
    }

    /// Resolves an alias to its canonical name, or returns the input.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(alias, _)| self.matching.matches(alias, name))
            .map_or(name, |(_, command)| command.as_str())
    }

    /// Returns true if any overload is registered under the name or alias.
    pub fn contains(&self, name: &str) -> bool {
        !self.overloads(name).is_empty()
    }

    /// Number of registered overloads across all commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Describes every command, in order of first registration.
    pub fn catalog(&self) -> Vec<CommandInfo> {
        let mut catalog: Vec<CommandInfo> = Vec::new();
        for entry in &self.entries {
            let index = match catalog.iter().position(|info| info.name == entry.name) {
                Some(index) => index,
                None => {
                    catalog.push(CommandInfo {
                        name: entry.name.clone(),
                        aliases: self
                            .aliases
                            .iter()
                            .filter(|(_, command)| *command == entry.name)
                            .map(|(alias, _)| alias.clone())
                            .collect(),
                        usages: Vec::new(),
                    });
                    catalog.len() - 1
                }
            };
            if let Some(usage) = entry.overload.usage() {
                catalog[index].usages.push(usage.to_string());
            }
        }
        catalog
    }
}

impl CommandRegistry for InMemoryRegistry {
    fn overloads(&self, name: &str) -> Vec<&dyn CommandOverload> {
        let name = self.resolve(name);
        self.entries
            .iter()
            .filter(|entry| self.matching.matches(&entry.name, name))
            .map(|entry| entry.overload.as_ref())
            .collect()
    }
}
