//! Command registry built from the textual command catalogue.
//!
//! Each catalogue line describes one overload of a built-in command:
//!
//! ```text
//! b:ARRAY select SCALAR,BOOL     binary: left type(s), name, right type(s)
//! u:hint STRING                  unary: name, right type(s)
//! n:player                       nullary: name only
//! ```
//!
//! Overloads of the same command are merged: the descriptor collects every
//! arity seen, and the operator behavior accumulates the union of accepted
//! types per side. A handful of commands carry fixed behavior that the
//! catalogue never overrides (see [`OperatorBehavior`]).

use crate::error::LintError;
use std::collections::HashMap;
use std::path::Path;

mod operators;
mod types;

pub use operators::{Application, Operand, OperatorBehavior};
pub use types::{accepts, describe_set, Arity, CommandDescriptor, OperandSets, OperandType};

const BUILTIN_CATALOGUE: &str = include_str!("../../res/commands.txt");

const PATH_LOADERS: [&str; 4] = [
    "execvm",
    "preprocessfile",
    "preprocessfilelinenumbers",
    "loadfile",
];

#[derive(Debug, Clone)]
pub struct Registry {
    commands: HashMap<String, CommandDescriptor>,
    operators: HashMap<String, OperatorBehavior>,
}

impl Registry {
    /// Registry over the catalogue shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_catalogue(BUILTIN_CATALOGUE)
    }

    /// Read a catalogue file. Failing to read it is fatal for the run.
    pub fn load(path: &Path) -> Result<Self, LintError> {
        let text = std::fs::read_to_string(path).map_err(|source| LintError::Catalogue {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_catalogue(&text))
    }

    /// Build a registry from catalogue text. Lines that match none of the
    /// three forms are skipped.
    pub fn from_catalogue(text: &str) -> Self {
        let mut registry = Self::with_fixed_behaviors();
        let mut loaded = 0usize;
        let mut skipped = 0usize;
        for line in text.lines() {
            match CatalogueEntry::parse(line) {
                Some(entry) => {
                    registry.add(entry);
                    loaded += 1;
                }
                None if !line.trim().is_empty() => skipped += 1,
                None => {}
            }
        }
        tracing::debug!(
            loaded,
            skipped,
            commands = registry.commands.len(),
            "command catalogue loaded"
        );
        registry
    }

    fn with_fixed_behaviors() -> Self {
        let mut operators = HashMap::new();
        operators.insert(
            "params".to_string(),
            OperatorBehavior::Params(OperandSets::default()),
        );
        for name in PATH_LOADERS {
            operators.insert(
                name.to_string(),
                OperatorBehavior::PathLoader(OperandSets::default()),
            );
        }
        operators.insert("if".to_string(), OperatorBehavior::If);
        operators.insert("then".to_string(), OperatorBehavior::Then);
        operators.insert("exitwith".to_string(), OperatorBehavior::ExitWith);
        Registry {
            commands: HashMap::new(),
            operators,
        }
    }

    fn add(&mut self, entry: CatalogueEntry) {
        self.commands
            .entry(entry.name.clone())
            .or_insert_with(|| CommandDescriptor::new(&entry.name))
            .arities
            .insert(entry.arity);

        let behavior = self
            .operators
            .entry(entry.name)
            .or_insert_with(|| OperatorBehavior::Generic(OperandSets::default()));
        if let Some(sets) = behavior.sets_mut() {
            sets.left.extend(entry.left);
            sets.right.extend(entry.right);
        }
    }

    /// Descriptor for a case-folded identifier.
    pub fn command(&self, identifier: &str) -> Option<&CommandDescriptor> {
        self.commands.get(identifier)
    }

    pub fn is_command(&self, identifier: &str) -> bool {
        self.commands.contains_key(identifier)
    }

    pub fn operator(&self, identifier: &str) -> Option<&OperatorBehavior> {
        self.operators.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// One parsed catalogue line.
#[derive(Debug, PartialEq)]
struct CatalogueEntry {
    arity: Arity,
    name: String,
    left: Vec<OperandType>,
    right: Vec<OperandType>,
}

impl CatalogueEntry {
    fn parse(line: &str) -> Option<Self> {
        let (form, rest) = line.trim().split_once(':')?;
        let parts: Vec<&str> = rest.split_whitespace().collect();
        let form = form.to_ascii_lowercase();
        let (arity, name, left, right) = match (form.as_str(), parts.as_slice()) {
            ("b" | "binary", [left, name, right]) => {
                (Arity::Binary, name, type_list(left), type_list(right))
            }
            ("u" | "unary", [name, right]) => (Arity::Unary, name, Vec::new(), type_list(right)),
            ("n" | "noarg" | "nular", [name]) => (Arity::Nullary, name, Vec::new(), Vec::new()),
            _ => return None,
        };
        Some(CatalogueEntry {
            arity,
            name: name.to_ascii_lowercase(),
            left,
            right,
        })
    }
}

fn type_list(list: &str) -> Vec<OperandType> {
    list.split(',')
        .filter(|t| !t.is_empty())
        .map(OperandType::from_catalogue)
        .collect()
}
