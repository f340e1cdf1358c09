//! Variable table and scope resolution.
//!
//! Every identifier the parser meets is classified exactly once: a built-in
//! command, a macro, one of the engine's magic variables, or a variable.
//! Only the last kind gets an entry in the table. Usage and definition
//! sites accumulate per case-folded name for the whole file; the linter
//! does not model nested scopes.

use crate::lexer::{Comment, Token, TokenKind};
use crate::preprocess::MacroLedger;
use crate::registry::{CommandDescriptor, Registry};
use indexmap::IndexMap;

/// Magic variables the engine provides inside loops, handlers and
/// scripts. Never recorded, never reported.
pub const IGNORED_VARIABLES: [&str; 4] = ["_this", "_x", "_foreachindex", "_exception"];

pub fn is_local(identifier: &str) -> bool {
    identifier.starts_with('_')
}

pub fn is_ignored(identifier: &str) -> bool {
    IGNORED_VARIABLES.contains(&identifier)
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableRecord {
    name: String,
    usage: Vec<Token>,
    definitions: Vec<Token>,
    /// One entry per definition, in the same order
    comments: Vec<Option<Comment>>,
}

impl VariableRecord {
    fn new(name: &str) -> Self {
        VariableRecord {
            name: name.to_string(),
            usage: Vec::new(),
            definitions: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Case-folded name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage(&self) -> &[Token] {
        &self.usage
    }

    pub fn definitions(&self) -> &[Token] {
        &self.definitions
    }

    pub fn comments(&self) -> &[Option<Comment>] {
        &self.comments
    }

    pub fn is_local(&self) -> bool {
        is_local(&self.name)
    }

    /// Comment attached to the first definition.
    pub fn comment(&self) -> Option<&Comment> {
        self.comments.first().and_then(Option::as_ref)
    }

    pub(crate) fn add_usage(&mut self, token: &Token) {
        self.usage.push(token.clone());
    }

    pub(crate) fn add_definition(&mut self, token: &Token) {
        self.definitions.push(token.clone());
        self.comments.push(token.comment.clone());
    }
}

/// Classification of one identifier occurrence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'r> {
    Command(&'r CommandDescriptor),
    Macro,
    /// Magic variable
    Ignored,
    Variable,
}

/// Records in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    records: IndexMap<String, VariableRecord>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identifier: &str) -> Option<&VariableRecord> {
        self.records.get(&identifier.to_ascii_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fetch-or-create the record for a case-folded name.
    pub(crate) fn record_mut(&mut self, identifier: &str) -> &mut VariableRecord {
        self.records
            .entry(identifier.to_string())
            .or_insert_with(|| VariableRecord::new(identifier))
    }

    /// Classify `token` and record it when it names a variable. `next` is
    /// the token that follows; an `=` there makes this a definition site.
    pub fn resolve<'r>(
        &mut self,
        registry: &'r Registry,
        macros: &MacroLedger,
        token: &Token,
        next: &Token,
    ) -> Resolution<'r> {
        let identifier = token.identifier();
        if let Some(descriptor) = registry.command(&identifier) {
            return Resolution::Command(descriptor);
        }
        if macros.contains(&identifier) {
            return Resolution::Macro;
        }
        if is_ignored(&identifier) {
            return Resolution::Ignored;
        }

        let record = self.record_mut(&identifier);
        record.add_usage(token);
        if next.is(TokenKind::Assign) {
            record.add_definition(token);
        }
        Resolution::Variable
    }
}
