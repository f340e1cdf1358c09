//! sqflint-core: static analysis for SQF scripts.
//!
//! Parses a script against a registry of built-in commands loaded from a
//! textual catalogue, tracks every variable reference, checks operand
//! types and arities, and reports locals that are used but never defined.
//! Syntax errors are recovered from so that one run reports as much as
//! possible.
//!
//! # Public API
//!
//! - [`lint_source()`] / [`lint_file()`] -- run the whole pipeline
//! - [`Registry`] -- command catalogue and operator behaviors
//! - [`LintOptions`] -- run configuration
//! - [`Report`] -- errors, warnings, variables, macros and includes
//! - [`SourceProvider`] -- file access seam ([`FileSystemProvider`],
//!   [`InMemoryProvider`])

pub mod analyze;
pub mod ast;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod lexer;
pub mod lint;
pub mod parser;
pub mod post_analysis;
pub mod preprocess;
pub mod recovery;
pub mod registry;
pub mod report;
pub mod run;
pub mod source;
pub mod variables;

// ── Convenience re-exports ───────────────────────────────────────────

pub use config::LintOptions;
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use error::LintError;
pub use lexer::{Comment, Span, Token, TokenKind};
pub use lint::{lint_file, lint_source};
pub use preprocess::{IncludeRecord, MacroDefinition, MacroLedger, MacroRecord};
pub use registry::{Arity, CommandDescriptor, OperandType, OperatorBehavior, Registry};
pub use report::Report;
pub use run::AnalysisRun;
pub use source::{FileSystemProvider, InMemoryProvider, SourceProvider};
pub use variables::{Resolution, VariableRecord, VariableTable};
