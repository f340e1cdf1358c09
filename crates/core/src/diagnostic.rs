//! Diagnostics recorded during a lint run.

use crate::lexer::Span;
use serde::Serialize;

/// What went wrong, independent of how severe it is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Malformed token stream.
    SyntaxError,
    /// Operand type not accepted by the operator.
    TypeMismatch,
    /// Wrong number of operands for the operator.
    ArityMismatch,
    /// Local variable used but never defined.
    UndefinedLocal,
    /// A loader operator references a file that does not exist under the root path.
    PathResolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            span,
            message: message.into(),
        }
    }

    pub fn warning(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            span,
            message: message.into(),
        }
    }

    pub fn syntax(span: Span, message: impl Into<String>) -> Self {
        Self::error(DiagnosticKind::SyntaxError, span, message)
    }

    /// Promote to error severity, keeping kind, position and message.
    pub fn escalate(mut self) -> Self {
        self.severity = Severity::Error;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
