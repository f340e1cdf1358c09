/// Parser for SQF token streams.
/// Identifiers are resolved against the registry as they are read: whether a
/// name is a command decides how the following tokens group, and variable
/// references are recorded in the run's table on the way.
use crate::ast::Block;
use crate::diagnostic::Diagnostic;
use crate::lexer::{Token, TokenKind};
use crate::recovery::{self, TokenCursor};
use crate::run::AnalysisRun;

mod expressions;
mod statements;

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

pub struct Parser<'a, 'r> {
    cursor: TokenCursor,
    run: &'a mut AnalysisRun<'r>,
}

impl<'a, 'r> Parser<'a, 'r> {
    pub fn new(tokens: Vec<Token>, run: &'a mut AnalysisRun<'r>) -> Self {
        Parser {
            cursor: TokenCursor::new(tokens),
            run,
        }
    }

    /// Parse a whole file. Syntax errors are recorded on the run and parsing
    /// continues; `Err` is returned only when strict mode aborted the run.
    pub fn parse_unit(&mut self) -> Result<Block, Diagnostic> {
        let start = self.peek().span;
        let statements = self.block_body(TokenKind::Eof)?;
        Ok(Block {
            statements,
            span: start.to(self.peek().span),
        })
    }

    fn peek(&self) -> &Token {
        self.cursor.peek()
    }

    fn peek_kind(&self) -> TokenKind {
        self.cursor.peek().kind
    }

    fn nth(&self, n: usize) -> &Token {
        self.cursor.nth(n)
    }

    fn advance(&mut self) -> Token {
        self.cursor.advance()
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Diagnostic> {
        if self.peek().is(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    /// Syntax error at the current token.
    fn unexpected(&self, expected: &str) -> Diagnostic {
        let token = self.peek();
        let message = match token.kind {
            TokenKind::Invalid => token.invalid_reason(),
            TokenKind::Eof => format!("unexpected end of input, expected {expected}"),
            _ => format!("unexpected '{}', expected {}", token.text, expected),
        };
        Diagnostic::syntax(token.span, message)
    }

    fn recover(
        &mut self,
        failure: Diagnostic,
        boundary: TokenKind,
        skip: bool,
    ) -> Result<TokenKind, Diagnostic> {
        recovery::recover(&mut self.cursor, self.run, failure, boundary, skip)
    }
}
