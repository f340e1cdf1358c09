//! Token cursor and the error recovery protocol.
//!
//! When a parse rule fails, the failure is recorded and the cursor is moved
//! to a known boundary token so that parsing can resume and later errors
//! are still found. In strict mode the first failure ends the run instead.

use crate::diagnostic::Diagnostic;
use crate::lexer::{Span, Token, TokenKind};
use crate::run::AnalysisRun;

pub struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenCursor {
    /// The stream always ends in an `Eof` token; one is appended if missing.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(true, |t| !t.is(TokenKind::Eof)) {
            let span = tokens.last().map_or(Span::new(1, 1, 1, 1), |t| t.span);
            tokens.push(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                span,
                comment: None,
            });
        }
        TokenCursor { tokens, pos: 0 }
    }

    pub fn peek(&self) -> &Token {
        self.nth(0)
    }

    /// Lookahead past the current token; saturates at `Eof`.
    pub fn nth(&self, n: usize) -> &Token {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
    }

    /// Consume the current token. Stays put at `Eof`.
    pub fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    pub fn at_end(&self) -> bool {
        self.peek().is(TokenKind::Eof)
    }
}

/// Record `failure` and resynchronize.
///
/// The token the failure was raised at is discarded, then everything up to
/// `boundary` (or end of input). With `skip` the boundary is consumed too.
/// Returns the kind of token recovery stopped on.
///
/// In strict mode, or once the run has been aborted, returns the failure
/// as `Err` so the caller unwinds; only the first one is recorded.
pub fn recover(
    cursor: &mut TokenCursor,
    run: &mut AnalysisRun<'_>,
    failure: Diagnostic,
    boundary: TokenKind,
    skip: bool,
) -> Result<TokenKind, Diagnostic> {
    if run.is_aborted() {
        return Err(failure);
    }
    run.record(failure.clone());
    if run.options().stop_on_error {
        run.abort();
        return Err(failure);
    }

    let mut discarded = 1;
    cursor.advance();
    let stopped_on = loop {
        let kind = cursor.peek().kind;
        if kind == boundary || kind == TokenKind::Eof {
            if skip {
                cursor.advance();
            }
            break kind;
        }
        cursor.advance();
        discarded += 1;
    };
    tracing::debug!(
        boundary = boundary.describe(),
        discarded,
        line = failure.span.begin_line,
        "recovered from syntax error"
    );
    Ok(stopped_on)
}
