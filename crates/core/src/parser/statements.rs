use super::Parser;
use crate::ast::{Expr, Statement};
use crate::diagnostic::Diagnostic;
use crate::lexer::TokenKind;

impl<'a, 'r> Parser<'a, 'r> {
    // -- Statement lists --------------------------------------------

    /// Statements up to (not including) `close` or end of input. A failed
    /// statement is recovered at the next `;` and dropped.
    pub(super) fn block_body(&mut self, close: TokenKind) -> Result<Vec<Statement>, Diagnostic> {
        let mut statements = Vec::new();
        loop {
            while matches!(self.peek_kind(), TokenKind::Semicolon | TokenKind::Comma) {
                self.advance();
            }
            let kind = self.peek_kind();
            if kind == close || kind == TokenKind::Eof {
                break;
            }
            match self.statement(close) {
                Ok(statement) => statements.push(statement),
                Err(failure) => {
                    if self.recover(failure, TokenKind::Semicolon, true)? == TokenKind::Eof {
                        break;
                    }
                }
            }
        }
        Ok(statements)
    }

    fn statement(&mut self, close: TokenKind) -> Result<Statement, Diagnostic> {
        let private = self.peek().is(TokenKind::Ident)
            && self.peek().identifier() == "private"
            && self.nth(1).is(TokenKind::Ident)
            && self.nth(2).is(TokenKind::Assign);
        if private {
            let keyword = self.advance();
            self.run.resolve_reference(&keyword, self.cursor.peek());
        }

        let statement = if self.peek().is(TokenKind::Ident) && self.nth(1).is(TokenKind::Assign) {
            let target = self.advance();
            self.run.resolve_reference(&target, self.cursor.peek());
            self.advance();
            let value = self.expression()?;
            Statement::Assign {
                private,
                target: Expr::Variable(target),
                value,
            }
        } else {
            let expr = self.expression()?;
            if self.peek().is(TokenKind::Assign) && matches!(expr, Expr::Macro { .. }) {
                self.advance();
                let value = self.expression()?;
                Statement::Assign {
                    private,
                    target: expr,
                    value,
                }
            } else {
                Statement::Expr(expr)
            }
        };

        self.end_of_statement(close)?;
        Ok(statement)
    }

    fn end_of_statement(&mut self, close: TokenKind) -> Result<(), Diagnostic> {
        match self.peek_kind() {
            TokenKind::Semicolon | TokenKind::Comma => {
                self.advance();
                Ok(())
            }
            kind if kind == close || kind == TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("';'")),
        }
    }
}
