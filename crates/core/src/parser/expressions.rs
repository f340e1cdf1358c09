use super::Parser;
use crate::ast::{Block, Expr};
use crate::diagnostic::Diagnostic;
use crate::lexer::{Span, TokenKind};
use crate::registry::Arity;
use crate::variables::Resolution;

/// Binding strength of a binary operator. Named commands without an entry
/// here share one level between comparison and `else`.
fn precedence(op: &str) -> u8 {
    match op {
        "||" | "or" => 1,
        "&&" | "and" => 2,
        "==" | "!=" | ">" | "<" | ">=" | "<=" | ">>" => 3,
        "else" => 5,
        "+" | "-" | "max" | "min" => 6,
        "*" | "/" | "%" | "mod" | "atan2" => 7,
        "^" => 8,
        "#" => 9,
        _ => 4,
    }
}

impl<'a, 'r> Parser<'a, 'r> {
    // -- Binary operators -------------------------------------------

    pub(super) fn expression(&mut self) -> Result<Expr, Diagnostic> {
        self.binary(0)
    }

    fn binary(&mut self, min_precedence: u8) -> Result<Expr, Diagnostic> {
        let mut left = self.unary()?;
        while let Some(prec) = self.binary_precedence() {
            if prec < min_precedence {
                break;
            }
            let op = self.advance();
            if op.is(TokenKind::Ident) {
                self.run.resolve_reference(&op, self.cursor.peek());
            }
            let right = self.binary(prec + 1)?;
            left = Expr::Command {
                op,
                left: Some(Box::new(left)),
                right: Some(Box::new(right)),
            };
        }
        Ok(left)
    }

    /// Precedence of the current token if it can continue an expression as
    /// a binary operator.
    fn binary_precedence(&self) -> Option<u8> {
        let token = self.peek();
        match token.kind {
            TokenKind::Operator if token.text != "!" => Some(precedence(&token.text)),
            TokenKind::Ident => {
                let name = token.identifier();
                self.run
                    .registry()
                    .command(&name)
                    .filter(|d| d.supports(Arity::Binary))
                    .map(|_| precedence(&name))
            }
            _ => None,
        }
    }

    // -- Prefix forms and primaries ---------------------------------

    fn unary(&mut self) -> Result<Expr, Diagnostic> {
        let prefix = {
            let token = self.peek();
            token.is(TokenKind::Operator) && matches!(token.text.as_str(), "!" | "-" | "+")
        };
        if prefix {
            let op = self.advance();
            let operand = self.unary()?;
            return Ok(Expr::Command {
                op,
                left: None,
                right: Some(Box::new(operand)),
            });
        }
        match self.peek_kind() {
            TokenKind::Ident => self.identifier(),
            TokenKind::Number => Ok(Expr::Number(self.advance())),
            TokenKind::Str => Ok(Expr::Str(self.advance())),
            TokenKind::LBracket => self.array(),
            TokenKind::LBrace => self.code(),
            TokenKind::LParen => self.paren(),
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn identifier(&mut self) -> Result<Expr, Diagnostic> {
        let token = self.advance();
        match self.run.resolve_reference(&token, self.cursor.peek()) {
            Resolution::Command(descriptor) => {
                // A binary-only command in prefix position still takes its
                // right operand; the analyzer reports the missing left one.
                let takes_operand = descriptor.supports(Arity::Unary)
                    || (descriptor.supports(Arity::Binary) && !descriptor.supports(Arity::Nullary));
                let right = if takes_operand && self.starts_operand() {
                    Some(Box::new(self.unary()?))
                } else {
                    None
                };
                Ok(Expr::Command {
                    op: token,
                    left: None,
                    right,
                })
            }
            Resolution::Macro => {
                let span = if self.peek().is(TokenKind::LParen) {
                    token.span.to(self.skip_macro_arguments()?)
                } else {
                    token.span
                };
                Ok(Expr::Macro { name: token, span })
            }
            Resolution::Ignored | Resolution::Variable => Ok(Expr::Variable(token)),
        }
    }

    fn starts_operand(&self) -> bool {
        let token = self.peek();
        match token.kind {
            TokenKind::Number
            | TokenKind::Str
            | TokenKind::LBracket
            | TokenKind::LBrace
            | TokenKind::LParen => true,
            TokenKind::Operator => matches!(token.text.as_str(), "!" | "-" | "+"),
            TokenKind::Ident => match self.run.registry().command(&token.identifier()) {
                Some(d) => d.supports(Arity::Nullary) || d.supports(Arity::Unary),
                None => true,
            },
            _ => false,
        }
    }

    /// Skip a balanced `( ... )` after a macro name. Macro arguments are not
    /// interpreted. Returns the span of the closing parenthesis.
    fn skip_macro_arguments(&mut self) -> Result<Span, Diagnostic> {
        let mut depth = 0usize;
        loop {
            match self.peek_kind() {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(self.advance().span);
                    }
                }
                TokenKind::Eof => return Err(self.unexpected("')'")),
                _ => {}
            }
            self.advance();
        }
    }

    fn array(&mut self) -> Result<Expr, Diagnostic> {
        let open = self.advance();
        let mut elements = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::RBracket => break,
                TokenKind::Eof => return Err(self.unexpected("']'")),
                _ => {}
            }
            let failure = match self.expression() {
                Ok(element) => {
                    elements.push(element);
                    match self.peek_kind() {
                        TokenKind::Comma => {
                            self.advance();
                            continue;
                        }
                        TokenKind::RBracket => break,
                        _ => self.unexpected("',' or ']'"),
                    }
                }
                Err(failure) => failure,
            };
            if self.recover(failure, TokenKind::RBracket, false)? == TokenKind::Eof {
                let span = open.span.to(self.peek().span);
                return Ok(Expr::Array { elements, span });
            }
        }
        let close = self.advance();
        Ok(Expr::Array {
            elements,
            span: open.span.to(close.span),
        })
    }

    fn code(&mut self) -> Result<Expr, Diagnostic> {
        let open = self.advance();
        let statements = self.block_body(TokenKind::RBrace)?;
        let close = self.expect(TokenKind::RBrace)?;
        Ok(Expr::Code(Block {
            statements,
            span: open.span.to(close.span),
        }))
    }

    fn paren(&mut self) -> Result<Expr, Diagnostic> {
        let open = self.advance();
        let inner = match self.expression() {
            Ok(inner) if self.peek().is(TokenKind::RParen) => inner,
            Ok(inner) => {
                let failure = self.unexpected("')'");
                self.recover(failure, TokenKind::RParen, false)?;
                inner
            }
            Err(failure) => {
                let span = failure.span;
                self.recover(failure, TokenKind::RParen, false)?;
                Expr::Invalid { span }
            }
        };
        let close = if self.peek().is(TokenKind::RParen) {
            self.advance().span
        } else {
            self.peek().span
        };
        Ok(Expr::Paren {
            inner: Box::new(inner),
            span: open.span.to(close),
        })
    }
}
