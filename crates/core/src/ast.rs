/// Syntax tree produced by the parser.
/// Every node keeps the tokens it was built from, so diagnostics can point
/// at exact source ranges. No type information lives here -- the analyzer
/// computes it on the fly.
use crate::lexer::{Span, Token};
use crate::registry::OperandType;

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `[private] target = value`
    Assign {
        private: bool,
        /// A variable, or a macro standing in for one
        target: Expr,
        value: Expr,
    },
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(Token),
    Str(Token),
    Variable(Token),
    /// Macro reference; `span` covers an argument list if one follows
    Macro { name: Token, span: Span },
    Array { elements: Vec<Expr>, span: Span },
    Code(Block),
    Paren { inner: Box<Expr>, span: Span },
    /// Command or symbolic operator with its operands as written.
    /// Nullary commands have neither, unary ones only `right`.
    Command {
        op: Token,
        left: Option<Box<Expr>>,
        right: Option<Box<Expr>>,
    },
    /// Stand-in for input the parser recovered from
    Invalid { span: Span },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Number(t) | Expr::Str(t) | Expr::Variable(t) => t.span,
            Expr::Macro { span, .. }
            | Expr::Array { span, .. }
            | Expr::Paren { span, .. }
            | Expr::Invalid { span } => *span,
            Expr::Code(block) => block.span,
            Expr::Command { op, left, right } => {
                let begin = left.as_ref().map_or(op.span, |l| l.span());
                let end = right.as_ref().map_or(op.span, |r| r.span());
                begin.to(end)
            }
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unwrap_paren(&self) -> &Expr {
        match self {
            Expr::Paren { inner, .. } => inner.unwrap_paren(),
            other => other,
        }
    }

    /// Elements of an array literal.
    pub fn array_elements(&self) -> Option<&[Expr]> {
        match self.unwrap_paren() {
            Expr::Array { elements, .. } => Some(elements),
            _ => None,
        }
    }

    /// Unquoted content of a string literal.
    pub fn string_literal(&self) -> Option<String> {
        match self.unwrap_paren() {
            Expr::Str(token) => token.string_value(),
            _ => None,
        }
    }

    /// Type evident from the literal form alone.
    pub fn literal_type(&self) -> OperandType {
        match self.unwrap_paren() {
            Expr::Number(_) => OperandType::Scalar,
            Expr::Str(_) => OperandType::String,
            Expr::Array { .. } => OperandType::Array,
            Expr::Code(_) => OperandType::Code,
            _ => OperandType::Wildcard,
        }
    }
}
