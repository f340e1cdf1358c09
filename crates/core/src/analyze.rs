//! Semantic walk over a parsed file.
//!
//! Operands are analyzed bottom-up. Each command application is first
//! checked for arity against its descriptor; only if the shape is right is
//! its operator behavior asked to validate operand types. The walk computes
//! a coarse result type per expression so that, for example, `if` feeding
//! `then` can be verified.

use crate::ast::{Block, Expr, Statement};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::lexer::Token;
use crate::registry::{Application, Arity, CommandDescriptor, Operand, OperandType};
use crate::run::AnalysisRun;

pub fn analyze_block(block: &Block, run: &mut AnalysisRun<'_>) {
    for statement in &block.statements {
        match statement {
            Statement::Assign { value, .. } => {
                analyze_expr(value, run);
            }
            Statement::Expr(expr) => {
                analyze_expr(expr, run);
            }
        }
    }
}

/// Analyze `expr` and return its inferred type.
pub fn analyze_expr(expr: &Expr, run: &mut AnalysisRun<'_>) -> OperandType {
    match expr {
        Expr::Number(_) => OperandType::Scalar,
        Expr::Str(_) => OperandType::String,
        Expr::Variable(_) | Expr::Macro { .. } | Expr::Invalid { .. } => OperandType::Wildcard,
        Expr::Array { elements, .. } => {
            for element in elements {
                analyze_expr(element, run);
            }
            OperandType::Array
        }
        Expr::Code(block) => {
            analyze_block(block, run);
            OperandType::Code
        }
        Expr::Paren { inner, .. } => analyze_expr(inner, run),
        Expr::Command { op, left, right } => {
            analyze_command(op, left.as_deref(), right.as_deref(), run)
        }
    }
}

fn analyze_command(
    op: &Token,
    left: Option<&Expr>,
    right: Option<&Expr>,
    run: &mut AnalysisRun<'_>,
) -> OperandType {
    let left = left.map(|expr| Operand {
        ty: analyze_expr(expr, run),
        expr,
    });
    let right = right.map(|expr| Operand {
        ty: analyze_expr(expr, run),
        expr,
    });
    let app = Application { op, left, right };
    let name = op.identifier();
    let registry = run.registry();

    let arity_ok = match registry.command(&name) {
        Some(descriptor) => match arity_mismatch(descriptor, &app) {
            Some(diagnostic) => {
                run.record(diagnostic);
                false
            }
            None => true,
        },
        None => true,
    };
    if arity_ok {
        if let Some(behavior) = registry.operator(&name) {
            behavior.check(&app, run);
        }
        if name == "for" && left.is_none() {
            define_loop_counter(right, run);
        }
    }

    result_type(&name, left.map(|o| o.ty), right.map(|o| o.ty))
}

fn arity_mismatch(descriptor: &CommandDescriptor, app: &Application<'_>) -> Option<Diagnostic> {
    let used = match (&app.left, &app.right) {
        (None, None) => Arity::Nullary,
        (None, Some(_)) => Arity::Unary,
        (Some(_), _) => Arity::Binary,
    };
    if descriptor.supports(used) && !(used == Arity::Binary && app.right.is_none()) {
        return None;
    }

    let name = &app.op.text;
    let message = match used {
        Arity::Nullary if descriptor.supports(Arity::Unary) => {
            format!("'{name}' requires an argument")
        }
        Arity::Nullary => format!("'{name}' requires left and right arguments"),
        Arity::Unary if descriptor.supports(Arity::Binary) => {
            format!("'{name}' requires a left argument")
        }
        Arity::Unary => format!("'{name}' does not take arguments"),
        Arity::Binary if app.right.is_none() => format!("'{name}' requires a right argument"),
        Arity::Binary if descriptor.supports(Arity::Unary) => {
            format!("'{name}' does not take a left argument")
        }
        Arity::Binary => format!("'{name}' does not take arguments"),
    };
    let span = app
        .left
        .map_or(app.op.span, |l| l.expr.span())
        .to(app.right.map_or(app.op.span, |r| r.expr.span()));
    Some(Diagnostic::error(DiagnosticKind::ArityMismatch, span, message))
}

/// `for "_i" from 0 to 9 do {...}`: the counter is defined by the string.
fn define_loop_counter(right: Option<Operand<'_>>, run: &mut AnalysisRun<'_>) {
    let Some(Expr::Str(token)) = right.map(|r| r.expr.unwrap_paren()) else {
        return;
    };
    if let Some(name) = token.string_value() {
        if name.starts_with('_') {
            run.define_local(token, &name);
        }
    }
}

fn result_type(name: &str, left: Option<OperandType>, right: Option<OperandType>) -> OperandType {
    match name {
        "if" => OperandType::If,
        "for" | "from" | "to" | "step" => OperandType::For,
        "while" => OperandType::While,
        "switch" => OperandType::Switch,
        "with" => OperandType::With,
        "try" => OperandType::Exception,
        "else" => OperandType::Array,
        "compile" | "compilefinal" => OperandType::Code,
        "true" | "false" | "!" | "not" | "==" | "!=" | "<" | ">" | "<=" | ">=" | "&&" | "and"
        | "||" | "or" | "isnil" | "isnull" | "alive" | "isequalto" | "in" | "isserver"
        | "hasinterface" | "isdedicated" => OperandType::Bool,
        "str" | "format" | "typename" | "tolower" | "toupper" | "joinstring" | "localize" => {
            OperandType::String
        }
        "count" | "random" | "floor" | "ceil" | "round" | "abs" | "sqrt" | "distance" | "time"
        | "diag_ticktime" | "servertime" => OperandType::Scalar,
        "+" | "-" | "*" | "/" | "%" | "^" | "mod" | "max" | "min" => match (left, right) {
            (Some(l), Some(r)) if l == r => l,
            (None, Some(r)) => r,
            _ => OperandType::Wildcard,
        },
        _ => OperandType::Wildcard,
    }
}
