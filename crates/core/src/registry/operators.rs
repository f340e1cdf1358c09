use super::types::{describe_set, OperandSets, OperandType};
use crate::ast::Expr;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::lexer::Token;
use crate::run::AnalysisRun;
use crate::source::script_relative_path;

/// How an operator validates its operands.
///
/// Most commands are `Generic` and only check operand types against the
/// catalogue. The remaining variants are fixed for specific commands and
/// add structural rules on top of (or instead of) the type check.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorBehavior {
    Generic(OperandSets),
    /// `if`: condition must be boolean
    If,
    /// `then`: follows an `if`, takes code or `[then, else]`
    Then,
    /// `exitWith`: follows an `if`, takes code
    ExitWith,
    /// `params`: catalogue types plus parameter-list shape; defines locals
    Params(OperandSets),
    /// `execVM` and friends: catalogue types plus file existence
    PathLoader(OperandSets),
}

/// An operand after its own analysis.
#[derive(Debug, Clone, Copy)]
pub struct Operand<'a> {
    pub ty: OperandType,
    pub expr: &'a Expr,
}

/// One use of an operator in the tree.
#[derive(Debug, Clone, Copy)]
pub struct Application<'a> {
    pub op: &'a Token,
    pub left: Option<Operand<'a>>,
    pub right: Option<Operand<'a>>,
}

impl OperatorBehavior {
    pub fn sets(&self) -> Option<&OperandSets> {
        match self {
            OperatorBehavior::Generic(sets)
            | OperatorBehavior::Params(sets)
            | OperatorBehavior::PathLoader(sets) => Some(sets),
            OperatorBehavior::If | OperatorBehavior::Then | OperatorBehavior::ExitWith => None,
        }
    }

    pub(crate) fn sets_mut(&mut self) -> Option<&mut OperandSets> {
        match self {
            OperatorBehavior::Generic(sets)
            | OperatorBehavior::Params(sets)
            | OperatorBehavior::PathLoader(sets) => Some(sets),
            OperatorBehavior::If | OperatorBehavior::Then | OperatorBehavior::ExitWith => None,
        }
    }

    /// Validate one application, recording any findings on `run`.
    pub fn check(&self, app: &Application<'_>, run: &mut AnalysisRun<'_>) {
        match self {
            OperatorBehavior::Generic(sets) => check_types(sets, app, run),
            OperatorBehavior::If => check_if(app, run),
            OperatorBehavior::Then => check_then(app, run),
            OperatorBehavior::ExitWith => check_exit_with(app, run),
            OperatorBehavior::Params(sets) => {
                check_types(sets, app, run);
                check_params(app, run);
            }
            OperatorBehavior::PathLoader(sets) => {
                check_types(sets, app, run);
                check_path(app, run);
            }
        }
    }
}

fn type_error(operand: &Operand<'_>, message: String) -> Diagnostic {
    Diagnostic::error(DiagnosticKind::TypeMismatch, operand.expr.span(), message)
}

fn check_types(sets: &OperandSets, app: &Application<'_>, run: &mut AnalysisRun<'_>) {
    if let Some(left) = &app.left {
        if !sets.accepts_left(left.ty) {
            run.record(type_error(
                left,
                format!(
                    "Type {} is not accepted as left argument of '{}', expected {}",
                    left.ty,
                    app.op.text,
                    describe_set(&sets.left)
                ),
            ));
        }
    }
    if let Some(right) = &app.right {
        if !sets.accepts_right(right.ty) {
            run.record(type_error(
                right,
                format!(
                    "Type {} is not accepted as right argument of '{}', expected {}",
                    right.ty,
                    app.op.text,
                    describe_set(&sets.right)
                ),
            ));
        }
    }
}

fn is(ty: OperandType, expected: OperandType) -> bool {
    ty == expected || ty == OperandType::Wildcard
}

// -- Control structures ----------------------------------------

fn check_if(app: &Application<'_>, run: &mut AnalysisRun<'_>) {
    if let Some(cond) = &app.right {
        if !is(cond.ty, OperandType::Bool) {
            run.record(type_error(
                cond,
                format!("Condition of '{}' must be Boolean, got {}", app.op.text, cond.ty),
            ));
        }
    }
}

fn check_follows_if(app: &Application<'_>, run: &mut AnalysisRun<'_>) {
    if let Some(left) = &app.left {
        if !is(left.ty, OperandType::If) {
            run.record(type_error(
                left,
                format!("'{}' must follow an if condition, got {}", app.op.text, left.ty),
            ));
        }
    }
}

fn check_then(app: &Application<'_>, run: &mut AnalysisRun<'_>) {
    check_follows_if(app, run);
    let Some(body) = &app.right else { return };
    match body.ty {
        OperandType::Code | OperandType::Wildcard => {}
        OperandType::Array => check_branches(app.op, body, run),
        other => run.record(type_error(
            body,
            format!(
                "'{}' expects code or an array of code, got {}",
                app.op.text, other
            ),
        )),
    }
}

/// `if c then [{...}, {...}]`: one or two code branches.
fn check_branches(op: &Token, body: &Operand<'_>, run: &mut AnalysisRun<'_>) {
    let Some(branches) = body.expr.array_elements() else {
        return;
    };
    if branches.is_empty() || branches.len() > 2 {
        run.record(type_error(
            body,
            format!(
                "'{}' expects one or two code branches, got {}",
                op.text,
                branches.len()
            ),
        ));
        return;
    }
    for branch in branches {
        let ty = branch.literal_type();
        if !is(ty, OperandType::Code) {
            run.record(Diagnostic::error(
                DiagnosticKind::TypeMismatch,
                branch.span(),
                format!("Branch of '{}' must be Code, got {}", op.text, ty),
            ));
        }
    }
}

fn check_exit_with(app: &Application<'_>, run: &mut AnalysisRun<'_>) {
    check_follows_if(app, run);
    if let Some(body) = &app.right {
        if !is(body.ty, OperandType::Code) {
            run.record(type_error(
                body,
                format!("'{}' expects Code, got {}", app.op.text, body.ty),
            ));
        }
    }
}

// -- params ----------------------------------------------------

fn check_params(app: &Application<'_>, run: &mut AnalysisRun<'_>) {
    let Some(list) = app.right.as_ref().and_then(|r| r.expr.array_elements()) else {
        return;
    };
    for element in list {
        match element.unwrap_paren() {
            Expr::Str(token) => define_param(token, run),
            Expr::Array { elements, span } => match elements.first().map(Expr::unwrap_paren) {
                Some(Expr::Str(token)) => define_param(token, run),
                Some(Expr::Macro { .. }) => {}
                _ => run.record(Diagnostic::error(
                    DiagnosticKind::TypeMismatch,
                    *span,
                    "Parameter definition must start with a variable name string",
                )),
            },
            Expr::Macro { .. } => {}
            other => run.record(Diagnostic::error(
                DiagnosticKind::TypeMismatch,
                other.span(),
                "Parameter must be a variable name string or a definition array",
            )),
        }
    }
}

fn define_param(token: &Token, run: &mut AnalysisRun<'_>) {
    let Some(name) = token.string_value() else {
        return;
    };
    // "" skips a position
    if name.is_empty() {
        return;
    }
    if name.starts_with('_') {
        run.define_local(token, &name);
    } else {
        run.record(Diagnostic::error(
            DiagnosticKind::TypeMismatch,
            token.span,
            format!("Parameter '{name}' must be a local variable name starting with '_'"),
        ));
    }
}

// -- File loaders ----------------------------------------------

fn check_path(app: &Application<'_>, run: &mut AnalysisRun<'_>) {
    if !run.options().check_paths {
        return;
    }
    let Some(target) = &app.right else { return };
    let Some(written) = target.expr.string_literal() else {
        return;
    };
    let root = run.options().root().to_path_buf();
    let path = root.join(script_relative_path(&written));
    if !run.provider().exists(&path) {
        tracing::debug!(path = %path.display(), "loader target missing");
        run.record(Diagnostic::error(
            DiagnosticKind::PathResolution,
            target.expr.span(),
            format!("File '{}' not found under {}", written, root.display()),
        ));
    }
}
