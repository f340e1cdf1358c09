//! Possibly-undefined local variables.
//!
//! Runs once after the walk, over the finished variable table. A local that
//! is used but never defined anywhere in the file is reported at every use.
//! Definitions made before the use are not required: SQF has no
//! declaration-before-use rule the linter could rely on.

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::run::AnalysisRun;

pub fn report_undefined_locals(run: &mut AnalysisRun<'_>) {
    if !run.begin_post_analysis() {
        return;
    }
    if run.options().skip_warnings {
        tracing::debug!("undefined-local pass skipped");
        return;
    }

    let escalate = run.options().warning_as_error;
    let report = run.report();
    let findings: Vec<Diagnostic> = report
        .variables()
        .iter()
        .filter(|v| {
            v.is_local() && v.definitions().is_empty() && !report.ledger().contains(v.name())
        })
        .flat_map(|v| v.usage())
        .map(|usage| {
            let warning = Diagnostic::warning(
                DiagnosticKind::UndefinedLocal,
                usage.span,
                format!("Possibly undefined variable {}", usage.text),
            );
            if escalate {
                warning.escalate()
            } else {
                warning
            }
        })
        .collect();

    tracing::debug!(count = findings.len(), "undefined-local pass finished");
    for diagnostic in findings {
        run.record(diagnostic);
    }
}
