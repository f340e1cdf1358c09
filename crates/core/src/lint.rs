//! Lint pipeline orchestrator.
//!
//! Directive scan -> tokens -> parse (with recovery) -> semantic walk ->
//! undefined-local pass. A strict-mode abort during parsing ends the run
//! with the single recorded error.

use crate::analyze::analyze_block;
use crate::config::LintOptions;
use crate::error::LintError;
use crate::lexer::lex;
use crate::parser::Parser;
use crate::post_analysis::report_undefined_locals;
use crate::preprocess::preprocess;
use crate::registry::Registry;
use crate::report::Report;
use crate::run::AnalysisRun;
use crate::source::SourceProvider;
use std::path::Path;

/// Lint one script held in memory. `filename` names it in include records
/// and anchors relative includes.
pub fn lint_source(
    source: &str,
    filename: &str,
    registry: &Registry,
    options: &LintOptions,
    provider: &dyn SourceProvider,
) -> Report {
    let preprocessed = preprocess(source, filename, provider, options.root_path.as_deref());
    let tokens = lex(&preprocessed.text);
    tracing::debug!(file = filename, tokens = tokens.len(), "lexed");

    let mut run = AnalysisRun::new(registry, provider, options.clone(), preprocessed.ledger);
    match Parser::new(tokens, &mut run).parse_unit() {
        Ok(block) => {
            analyze_block(&block, &mut run);
            report_undefined_locals(&mut run);
        }
        Err(failure) => {
            tracing::debug!(
                line = failure.span.begin_line,
                "stopped at first error"
            );
        }
    }

    let report = run.into_report();
    tracing::info!(
        file = filename,
        errors = report.errors().len(),
        warnings = report.warnings().len(),
        "lint finished"
    );
    report
}

/// Read `path` through `provider` and lint it.
pub fn lint_file(
    path: &Path,
    registry: &Registry,
    options: &LintOptions,
    provider: &dyn SourceProvider,
) -> Result<Report, LintError> {
    let source = provider
        .read_source(path)
        .map_err(|source| LintError::Source {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(lint_source(
        &source,
        &path.to_string_lossy(),
        registry,
        options,
        provider,
    ))
}
