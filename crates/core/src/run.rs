//! State of one lint run, threaded through parsing, recovery and analysis.

use crate::config::LintOptions;
use crate::diagnostic::Diagnostic;
use crate::lexer::Token;
use crate::preprocess::MacroLedger;
use crate::registry::Registry;
use crate::report::Report;
use crate::source::SourceProvider;
use crate::variables::Resolution;

pub struct AnalysisRun<'r> {
    registry: &'r Registry,
    provider: &'r dyn SourceProvider,
    options: LintOptions,
    report: Report,
    aborted: bool,
    post_analyzed: bool,
}

impl<'r> AnalysisRun<'r> {
    pub fn new(
        registry: &'r Registry,
        provider: &'r dyn SourceProvider,
        options: LintOptions,
        macros: MacroLedger,
    ) -> Self {
        let report = Report::new(macros, options.output_variables);
        AnalysisRun {
            registry,
            provider,
            options,
            report,
            aborted: false,
            post_analyzed: false,
        }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn provider(&self) -> &'r dyn SourceProvider {
        self.provider
    }

    pub fn options(&self) -> &LintOptions {
        &self.options
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn into_report(self) -> Report {
        self.report
    }

    /// Classify an identifier token and record it if it is a variable.
    pub fn resolve_reference(&mut self, token: &Token, next: &Token) -> Resolution<'r> {
        let (variables, macros) = self.report.tables_mut();
        variables.resolve(self.registry, macros, token, next)
    }

    /// Record a definition that is not an assignment, such as a `params`
    /// entry or a `for` loop counter. `name` is the unquoted variable name.
    pub fn define_local(&mut self, token: &Token, name: &str) {
        self.report
            .variables_mut()
            .record_mut(&name.to_ascii_lowercase())
            .add_definition(token);
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        tracing::trace!(
            line = diagnostic.span.begin_line,
            column = diagnostic.span.begin_column,
            message = %diagnostic.message,
            "diagnostic"
        );
        self.report.push(diagnostic);
    }

    /// Strict mode hit an error; nothing further is analyzed.
    pub fn abort(&mut self) {
        self.aborted = true;
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Marks post-analysis as done. False if it already ran.
    pub(crate) fn begin_post_analysis(&mut self) -> bool {
        !std::mem::replace(&mut self.post_analyzed, true)
    }
}
