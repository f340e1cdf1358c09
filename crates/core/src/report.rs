//! Everything one lint run produced: errors, warnings, the variable table
//! and the macro/include ledger. Output formatting lives with the caller.

use crate::diagnostic::{Diagnostic, Severity};
use crate::preprocess::{IncludeRecord, MacroLedger, MacroRecord};
use crate::variables::VariableTable;

#[derive(Debug, Clone, Default)]
pub struct Report {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
    variables: VariableTable,
    macros: MacroLedger,
    output_variables: bool,
}

impl Report {
    pub fn new(macros: MacroLedger, output_variables: bool) -> Self {
        Report {
            macros,
            output_variables,
            ..Report::default()
        }
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn variables(&self) -> &VariableTable {
        &self.variables
    }

    pub fn ledger(&self) -> &MacroLedger {
        &self.macros
    }

    pub fn macros(&self) -> impl Iterator<Item = &MacroRecord> {
        self.macros.macros()
    }

    pub fn includes(&self) -> &[IncludeRecord] {
        self.macros.includes()
    }

    /// Whether variable, macro and include summaries should be emitted.
    pub fn output_variables(&self) -> bool {
        self.output_variables
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 1 when exit codes are enabled and any error was recorded, else 0.
    pub fn exit_code(&self, exit_code_enabled: bool) -> i32 {
        if exit_code_enabled && self.has_errors() {
            1
        } else {
            0
        }
    }

    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.errors.push(diagnostic),
            Severity::Warning => self.warnings.push(diagnostic),
        }
    }

    /// Split borrow for resolution: the table is written while the
    /// ledger is read.
    pub(crate) fn tables_mut(&mut self) -> (&mut VariableTable, &MacroLedger) {
        (&mut self.variables, &self.macros)
    }

    pub(crate) fn variables_mut(&mut self) -> &mut VariableTable {
        &mut self.variables
    }
}
