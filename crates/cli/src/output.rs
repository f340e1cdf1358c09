//! Report renderers: human-readable text and line-delimited JSON records.

use std::io::{self, Write};

use serde::Serialize;
use sqflint_core::{Diagnostic, Report, Span, Token, VariableRecord};

use crate::OutputFormat;

pub(crate) fn write_report(
    out: &mut dyn Write,
    report: &Report,
    filename: &str,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => write_text(out, report, filename),
        OutputFormat::Json => write_json(out, report),
    }
}

// ──────────────────────────────────────────────
// Text
// ──────────────────────────────────────────────

fn write_text(out: &mut dyn Write, report: &Report, filename: &str) -> io::Result<()> {
    for error in report.errors() {
        write_diagnostic(out, filename, "error", error)?;
    }
    for warning in report.warnings() {
        write_diagnostic(out, filename, "warning", warning)?;
    }
    if !report.output_variables() {
        return Ok(());
    }

    for variable in report.variables().iter() {
        write!(
            out,
            "variable {}: {} use(s), {} definition(s)",
            variable.name(),
            variable.usage().len(),
            variable.definitions().len()
        )?;
        if let Some(first) = variable.definitions().first() {
            write!(
                out,
                ", first defined at {}:{}",
                first.span.begin_line, first.span.begin_column
            )?;
        }
        writeln!(out)?;
        if let Some(comment) = variable.comment() {
            writeln!(out, "    {}", comment.text.trim())?;
        }
    }
    for include in report.includes() {
        writeln!(out, "include {} from {}", include.file, include.source)?;
    }
    for record in report.macros() {
        writeln!(
            out,
            "macro {}: {} definition(s)",
            record.name,
            record.definitions.len()
        )?;
    }
    Ok(())
}

fn write_diagnostic(
    out: &mut dyn Write,
    filename: &str,
    severity: &str,
    diagnostic: &Diagnostic,
) -> io::Result<()> {
    writeln!(
        out,
        "{}:{}:{}: {}: {}",
        filename,
        diagnostic.span.begin_line,
        diagnostic.span.begin_column,
        severity,
        diagnostic.message
    )
}

// ──────────────────────────────────────────────
// JSON lines
// ──────────────────────────────────────────────

#[derive(Serialize)]
struct Range {
    line: [u32; 2],
    column: [u32; 2],
}

impl From<Span> for Range {
    fn from(span: Span) -> Self {
        Range {
            line: [span.begin_line, span.end_line],
            column: [span.begin_column, span.end_column],
        }
    }
}

#[derive(Serialize)]
struct MacroDefinitionRecord<'a> {
    range: Range,
    value: &'a str,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Record<'a> {
    Error {
        message: &'a str,
        line: [u32; 2],
        column: [u32; 2],
    },
    Warning {
        message: &'a str,
        line: [u32; 2],
        column: [u32; 2],
    },
    Variable {
        variable: &'a str,
        usage: Vec<Range>,
        definitions: Vec<Range>,
        comment: Option<&'a str>,
    },
    Include {
        include: &'a str,
        from: &'a str,
    },
    Macro {
        #[serde(rename = "macro")]
        name: &'a str,
        definitions: Vec<MacroDefinitionRecord<'a>>,
    },
}

fn ranges(tokens: &[Token]) -> Vec<Range> {
    tokens.iter().map(|t| Range::from(t.span)).collect()
}

fn variable_record(variable: &VariableRecord) -> Record<'_> {
    Record::Variable {
        variable: variable.name(),
        usage: ranges(variable.usage()),
        definitions: ranges(variable.definitions()),
        comment: variable.comment().map(|c| c.text.as_str()),
    }
}

fn write_record(out: &mut dyn Write, record: &Record<'_>) -> io::Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    writeln!(out)
}

fn write_json(out: &mut dyn Write, report: &Report) -> io::Result<()> {
    for error in report.errors() {
        let range = Range::from(error.span);
        write_record(
            out,
            &Record::Error {
                message: &error.message,
                line: range.line,
                column: range.column,
            },
        )?;
    }
    for warning in report.warnings() {
        let range = Range::from(warning.span);
        write_record(
            out,
            &Record::Warning {
                message: &warning.message,
                line: range.line,
                column: range.column,
            },
        )?;
    }
    if !report.output_variables() {
        return Ok(());
    }

    for variable in report.variables().iter() {
        write_record(out, &variable_record(variable))?;
    }
    for include in report.includes() {
        write_record(
            out,
            &Record::Include {
                include: &include.file,
                from: &include.source,
            },
        )?;
    }
    for record in report.macros() {
        let definitions = record
            .definitions
            .iter()
            .map(|d| MacroDefinitionRecord {
                range: Range::from(d.span),
                value: &d.value,
            })
            .collect();
        write_record(
            out,
            &Record::Macro {
                name: &record.name,
                definitions,
            },
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqflint_core::{lint_source, InMemoryProvider, LintOptions, Registry};
    use std::collections::HashMap;

    fn render(src: &str, output_variables: bool, format: OutputFormat) -> String {
        let registry = Registry::builtin();
        let provider = InMemoryProvider::new(HashMap::new());
        let options = LintOptions {
            output_variables,
            ..LintOptions::default()
        };
        let report = lint_source(src, "init.sqf", &registry, &options, &provider);
        let mut out = Vec::new();
        write_report(&mut out, &report, "init.sqf", format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_lists_errors_before_warnings() {
        let text = render("hint str _a;\nhint 5;", false, OutputFormat::Text);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("init.sqf:2:6: error: "), "{}", lines[0]);
        assert_eq!(lines[1], "init.sqf:1:10: warning: Possibly undefined variable _a");
    }

    #[test]
    fn text_summaries_only_with_variables() {
        let src = "#define LIMIT 3\n// counter\n_n = LIMIT;";
        assert!(render(src, false, OutputFormat::Text).is_empty());
        let text = render(src, true, OutputFormat::Text);
        assert!(text.contains("variable _n: 1 use(s), 1 definition(s), first defined at 3:1"));
        assert!(text.contains("    // counter"));
        assert!(text.contains("macro LIMIT: 1 definition(s)"));
    }

    #[test]
    fn json_diagnostic_records() {
        let json = render("hint str _a;", false, OutputFormat::Json);
        let record: serde_json::Value = serde_json::from_str(json.trim()).unwrap();
        assert_eq!(record["type"], "warning");
        assert_eq!(record["message"], "Possibly undefined variable _a");
        assert_eq!(record["line"], serde_json::json!([1, 1]));
        assert_eq!(record["column"], serde_json::json!([10, 11]));
    }

    #[test]
    fn json_variable_and_macro_records() {
        let json = render(
            "#define LIMIT 3\n/* max */ _n = LIMIT;\nhint str _n;",
            true,
            OutputFormat::Json,
        );
        let records: Vec<serde_json::Value> = json
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        let variable = records
            .iter()
            .find(|r| r["type"] == "variable")
            .expect("variable record");
        assert_eq!(variable["variable"], "_n");
        assert_eq!(variable["usage"].as_array().unwrap().len(), 2);
        assert_eq!(variable["definitions"][0]["line"], serde_json::json!([2, 2]));
        assert_eq!(variable["comment"], "/* max */");

        let macro_record = records
            .iter()
            .find(|r| r["type"] == "macro")
            .expect("macro record");
        assert_eq!(macro_record["macro"], "LIMIT");
        assert_eq!(macro_record["definitions"][0]["value"], "3");
        assert_eq!(
            macro_record["definitions"][0]["range"]["column"],
            serde_json::json!([9, 13])
        );
    }

    #[test]
    fn json_comment_is_null_without_comment() {
        let json = render("_a = 1;", true, OutputFormat::Json);
        let record: serde_json::Value = serde_json::from_str(json.trim()).unwrap();
        assert!(record["comment"].is_null());
    }
}
