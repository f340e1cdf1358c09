//! Macro and include ledger.
//!
//! A line-based scan over preprocessor directives that records which macro
//! names exist and which files are included. Macros are never expanded: the
//! analyzer only needs to know that a name *is* a macro so it can stop
//! treating it as a variable. Directive lines are blanked in the returned
//! text so that token positions still match the original file.

use crate::lexer::Span;
use crate::source::{script_relative_path, SourceProvider};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One `#define` of a macro in one file.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroDefinition {
    pub file: String,
    /// Position of the macro name in the `#define` line
    pub span: Span,
    /// Expansion text as written, continuation lines joined with newlines
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacroRecord {
    pub name: String,
    /// Argument list of a function-like macro, without the parentheses
    pub arguments: Option<String>,
    pub definitions: Vec<MacroDefinition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncludeRecord {
    /// Included path exactly as written in the directive
    pub file: String,
    /// File containing the directive
    pub source: String,
}

/// Known macro names and include directives for one lint run.
#[derive(Debug, Clone, Default)]
pub struct MacroLedger {
    /// Keyed by case-folded macro name
    macros: IndexMap<String, MacroRecord>,
    includes: Vec<IncludeRecord>,
}

impl MacroLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `identifier` names a macro. Matching is case-insensitive.
    pub fn contains(&self, identifier: &str) -> bool {
        self.macros.contains_key(&identifier.to_ascii_lowercase())
    }

    pub fn get(&self, identifier: &str) -> Option<&MacroRecord> {
        self.macros.get(&identifier.to_ascii_lowercase())
    }

    /// Macros in order of first definition.
    pub fn macros(&self) -> impl Iterator<Item = &MacroRecord> {
        self.macros.values()
    }

    pub fn includes(&self) -> &[IncludeRecord] {
        &self.includes
    }

    pub fn define(&mut self, name: &str, arguments: Option<String>, definition: MacroDefinition) {
        self.macros
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| MacroRecord {
                name: name.to_string(),
                arguments,
                definitions: Vec::new(),
            })
            .definitions
            .push(definition);
    }

    pub fn add_include(&mut self, file: &str, source: &str) {
        self.includes.push(IncludeRecord {
            file: file.to_string(),
            source: source.to_string(),
        });
    }
}

/// Result of the directive scan.
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// Source text with directive lines blanked
    pub text: String,
    pub ledger: MacroLedger,
}

struct Scanner<'a> {
    provider: &'a dyn SourceProvider,
    root: Option<&'a Path>,
    ledger: MacroLedger,
    visited: HashSet<PathBuf>,
}

/// Scan `source` (named `filename`) for directives, following resolvable
/// includes through `provider`. Includes written with a leading backslash
/// are resolved under `root`; all others relative to the including file.
pub fn preprocess(
    source: &str,
    filename: &str,
    provider: &dyn SourceProvider,
    root: Option<&Path>,
) -> Preprocessed {
    let mut scanner = Scanner {
        provider,
        root,
        ledger: MacroLedger::new(),
        visited: HashSet::new(),
    };
    scanner
        .visited
        .insert(provider.canonicalize(Path::new(filename)));
    let text = scanner.scan(source, filename);
    tracing::debug!(
        file = filename,
        macros = scanner.ledger.macros.len(),
        includes = scanner.ledger.includes.len(),
        "directive scan finished"
    );
    Preprocessed {
        text,
        ledger: scanner.ledger,
    }
}

impl Scanner<'_> {
    fn scan(&mut self, source: &str, filename: &str) -> String {
        let lines: Vec<&str> = source.split('\n').collect();
        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut i = 0;
        while i < lines.len() {
            let first = lines[i];
            if !first.trim_start().starts_with('#') {
                out.push(first.to_string());
                i += 1;
                continue;
            }

            let start = i;
            let mut directive = String::new();
            while i < lines.len() {
                let part = lines[i].trim_end_matches('\r');
                i += 1;
                match part.strip_suffix('\\') {
                    Some(continued) => {
                        directive.push_str(continued);
                        directive.push('\n');
                    }
                    None => {
                        directive.push_str(part);
                        break;
                    }
                }
            }
            out.extend((start..i).map(|_| String::new()));
            self.directive(&directive, first, filename, start as u32 + 1);
        }
        out.join("\n")
    }

    fn directive(&mut self, directive: &str, first_line: &str, filename: &str, line: u32) {
        let body = directive.trim_start().trim_start_matches('#').trim_start();
        let (word, rest) = match body.find(char::is_whitespace) {
            Some(idx) => (&body[..idx], &body[idx..]),
            None => (body, ""),
        };
        match word {
            "define" => self.define(rest, first_line, filename, line),
            "include" => self.include(rest.trim(), filename),
            // Conditionals and #undef are blanked but not evaluated.
            _ => {}
        }
    }

    fn define(&mut self, rest: &str, first_line: &str, filename: &str, line: u32) {
        let rest = rest.trim_start();
        let name: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if name.is_empty() {
            return;
        }
        let after_name = &rest[name.len()..];
        let (arguments, value) = match after_name.strip_prefix('(') {
            Some(args) => match args.find(')') {
                Some(close) => (Some(args[..close].trim().to_string()), &args[close + 1..]),
                None => (Some(args.trim().to_string()), ""),
            },
            None => (None, after_name),
        };

        let column = name_column(first_line);
        let span = Span::new(line, column, line, column + name.chars().count() as u32 - 1);
        self.ledger.define(
            &name,
            arguments,
            MacroDefinition {
                file: filename.to_string(),
                span,
                value: value.trim().to_string(),
            },
        );
    }

    fn include(&mut self, rest: &str, filename: &str) {
        let close = match rest.chars().next() {
            Some('"') => '"',
            Some('<') => '>',
            _ => return,
        };
        let Some(end) = rest[1..].find(close) else {
            return;
        };
        let file = &rest[1..1 + end];
        self.ledger.add_include(file, filename);

        let relative = script_relative_path(file);
        let candidate = if file.starts_with('\\') || file.starts_with('/') {
            match self.root {
                Some(root) => root.join(relative),
                None => {
                    tracing::debug!(include = file, "no root path; include not followed");
                    return;
                }
            }
        } else {
            Path::new(filename)
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(relative)
        };

        if !self.visited.insert(self.provider.canonicalize(&candidate)) {
            return;
        }
        match self.provider.read_source(&candidate) {
            Ok(text) => {
                let included = candidate.to_string_lossy().into_owned();
                self.scan(&text, &included);
            }
            Err(e) => {
                tracing::warn!(include = file, from = filename, error = %e, "include not readable");
            }
        }
    }
}

/// 1-based column of the macro name in a `#define NAME` line.
fn name_column(first_line: &str) -> u32 {
    let chars: Vec<char> = first_line.chars().collect();
    let mut i = 0;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i += 1; // '#'
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    while i < chars.len() && chars[i].is_ascii_alphabetic() {
        i += 1;
    }
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemoryProvider;
    use std::collections::HashMap;

    fn scan(src: &str) -> Preprocessed {
        let provider = InMemoryProvider::new(HashMap::new());
        preprocess(src, "/m/init.sqf", &provider, None)
    }

    #[test]
    fn define_is_recorded_and_blanked() {
        let out = scan("#define MAX_UNITS 10\n_a = MAX_UNITS;");
        assert_eq!(out.text, "\n_a = MAX_UNITS;");
        let record = out.ledger.get("max_units").expect("macro recorded");
        assert_eq!(record.name, "MAX_UNITS");
        assert_eq!(record.arguments, None);
        assert_eq!(record.definitions[0].value, "10");
        assert_eq!(record.definitions[0].span, Span::new(1, 9, 1, 17));
        assert_eq!(record.definitions[0].file, "/m/init.sqf");
    }

    #[test]
    fn function_like_macro_keeps_arguments() {
        let out = scan("#define GVAR(var) TAG_##var");
        let record = out.ledger.get("GVAR").unwrap();
        assert_eq!(record.arguments.as_deref(), Some("var"));
        assert_eq!(record.definitions[0].value, "TAG_##var");
    }

    #[test]
    fn continuation_lines_are_joined_and_blanked() {
        let out = scan("#define LONG 1 + \\\n 2\n_x = 1;");
        assert_eq!(out.text, "\n\n_x = 1;");
        assert_eq!(out.ledger.get("long").unwrap().definitions[0].value, "1 + \n 2");
    }

    #[test]
    fn repeated_define_accumulates_definitions() {
        let out = scan("#define A 1\n#ifdef B\n#define A 2\n#endif");
        let record = out.ledger.get("A").unwrap();
        assert_eq!(record.definitions.len(), 2);
        assert_eq!(out.text, "\n\n\n");
    }

    #[test]
    fn macro_lookup_ignores_case() {
        let out = scan("#define Foo 1");
        assert!(out.ledger.contains("FOO"));
        assert!(out.ledger.contains("foo"));
        assert!(!out.ledger.contains("bar"));
    }

    #[test]
    fn include_is_recorded_and_followed() {
        let provider = InMemoryProvider::from_pairs([
            ("/m/init.sqf", "#include \"macros.hpp\"\n"),
            ("/m/macros.hpp", "#define FROM_HEADER 1\n#include \"more.hpp\""),
            ("/m/more.hpp", "#define DEEPER 2"),
        ]);
        let out = preprocess("#include \"macros.hpp\"\n", "/m/init.sqf", &provider, None);
        assert!(out.ledger.contains("from_header"));
        assert!(out.ledger.contains("deeper"));
        let includes = out.ledger.includes();
        assert_eq!(includes.len(), 2);
        assert_eq!(includes[0].file, "macros.hpp");
        assert_eq!(includes[0].source, "/m/init.sqf");
        assert_eq!(includes[1].file, "more.hpp");
        assert_eq!(includes[1].source, "/m/macros.hpp");
        assert_eq!(
            out.ledger.get("deeper").unwrap().definitions[0].file,
            "/m/more.hpp"
        );
    }

    #[test]
    fn rooted_include_resolves_under_root() {
        let provider =
            InMemoryProvider::from_pairs([("/mission/common/defs.hpp", "#define ROOTED 1")]);
        let out = preprocess(
            "#include \"\\common\\defs.hpp\"",
            "/mission/scripts/a.sqf",
            &provider,
            Some(Path::new("/mission")),
        );
        assert!(out.ledger.contains("rooted"));
    }

    #[test]
    fn include_cycle_terminates() {
        let provider = InMemoryProvider::from_pairs([
            ("/m/a.hpp", "#include \"b.hpp\"\n#define IN_A 1"),
            ("/m/b.hpp", "#include \"a.hpp\"\n#define IN_B 1"),
        ]);
        let out = preprocess("#include \"a.hpp\"", "/m/init.sqf", &provider, None);
        assert!(out.ledger.contains("in_a"));
        assert!(out.ledger.contains("in_b"));
        assert_eq!(out.ledger.includes().len(), 3);
    }

    #[test]
    fn missing_include_is_still_recorded() {
        let out = scan("#include <missing.hpp>");
        assert_eq!(out.ledger.includes()[0].file, "missing.hpp");
        assert_eq!(out.ledger.macros().count(), 0);
    }
}
