mod output;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use sqflint_core::{
    lint_file, lint_source, FileSystemProvider, LintError, LintOptions, Registry, Report,
};
use tracing_subscriber::EnvFilter;

/// Name reported for scripts read from standard input.
const STDIN_NAME: &str = "<stdin>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "sqflint", version, about = "Static analyzer for SQF scripts")]
struct Cli {
    /// Script to lint; standard input is read when omitted
    file: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Shorthand for --output json
    #[arg(short = 'j', long)]
    json: bool,

    /// Stop at the first error
    #[arg(short = 's', long)]
    stop_on_error: bool,

    /// Do not report warnings
    #[arg(short = 'n', long = "no-warnings")]
    no_warnings: bool,

    /// Also print variables, includes and macros
    #[arg(short = 'v', long)]
    variables: bool,

    /// Exit with status 1 when errors were reported
    #[arg(short = 'e', long)]
    exit_code: bool,

    /// Report warnings as errors
    #[arg(short = 'w', long)]
    warning_as_error: bool,

    /// Check that script paths given to execVM and friends exist
    #[arg(short = 'c', long)]
    check_paths: bool,

    /// Mission root used for path checks and absolute includes
    #[arg(short = 'r', long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// TOML file with lint options
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Command catalogue replacing the built-in one
    #[arg(long, value_name = "FILE")]
    commands: Option<PathBuf>,

    /// Suppress error messages on stderr
    #[arg(short = 'q', long)]
    quiet: bool,
}

impl Cli {
    fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output
        }
    }

    /// Options from `--config`, with any flag given on the command line
    /// switched on over it.
    fn options(&self) -> Result<LintOptions, LintError> {
        let mut options = match &self.config {
            Some(path) => LintOptions::load(path)?,
            None => LintOptions::default(),
        };
        options.stop_on_error |= self.stop_on_error;
        options.skip_warnings |= self.no_warnings;
        options.output_variables |= self.variables;
        options.exit_code_enabled |= self.exit_code;
        options.warning_as_error |= self.warning_as_error;
        options.check_paths |= self.check_paths;
        if let Some(root) = &self.root {
            options.root_path = Some(root.clone());
        }
        Ok(options)
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let format = cli.format();
    let options = match cli.options() {
        Ok(options) => options,
        Err(e) => {
            report_error(&e.to_string(), format, cli.quiet);
            process::exit(1);
        }
    };

    let (report, filename) = match run(&cli, &options) {
        Ok(result) => result,
        Err(e) => {
            report_error(&e.to_string(), format, cli.quiet);
            process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = output::write_report(&mut out, &report, &filename, format)
        .and_then(|()| out.flush());
    if let Err(e) = written {
        report_error(&format!("failed to write report: {}", e), format, cli.quiet);
        process::exit(1);
    }
    drop(out);

    process::exit(report.exit_code(options.exit_code_enabled));
}

fn run(cli: &Cli, options: &LintOptions) -> Result<(Report, String), LintError> {
    let registry = match &cli.commands {
        Some(path) => Registry::load(path)?,
        None => Registry::builtin(),
    };
    tracing::debug!(commands = registry.len(), "registry ready");

    let provider = FileSystemProvider;
    match &cli.file {
        Some(path) => {
            let report = lint_file(path, &registry, options, &provider)?;
            Ok((report, path.display().to_string()))
        }
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .map_err(|source| LintError::Source {
                    path: Path::new(STDIN_NAME).to_path_buf(),
                    source,
                })?;
            let report = lint_source(&source, STDIN_NAME, &registry, options, &provider);
            Ok((report, STDIN_NAME.to_string()))
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => eprintln!("{}", serde_json::json!({ "error": msg })),
    }
}
