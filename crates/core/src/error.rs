use std::path::PathBuf;

/// Conditions that stop a lint run before any diagnostics can be produced.
///
/// Everything the linter finds *in* a script is a [`Diagnostic`](crate::Diagnostic);
/// these are the failures around it.
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    /// The operator catalogue could not be read. Without operator semantics
    /// there is nothing to check against.
    #[error("failed to read command catalogue {}: {source}", path.display())]
    Catalogue {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A script file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be read.
    #[error("failed to read configuration {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file was read but is not valid.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
