//! Lint options. Built by the CLI from flags, or read from a TOML file
//! with the same field names.

use crate::error::LintError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintOptions {
    /// Abort at the first syntax error instead of recovering
    pub stop_on_error: bool,
    /// Suppress the possibly-undefined-variable pass
    pub skip_warnings: bool,
    /// Include variable, macro and include summaries in the output
    pub output_variables: bool,
    /// Exit with status 1 when errors were found
    pub exit_code_enabled: bool,
    /// Report possibly-undefined variables as errors
    pub warning_as_error: bool,
    /// Verify that files named by loader commands exist
    pub check_paths: bool,
    /// Mission root for rooted includes and path checks
    pub root_path: Option<PathBuf>,
}

impl LintOptions {
    pub fn from_toml_str(text: &str) -> Result<Self, LintError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, LintError> {
        let text = std::fs::read_to_string(path).map_err(|source| LintError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Root used to resolve script paths; the working directory if unset.
    pub fn root(&self) -> &Path {
        self.root_path.as_deref().unwrap_or_else(|| Path::new("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_defaults_off() {
        let options = LintOptions::from_toml_str("").unwrap();
        assert_eq!(options, LintOptions::default());
        assert_eq!(options.root(), Path::new("."));
    }

    #[test]
    fn reads_fields() {
        let options = LintOptions::from_toml_str(
            "stop_on_error = true\ncheck_paths = true\nroot_path = \"/mission\"\n",
        )
        .unwrap();
        assert!(options.stop_on_error);
        assert!(options.check_paths);
        assert!(!options.warning_as_error);
        assert_eq!(options.root(), Path::new("/mission"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = LintOptions::from_toml_str("stop_on_eror = true").unwrap_err();
        assert!(matches!(err, LintError::Config(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = LintOptions::load(Path::new("/no/such/sqflint.toml")).unwrap_err();
        assert!(matches!(err, LintError::ConfigIo { .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sqflint.toml");
        std::fs::write(&path, "skip_warnings = true").unwrap();
        assert!(LintOptions::load(&path).unwrap().skip_warnings);
    }
}
