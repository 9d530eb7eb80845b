//! `[scripts]` section configuration.
//!
//! The bundler runs once per entry file. `$PAVE_INPUT` and `$PAVE_OUTPUT`
//! are replaced with the entry and its destination.
//!
//! # Example
//!
//! ```toml
//! [scripts]
//! extension = "*.js"
//! command = ["esbuild", "$PAVE_INPUT", "--bundle", "--outfile=$PAVE_OUTPUT"]
//! dev_args = ["--sourcemap"]      # appended outside production
//! build_args = []                 # appended in production
//! ```

use serde::{Deserialize, Serialize};

use super::validate_command;
use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    pub extension: String,
    pub command: Vec<String>,
    pub dev_args: Vec<String>,
    pub build_args: Vec<String>,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            extension: "*.js".into(),
            command: vec![
                "esbuild".into(),
                "$PAVE_INPUT".into(),
                "--bundle".into(),
                "--outfile=$PAVE_OUTPUT".into(),
            ],
            dev_args: vec!["--sourcemap".into()],
            build_args: Vec::new(),
        }
    }
}

impl ScriptsConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let field = FieldPath::new("scripts.command");
        validate_command(&self.command, field, diag);

        let mentions = |var: &str| self.command.iter().any(|arg| arg.contains(var));
        if !self.command.is_empty() && !(mentions("$PAVE_INPUT") && mentions("$PAVE_OUTPUT")) {
            diag.error_with_hint(
                field,
                format!("{field} must reference both $PAVE_INPUT and $PAVE_OUTPUT"),
                "the bundler is invoked once per entry file",
            );
        }
    }
}
