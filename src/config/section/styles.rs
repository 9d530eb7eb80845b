//! `[styles]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [styles]
//! command = ["sass"]                  # or ["npx", "sass"]
//! extension = "*.scss"
//! include_paths = ["node_modules"]    # relative to pave.toml
//! targets = ["defaults"]              # browserslist queries for prefixing
//! group_media_queries = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::validate_command;
use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Sass compiler command. Input path and load paths are appended.
    pub command: Vec<String>,
    /// Glob for stylesheet sources.
    pub extension: String,
    /// Extra load paths besides the template and vendor source folders.
    pub include_paths: Vec<PathBuf>,
    /// Browserslist queries for vendor prefixes.
    pub targets: Vec<String>,
    /// Merge identical `@media` blocks and move them to the end.
    pub group_media_queries: bool,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            command: vec!["sass".into()],
            extension: "*.scss".into(),
            include_paths: vec![PathBuf::from("node_modules")],
            targets: vec!["defaults".into()],
            group_media_queries: true,
        }
    }
}

impl StylesConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        validate_command(&self.command, FieldPath::new("styles.command"), diag);

        if !self.extension.starts_with('*') {
            diag.error_with_hint(
                FieldPath::new("styles.extension"),
                format!("`{}` is not an extension glob", self.extension),
                "use a pattern like `*.scss`",
            );
        }
    }
}
