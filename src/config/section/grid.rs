//! `[grid]` section configuration.
//!
//! Settings for the grid mixin stylesheet written by `install` into the
//! vendor source folder.
//!
//! ```toml
//! [grid]
//! filename = "_smart-grid"
//! columns = 12
//! offset = "1.875rem"
//! mobile_first = true
//! container_mixin = "container"
//! container_max_width = "75rem"
//! container_fields = "0.9375rem"
//!
//! [[grid.breakpoints]]
//! name = "md"
//! width = "48rem"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Output file stem (`.scss` is appended).
    pub filename: String,
    pub columns: u32,
    /// Gutter between columns.
    pub offset: String,
    /// `min-width` queries when true, `max-width` otherwise.
    pub mobile_first: bool,
    pub container_mixin: String,
    pub container_max_width: String,
    /// Horizontal padding of the container.
    pub container_fields: String,
    /// Ordered from narrowest to widest.
    pub breakpoints: Vec<Breakpoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub name: String,
    pub width: String,
}

impl Breakpoint {
    fn new(name: &str, width: &str) -> Self {
        Self {
            name: name.into(),
            width: width.into(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            filename: "_smart-grid".into(),
            columns: 12,
            offset: "1.875rem".into(),
            mobile_first: true,
            container_mixin: "container".into(),
            container_max_width: "75rem".into(),
            container_fields: "0.9375rem".into(),
            breakpoints: vec![
                Breakpoint::new("xs", "20rem"),
                Breakpoint::new("sm", "36rem"),
                Breakpoint::new("md", "48rem"),
                Breakpoint::new("lg", "62rem"),
                Breakpoint::new("xl", "75rem"),
            ],
        }
    }
}

impl GridConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.columns == 0 {
            diag.error(FieldPath::new("grid.columns"), "columns must be at least 1");
        }
        if self.filename.is_empty() || self.filename.contains(['/', '\\']) {
            diag.error(
                FieldPath::new("grid.filename"),
                format!("`{}` is not a valid file stem", self.filename),
            );
        }
        if !is_identifier(&self.container_mixin) {
            diag.error(
                FieldPath::new("grid.container_mixin"),
                format!("`{}` is not a valid mixin name", self.container_mixin),
            );
        }
        for bp in &self.breakpoints {
            if !is_identifier(&bp.name) {
                diag.error(
                    FieldPath::new("grid.breakpoints"),
                    format!("`{}` is not a valid mixin name", bp.name),
                );
            }
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
