//! Pipeline configuration management for `pave.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── layout     # [layout]
//! │   ├── styles     # [styles]
//! │   ├── scripts    # [scripts]
//! │   ├── images     # [images]
//! │   ├── vendor     # [vendor]
//! │   ├── grid       # [grid]
//! │   └── serve      # [serve]
//! ├── types/         # ConfigError, diagnostics, FieldPath
//! └── mod.rs         # PipelineConfig (this file)
//! ```
//!
//! The config file is optional. Without one, the defaults describe the
//! conventional `_source/` layout rooted at the current directory.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    GridConfig, ImagesConfig, LayoutConfig, ScriptsConfig, ServeConfig, StylesConfig,
    VendorConfig, VendorPackage,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::cli::{Cli, TaskName};
use crate::log;
use crate::utils::path::normalize_path;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing pave.toml.
///
/// Built once at startup and shared read-only (`Arc<PipelineConfig>`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Absolute path to the config file, which may not exist
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Absolute public root (`layout.root` resolved against the config dir)
    #[serde(skip)]
    pub root: PathBuf,

    /// `--production`: minify and force every group
    #[serde(skip)]
    pub production: bool,

    /// `--tunnel[=NAME]`
    #[serde(skip)]
    pub tunnel: Option<String>,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub styles: StylesConfig,

    #[serde(default)]
    pub scripts: ScriptsConfig,

    #[serde(default)]
    pub images: ImagesConfig,

    #[serde(default)]
    pub vendor: VendorConfig,

    #[serde(default)]
    pub grid: GridConfig,

    #[serde(default)]
    pub serve: ServeConfig,
}

impl PipelineConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. The project directory is
    /// the config file's parent, or cwd when no file is found.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = path;
                config
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", cli.config.display());
                Self {
                    config_path: cwd.join(&cli.config),
                    ..Self::default()
                }
            }
        };

        config.production = cli.production;
        config.tunnel = cli.tunnel.clone();
        config.finalize();
        config.validate_for(cli.task)?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Resolve `layout.root` (with `~` expansion) against the config directory.
    fn finalize(&mut self) {
        let base = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let raw = self.layout.root.to_string_lossy();
        let expanded = PathBuf::from(shellexpand::tilde(&raw).into_owned());
        let root = if expanded.is_absolute() {
            expanded
        } else {
            base.join(expanded)
        };

        self.root = normalize_path(&root);
        self.config_path = normalize_path(&self.config_path);
        self.styles.include_paths = self
            .styles
            .include_paths
            .iter()
            .map(|p| normalize_path(&base.join(p)))
            .collect();
    }

    /// Whether outputs are minified (and every group forced).
    pub const fn minify(&self) -> bool {
        self.production
    }

    /// Resolve a path (relative to the project directory) to an absolute one.
    pub fn project_join(&self, path: impl AsRef<Path>) -> PathBuf {
        let base = self.config_path.parent().unwrap_or(self.root.as_path());
        normalize_path(&base.join(path))
    }

    /// Path relative to the public root, for display.
    pub fn root_relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the sections a task depends on.
    ///
    /// External engine commands are checked only for tasks that invoke them,
    /// so `install` works on a machine without `sass`.
    pub fn validate_for(&self, task: TaskName) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.layout.validate(&mut diag);
        self.images.validate(&mut diag);
        self.vendor.validate(&mut diag);
        self.grid.validate(&mut diag);
        if task == TaskName::Install && self.vendor.packages.is_empty() {
            diag.warn(
                FieldPath::new("vendor.packages"),
                "no packages configured, `install` only generates the grid",
            );
        }

        let (styles, scripts, serve) = match task {
            TaskName::Build | TaskName::Watch => (true, true, false),
            TaskName::Default => (true, true, true),
            TaskName::BuildStyles => (true, false, false),
            TaskName::BuildScripts => (false, true, false),
            TaskName::BuildImages | TaskName::RebuildImages | TaskName::Install => {
                (false, false, false)
            }
        };
        if styles {
            self.styles.validate(&mut diag);
        }
        if scripts {
            self.scripts.validate(&mut diag);
        }
        if serve {
            self.serve.validate(&mut diag);
        }

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config content.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PipelineConfig {
    let (parsed, ignored) = PipelineConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Config rooted at `dir`, as if `pave.toml` lived there.
#[cfg(test)]
pub fn test_config_at(dir: &Path, content: &str) -> PipelineConfig {
    let mut config = test_parse_config(content);
    config.config_path = dir.join("pave.toml");
    config.finalize();
    config
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_invalid_toml() {
        let result = PipelineConfig::parse_with_ignored("[layout\nroot = \"./\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[layout]\nsource = \"src/\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = PipelineConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.layout.source, "src/");
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let (_, ignored) = PipelineConfig::parse_with_ignored("[styles]\nextension = \"*.sass\"").unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_finalize_resolves_root() {
        let config = test_config_at(Path::new("/work/site"), "[layout]\nroot = \"public/\"");
        assert_eq!(config.root, PathBuf::from("/work/site/public"));
        assert_eq!(
            config.styles.include_paths,
            vec![PathBuf::from("/work/site/node_modules")]
        );
    }

    #[test]
    fn test_finalize_default_root() {
        let config = test_config_at(Path::new("/work/site"), "");
        assert_eq!(config.root, PathBuf::from("/work/site"));
        assert_eq!(config.project_join("node_modules/x"), PathBuf::from("/work/site/node_modules/x"));
    }

    #[test]
    fn test_root_relative() {
        let config = test_config_at(Path::new("/work/site"), "");
        let path = Path::new("/work/site/assets/style.css");
        assert_eq!(config.root_relative(path), Path::new("assets/style.css"));
        assert_eq!(config.root_relative(Path::new("/elsewhere")), Path::new("/elsewhere"));
    }

    #[test]
    fn test_validate_for_skips_unused_engines() {
        let mut config = test_config_at(Path::new("/work/site"), "");
        config.styles.command = vec!["pave-missing-sass".into()];

        assert!(config.validate_for(TaskName::Install).is_ok());
        assert!(config.validate_for(TaskName::BuildImages).is_ok());
        assert!(config.validate_for(TaskName::BuildStyles).is_err());
    }

    #[test]
    fn test_install_without_packages_only_warns() {
        let config = test_config_at(Path::new("/work/site"), "[vendor]\npackages = []");
        assert!(config.vendor.packages.is_empty());
        assert!(config.validate_for(TaskName::Install).is_ok());
    }
}
