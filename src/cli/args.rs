//! Command-line interface definitions.

use clap::{ColorChoice, Parser, ValueEnum};
use std::path::PathBuf;

/// Front-end asset pipeline: styles, scripts, images and vendor files
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Task to run
    #[arg(value_enum, default_value_t = TaskName::Default)]
    pub task: TaskName,

    /// Production build: minify outputs and ignore modification times
    #[arg(short, long)]
    pub production: bool,

    /// Expose the dev server through a public tunnel (optionally named)
    #[arg(short, long, num_args = 0..=1, default_missing_value = "", require_equals = true)]
    pub tunnel: Option<String>,

    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (searched upward from the current directory)
    #[arg(short = 'C', long, default_value = "pave.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Tasks that can be invoked by name.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskName {
    /// Build styles, scripts and images
    #[value(name = "build")]
    Build,
    /// Build template and vendor styles
    #[value(name = "build::styles")]
    BuildStyles,
    /// Bundle template and vendor scripts
    #[value(name = "build::scripts")]
    BuildScripts,
    /// Optimize images newer than their output
    #[value(name = "build::images")]
    BuildImages,
    /// Optimize every image regardless of modification time
    #[value(name = "rebuild::images")]
    RebuildImages,
    /// Copy vendor packages and generate the grid
    #[value(name = "install")]
    Install,
    /// Watch sources and rebuild on change
    #[value(name = "watch")]
    Watch,
    /// Watch and start the dev server
    #[value(name = "default")]
    Default,
}

impl TaskName {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::BuildStyles => "build::styles",
            Self::BuildScripts => "build::scripts",
            Self::BuildImages => "build::images",
            Self::RebuildImages => "rebuild::images",
            Self::Install => "install",
            Self::Watch => "watch",
            Self::Default => "default",
        }
    }
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_and_version_flags() {
        let cli = Cli::try_parse_from(["pave", "-v", "build"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.task, TaskName::Build);

        let err = Cli::try_parse_from(["pave", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_default_task() {
        let cli = Cli::try_parse_from(["pave"]).unwrap();
        assert_eq!(cli.task, TaskName::Default);
        assert!(!cli.production);
        assert!(cli.tunnel.is_none());
    }

    #[test]
    fn test_namespaced_task_names() {
        let cli = Cli::try_parse_from(["pave", "build::styles", "--production"]).unwrap();
        assert_eq!(cli.task, TaskName::BuildStyles);
        assert!(cli.production);

        let cli = Cli::try_parse_from(["pave", "rebuild::images"]).unwrap();
        assert_eq!(cli.task, TaskName::RebuildImages);
    }

    #[test]
    fn test_unknown_task_rejected() {
        assert!(Cli::try_parse_from(["pave", "build:styles"]).is_err());
    }

    #[test]
    fn test_tunnel_flag() {
        let cli = Cli::try_parse_from(["pave", "--tunnel"]).unwrap();
        assert_eq!(cli.tunnel.as_deref(), Some(""));

        let cli = Cli::try_parse_from(["pave", "--tunnel=mysite"]).unwrap();
        assert_eq!(cli.tunnel.as_deref(), Some("mysite"));
    }

    #[test]
    fn test_tunnel_does_not_take_the_task() {
        let cli = Cli::try_parse_from(["pave", "--tunnel", "watch"]).unwrap();
        assert_eq!(cli.tunnel.as_deref(), Some(""));
        assert_eq!(cli.task, TaskName::Watch);
    }

    #[test]
    fn test_task_name_roundtrip_display() {
        for task in TaskName::value_variants() {
            let parsed = TaskName::from_str(task.as_str(), false).unwrap();
            assert_eq!(parsed, *task);
        }
    }
}
