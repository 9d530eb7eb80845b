//! Transform invokers.
//!
//! Each invoker wraps one engine behind [`Invoker::build`]:
//!
//! | Invoker          | Engine                                       |
//! |------------------|----------------------------------------------|
//! | [`StylesInvoker`]  | `sass` CLI, then lightningcss (`css`)      |
//! | [`ScriptsInvoker`] | bundler CLI, then oxc when minifying (`js`)|
//! | [`ImagesInvoker`]  | `image` encoders, usvg (`svg`)             |
//! | [`VendorInvoker`]  | plain copy                                 |
//! | [`GridInvoker`]    | generated SCSS                             |
//!
//! Invokers share one flow: discover sources through the group's
//! [`SourceSet`](crate::paths::SourceSet), map each to a [`BuildTarget`],
//! drop fresh targets, transform the rest in parallel and report.

mod css;
mod grid;
mod images;
mod js;
mod report;
mod scripts;
mod styles;
mod svg;
mod vars;
mod vendor;

pub use grid::GridInvoker;
pub use images::ImagesInvoker;
pub use report::{BuildReport, ErrorMode};
pub use scripts::ScriptsInvoker;
pub use styles::StylesInvoker;
pub use vendor::VendorInvoker;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::freshness;
use crate::paths::{AssetGroup, BuildTarget, Layout};
use crate::utils::path::relative_display;
use crate::{debug, log};

/// Per-invocation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildOptions {
    pub minify: bool,
    pub force: bool,
}

impl BuildOptions {
    pub const fn new(minify: bool, force: bool) -> Self {
        Self { minify, force }
    }
}

/// Shared, read-only state handed to every invoker.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub config: Arc<PipelineConfig>,
    pub layout: Layout,
    pub mode: ErrorMode,
}

impl BuildContext {
    pub fn new(config: Arc<PipelineConfig>, mode: ErrorMode) -> Self {
        let layout = Layout::new(&config);
        Self {
            config,
            layout,
            mode,
        }
    }

    /// Path for log lines, relative to the public root.
    pub fn display<'a>(&self, path: &'a Path) -> std::borrow::Cow<'a, str> {
        relative_display(path, &self.layout.root)
    }
}

/// A leaf transformation.
pub trait Invoker: Send + Sync {
    /// Label for logs and error messages, e.g. `template styles`.
    fn label(&self) -> String;

    /// Log prefix (`styles`, `scripts`, ...).
    fn module(&self) -> &'static str;

    fn build(&self, ctx: &BuildContext, options: BuildOptions) -> Result<BuildReport>;
}

/// Discover a group's sources and keep the targets that need a rebuild.
///
/// Route failures are recorded in `report` instead of aborting the group.
fn plan_targets(
    group: &AssetGroup,
    options: BuildOptions,
    report: &mut BuildReport,
) -> Result<Vec<BuildTarget>> {
    let sources = group.source_set()?.discover();
    debug!(
        group.kind.as_str();
        "{}: {} source(s) for {} in {}",
        group.label(),
        sources.len(),
        group.patterns().join(" "),
        group.source_root.display()
    );

    let mut targets = Vec::with_capacity(sources.len());
    for input in sources {
        let target = match group.target(&input, options.minify, options.force) {
            Ok(target) => target,
            Err(err) => {
                report.record_failed(&input, &err.into());
                continue;
            }
        };

        if freshness::check(&target.input, &target.output, target.force).needs_build() {
            targets.push(target);
        } else {
            report.record_skipped();
        }
    }
    Ok(targets)
}

/// Run `transform` over every target in parallel and record outcomes.
fn run_targets<F>(
    ctx: &BuildContext,
    module: &'static str,
    targets: &[BuildTarget],
    report: &mut BuildReport,
    transform: F,
) where
    F: Fn(&BuildTarget) -> Result<()> + Sync,
{
    let results: Vec<_> = targets
        .par_iter()
        .map(|target| (target, transform(target)))
        .collect();

    for (target, result) in results {
        match result {
            Ok(()) => {
                log!(module; "{}", ctx.display(&target.output));
                report.record_built(&target.output);
            }
            Err(err) => report.record_failed(&target.input, &err),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fixtures shared by invoker tests.

    use super::*;
    use crate::config::test_config_at;
    use std::fs;
    use std::path::PathBuf;

    pub fn context(root: &Path, content: &str) -> BuildContext {
        BuildContext::new(Arc::new(test_config_at(root, content)), ErrorMode::Propagate)
    }

    pub fn write(root: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::paths::Scope;
    use tempfile::TempDir;

    #[test]
    fn test_plan_targets_skips_partials_and_fresh() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let ctx = context(root, "");
        write(root, "assets/_source/main.js", "a");
        write(root, "assets/_source/_helper.js", "b");

        let group = AssetGroup::scripts(&ctx.layout, Scope::Template, "*.js");
        let mut report = BuildReport::new();
        let targets = plan_targets(&group, BuildOptions::new(false, false), &mut report).unwrap();
        assert_eq!(targets.len(), 1);
        assert!(targets[0].output.ends_with("assets/main.js"));

        // destination written after the source: fresh on the next pass
        write(root, "assets/main.js", "built");
        let mut report = BuildReport::new();
        let targets = plan_targets(&group, BuildOptions::new(false, false), &mut report).unwrap();
        assert!(targets.is_empty());
        assert_eq!(report.skipped, 1);

        let mut report = BuildReport::new();
        let targets = plan_targets(&group, BuildOptions::new(false, true), &mut report).unwrap();
        assert_eq!(targets.len(), 1);
        assert!(targets[0].force);
    }

    #[test]
    fn test_run_targets_records_failures() {
        let dir = TempDir::new().unwrap();
        let ctx = context(dir.path(), "");
        let targets = vec![
            BuildTarget {
                input: dir.path().join("ok.js"),
                output: dir.path().join("out/ok.js"),
                minify: false,
                force: true,
            },
            BuildTarget {
                input: dir.path().join("bad.js"),
                output: dir.path().join("out/bad.js"),
                minify: false,
                force: true,
            },
        ];

        let mut report = BuildReport::new();
        run_targets(&ctx, "scripts", &targets, &mut report, |target| {
            if target.input.ends_with("bad.js") {
                anyhow::bail!("unexpected token")
            }
            Ok(())
        });

        assert_eq!(report.built, vec![dir.path().join("out/ok.js")]);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].1.contains("unexpected token"));
    }
}
